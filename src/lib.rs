//! # API Resource Client
//!
//! A typed HTTP API client built around declarative resources: endpoints are
//! described as values instead of hand-built URLs, dispatched through a
//! shared client, and answered with strongly-typed responses.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Resource values with parent chaining and optional request bodies
//!   ([`Resource`], [`ResourceWithBody`])
//! - Deterministic path resolution with `{placeholder}` substitution
//! - A stateless dispatcher, [`RemoteService`], with GET/POST/PUT/PATCH/DELETE,
//!   URL-encoded form, and multipart entry points
//! - [`TypedResponse`], which pairs the decoded body with status, headers,
//!   and timing
//! - Three distinguishable failure kinds in [`ApiError`]
//!
//! ## Quick Start
//!
//! ```rust
//! use api_resource::{AccessToken, BaseUrl, ClientConfig, RemoteService};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com/v1").unwrap())
//!     .access_token(AccessToken::new("Bearer abc123").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let service = RemoteService::from_config(&config).unwrap();
//! assert_eq!(service.client().base_url().as_ref(), "https://api.example.com/v1");
//! ```
//!
//! ## Declaring Resources
//!
//! ```rust
//! use api_resource::{Resource, UnitResource};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! // GET /users
//! let users = Resource::<Vec<User>>::new("users");
//!
//! // PUT /users/7 with a JSON body
//! let update = Resource::<User>::new("{id}")
//!     .field("id", 7)
//!     .with_parent(users.clone())
//!     .with_body(User { id: 7, name: "Ada".into() });
//!
//! // DELETE /users/7/sessions
//! let logout = UnitResource::new("users/{id}").field("id", 7).child::<()>("sessions");
//!
//! assert_eq!(update.resolve().unwrap().path(), "/users/7");
//! assert_eq!(logout.resolve().unwrap().path(), "/users/7/sessions");
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use api_resource::{ApiError, FormEncoding, RemoteService, Resource};
//! use api_resource::clients::FormParameters;
//!
//! let users = service.get(&Resource::<Vec<User>>::new("users"), None).await?;
//! for user in users.iter() {
//!     println!("{}: {}", user.id, user.name);
//! }
//!
//! let ack = service
//!     .submit_form(
//!         &Resource::<String>::new("forms/contact"),
//!         FormParameters::new().append("email", "ada@example.com"),
//!         FormEncoding::Body,
//!         None,
//!         None,
//!     )
//!     .await?;
//!
//! match service.get(&Resource::<User>::new("users/{id}").field("id", 404), None).await {
//!     Err(ApiError::Transport(e)) => println!("status {:?}", e.status()),
//!     Err(ApiError::Decoding(e)) => println!("unexpected body: {e}"),
//!     Err(ApiError::Resolution(e)) => println!("bad resource: {e}"),
//!     Ok(user) => println!("{}", user.name),
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio async runtime
//! - **No hidden recovery**: Errors are never retried or replaced with defaults

pub mod clients;
pub mod codec;
pub mod config;
pub mod error;
pub mod resource;
pub mod response;
pub mod service;

// Re-export public types at crate root for convenience
pub use codec::{CodecError, JsonCodec};
pub use config::{AccessToken, BaseUrl, ClientConfig, ClientConfigBuilder};
pub use error::{ApiError, ConfigError};

// Re-export resource types
pub use resource::{
    ApiResource, Endpoint, NoBody, ResolvedPath, Resource, ResourceError, ResourceNode,
    ResourceWithBody, UnitResource, UnitResourceWithBody,
};

// Re-export dispatch types
pub use response::TypedResponse;
pub use service::{FormEncoding, RemoteService, RequestOverrides};

// Re-export HTTP client types
pub use clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, HttpResponseError,
};
