//! Declarative API resources and path resolution.
//!
//! This module provides the values callers use to describe endpoints, and
//! the resolver that turns them into request paths.
//!
//! # Overview
//!
//! - [`Resource`]: A plain endpoint with a typed response
//! - [`ResourceWithBody`]: An endpoint that also carries a request body
//! - [`ApiResource`]: The trait the dispatcher accepts
//! - [`Endpoint`]: The plain/with-body sum type returned by [`ApiResource::endpoint`]
//! - [`ResourceNode`]: One untyped link of a parent chain
//! - [`resolve`] / [`ResolvedPath`]: Path resolution
//! - [`ResourceError`]: Resolution failures
//!
//! # Example
//!
//! ```rust
//! use api_resource::Resource;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Comment {
//!     body: String,
//! }
//!
//! let post = Resource::<()>::new("posts/{id}").field("id", 12);
//! let comments = post.child::<Vec<Comment>>("comments").field("limit", 20);
//!
//! let resolved = comments.resolve().unwrap();
//! assert_eq!(resolved.to_string(), "/posts/12/comments?limit=20");
//! ```

mod errors;
mod node;
mod path;

pub use errors::ResourceError;
pub use node::{
    ApiResource, Endpoint, NoBody, Resource, ResourceNode, ResourceWithBody, UnitResource,
    UnitResourceWithBody,
};
pub use path::{resolve, ResolvedPath};
