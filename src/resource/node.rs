//! Resource values: endpoint descriptions with parent chaining and bodies.
//!
//! A resource is pure data. It names a path segment, may own its parent, and
//! may carry a request body, but it never performs a request itself. Requests
//! are made by passing a resource to [`RemoteService`](crate::RemoteService).
//!
//! # Shapes
//!
//! - [`Resource<Res>`]: a plain endpoint whose response decodes into `Res`
//! - [`ResourceWithBody<Req, Res>`]: an endpoint that sends a `Req` payload
//!
//! Both implement [`ApiResource`], whose [`endpoint`](ApiResource::endpoint)
//! method returns an [`Endpoint`] the dispatcher matches on exhaustively.
//!
//! # Example
//!
//! ```rust
//! use api_resource::{ApiResource, Endpoint, Resource};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Deserialize)]
//! struct User {
//!     id: u64,
//! }
//!
//! #[derive(Serialize)]
//! struct Rename {
//!     name: String,
//! }
//!
//! let users = Resource::<Vec<User>>::new("users");
//! let rename = Resource::<User>::new("{id}")
//!     .field("id", 42)
//!     .with_parent(users)
//!     .with_body(Rename { name: "Ada".into() });
//!
//! assert_eq!(rename.resolve().unwrap().path(), "/users/42");
//! assert!(matches!(rename.endpoint(), Endpoint::WithBody { .. }));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::resource::errors::ResourceError;
use crate::resource::path::{self, ResolvedPath};

/// One link of a resource chain, without its response type.
///
/// A node owns its parent, so a chain is finite and acyclic by construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceNode {
    segment: String,
    fields: BTreeMap<String, String>,
    parent: Option<Box<ResourceNode>>,
}

impl ResourceNode {
    /// Creates a root node with the given segment template.
    #[must_use]
    pub fn new(segment: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            fields: BTreeMap::new(),
            parent: None,
        }
    }

    /// Sets the parent, replacing any existing one.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<Self>) -> Self {
        self.parent = Some(Box::new(parent.into()));
        self
    }

    /// Sets a field used for placeholders or, when unused, the query string.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.fields.insert(name.into(), value.to_string());
        self
    }

    /// Returns this link's segment template.
    #[must_use]
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// Returns this link's own fields, ordered by name.
    #[must_use]
    pub const fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Returns the value of this link's field `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Returns the parent link, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.parent.as_deref()
    }

    /// Iterates from this link up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = &Self> {
        std::iter::successors(Some(self), |node| node.parent())
    }

    /// Returns the number of links in the chain, including this one.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Resolves the chain into a path and query parameters.
    ///
    /// # Errors
    ///
    /// See [`resolve`](crate::resource::resolve).
    pub fn resolve(&self) -> Result<ResolvedPath, ResourceError> {
        path::resolve(self)
    }

    fn insert_fields<F: Serialize + ?Sized>(&mut self, fields: &F) -> Result<(), ResourceError> {
        let value = serde_json::to_value(fields).map_err(|e| ResourceError::InvalidFields {
            reason: e.to_string(),
        })?;
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(ResourceError::InvalidFields {
                    reason: format!("expected an object, got {other}"),
                })
            }
        };

        for (name, value) in map {
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(ResourceError::UnsupportedFieldValue { field: name })
                }
            };
            self.fields.insert(name, text);
        }
        Ok(())
    }
}

/// A plain endpoint whose response body decodes into `Res`.
///
/// `Res` is only a type-level marker; no value of it is stored.
pub struct Resource<Res> {
    node: ResourceNode,
    _response: PhantomData<fn() -> Res>,
}

/// A plain endpoint with no meaningful response body.
pub type UnitResource = Resource<()>;

impl<Res> Resource<Res> {
    /// Creates a root resource with the given segment template.
    #[must_use]
    pub fn new(segment: impl Into<String>) -> Self {
        Self::from_node(ResourceNode::new(segment))
    }

    /// Wraps an existing node.
    #[must_use]
    pub const fn from_node(node: ResourceNode) -> Self {
        Self {
            node,
            _response: PhantomData,
        }
    }

    /// Creates a child resource nested under this one.
    #[must_use]
    pub fn child<T>(self, segment: impl Into<String>) -> Resource<T> {
        Resource::from_node(ResourceNode::new(segment).with_parent(self.node))
    }

    /// Sets the parent, replacing any existing one.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<ResourceNode>) -> Self {
        self.node = self.node.with_parent(parent);
        self
    }

    /// Sets a field on this resource's own link.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.node = self.node.with_field(name, value);
        self
    }

    /// Sets one field per member of a serializable struct or map.
    ///
    /// `null` members are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidFields`] if `fields` is not an object
    /// and [`ResourceError::UnsupportedFieldValue`] for array or object members.
    pub fn with_fields<F: Serialize + ?Sized>(mut self, fields: &F) -> Result<Self, ResourceError> {
        self.node.insert_fields(fields)?;
        Ok(self)
    }

    /// Attaches a request body, turning this into a payload-bearing resource.
    #[must_use]
    pub fn with_body<Req>(self, body: Req) -> ResourceWithBody<Req, Res> {
        ResourceWithBody {
            node: self.node,
            body,
            _response: PhantomData,
        }
    }

    /// Returns the underlying node.
    #[must_use]
    pub const fn node(&self) -> &ResourceNode {
        &self.node
    }

    /// Resolves the resource's path.
    ///
    /// # Errors
    ///
    /// See [`resolve`](crate::resource::resolve).
    pub fn resolve(&self) -> Result<ResolvedPath, ResourceError> {
        self.node.resolve()
    }
}

impl<Res> Clone for Resource<Res> {
    fn clone(&self) -> Self {
        Self::from_node(self.node.clone())
    }
}

impl<Res> fmt::Debug for Resource<Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("response", &std::any::type_name::<Res>())
            .field("node", &self.node)
            .finish()
    }
}

impl<Res> PartialEq for Resource<Res> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<Res> Eq for Resource<Res> {}

impl<Res> From<Resource<Res>> for ResourceNode {
    fn from(resource: Resource<Res>) -> Self {
        resource.node
    }
}

/// An endpoint that carries a `Req` payload and decodes into `Res`.
///
/// The body is attached when the value is built and sent as JSON unless the
/// call site chooses a form or multipart submission.
pub struct ResourceWithBody<Req, Res> {
    node: ResourceNode,
    body: Req,
    _response: PhantomData<fn() -> Res>,
}

/// A payload-bearing endpoint with no meaningful response body.
pub type UnitResourceWithBody<Req> = ResourceWithBody<Req, ()>;

impl<Req, Res> ResourceWithBody<Req, Res> {
    /// Creates a root resource with a body.
    #[must_use]
    pub fn new(segment: impl Into<String>, body: Req) -> Self {
        Resource::new(segment).with_body(body)
    }

    /// Sets the parent, replacing any existing one.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<ResourceNode>) -> Self {
        self.node = self.node.with_parent(parent);
        self
    }

    /// Sets a field on this resource's own link.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.node = self.node.with_field(name, value);
        self
    }

    /// Returns the attached body.
    #[must_use]
    pub const fn body(&self) -> &Req {
        &self.body
    }

    /// Consumes the resource, returning the plain resource and the body.
    #[must_use]
    pub fn into_parts(self) -> (Resource<Res>, Req) {
        (Resource::from_node(self.node), self.body)
    }

    /// Returns the underlying node.
    #[must_use]
    pub const fn node(&self) -> &ResourceNode {
        &self.node
    }

    /// Resolves the resource's path.
    ///
    /// # Errors
    ///
    /// See [`resolve`](crate::resource::resolve).
    pub fn resolve(&self) -> Result<ResolvedPath, ResourceError> {
        self.node.resolve()
    }
}

impl<Req: Clone, Res> Clone for ResourceWithBody<Req, Res> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
            body: self.body.clone(),
            _response: PhantomData,
        }
    }
}

impl<Req: fmt::Debug, Res> fmt::Debug for ResourceWithBody<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceWithBody")
            .field("response", &std::any::type_name::<Res>())
            .field("node", &self.node)
            .field("body", &self.body)
            .finish()
    }
}

impl<Req: PartialEq, Res> PartialEq for ResourceWithBody<Req, Res> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && self.body == other.body
    }
}

impl<Req, Res> From<ResourceWithBody<Req, Res>> for ResourceNode {
    fn from(resource: ResourceWithBody<Req, Res>) -> Self {
        resource.node
    }
}

/// The request type of resources without a body.
///
/// It has no values, so a plain resource can never produce a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoBody {}

impl Serialize for NoBody {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        match *self {}
    }
}

/// The shape of a resource as seen by the dispatcher.
#[derive(Debug)]
pub enum Endpoint<'a, Req> {
    /// A resource without a body.
    Plain(&'a ResourceNode),
    /// A resource whose body is sent as the primary payload.
    WithBody {
        /// The resource's node.
        node: &'a ResourceNode,
        /// The attached body.
        body: &'a Req,
    },
}

impl<'a, Req> Endpoint<'a, Req> {
    /// Returns the resource's node.
    #[must_use]
    pub const fn node(&self) -> &'a ResourceNode {
        match self {
            Self::Plain(node) | Self::WithBody { node, .. } => *node,
        }
    }

    /// Returns the attached body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&'a Req> {
        match self {
            Self::Plain(_) => None,
            Self::WithBody { body, .. } => Some(*body),
        }
    }
}

/// A value that describes an API endpoint.
///
/// Implemented by [`Resource`] and [`ResourceWithBody`]. Custom endpoint
/// types can implement it by exposing a node, and a body when they have one.
///
/// # Example
///
/// ```rust
/// use api_resource::{ApiResource, Endpoint, NoBody, ResourceNode};
///
/// struct Health {
///     node: ResourceNode,
/// }
///
/// impl ApiResource for Health {
///     type Request = NoBody;
///     type Response = String;
///
///     fn endpoint(&self) -> Endpoint<'_, NoBody> {
///         Endpoint::Plain(&self.node)
///     }
/// }
///
/// let health = Health { node: ResourceNode::new("health") };
/// assert_eq!(health.node().resolve().unwrap().path(), "/health");
/// ```
pub trait ApiResource: Send + Sync {
    /// The payload type; [`NoBody`] for plain resources.
    type Request: Serialize + Send + Sync;
    /// The type the response body decodes into.
    type Response: DeserializeOwned;

    /// Returns the resource's shape.
    fn endpoint(&self) -> Endpoint<'_, Self::Request>;

    /// Returns the resource's node.
    fn node(&self) -> &ResourceNode {
        self.endpoint().node()
    }
}

impl<Res: DeserializeOwned> ApiResource for Resource<Res> {
    type Request = NoBody;
    type Response = Res;

    fn endpoint(&self) -> Endpoint<'_, NoBody> {
        Endpoint::Plain(&self.node)
    }
}

impl<Req, Res> ApiResource for ResourceWithBody<Req, Res>
where
    Req: Serialize + Send + Sync,
    Res: DeserializeOwned,
{
    type Request = Req;
    type Response = Res;

    fn endpoint(&self) -> Endpoint<'_, Req> {
        Endpoint::WithBody {
            node: &self.node,
            body: &self.body,
        }
    }
}

// Verify resource types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceNode>();
    assert_send_sync::<Resource<std::rc::Rc<()>>>();
    assert_send_sync::<ResourceWithBody<String, ()>>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct User {
        id: u64,
        name: String,
    }

    #[derive(Serialize)]
    struct Filters {
        page: u32,
        active: bool,
        q: Option<String>,
        sort: &'static str,
    }

    #[test]
    fn test_resource_without_parent_is_root() {
        let users = Resource::<Vec<User>>::new("users");
        assert!(users.node().parent().is_none());
        assert_eq!(users.node().depth(), 1);
        assert_eq!(users.resolve().unwrap().path(), "/users");
    }

    #[test]
    fn test_child_nests_under_parent() {
        let comments = Resource::<()>::new("blogs")
            .child::<()>("posts")
            .child::<Vec<String>>("comments");

        let segments: Vec<&str> = comments
            .node()
            .ancestors()
            .map(ResourceNode::segment)
            .collect();
        assert_eq!(segments, vec!["comments", "posts", "blogs"]);
        assert_eq!(comments.resolve().unwrap().path(), "/blogs/posts/comments");
    }

    #[test]
    fn test_with_parent_accepts_any_resource_shape() {
        let parent = ResourceWithBody::<u8, ()>::new("orgs/{org}", 1).field("org", "acme");
        let members = Resource::<()>::new("members").with_parent(parent);
        assert_eq!(members.resolve().unwrap().path(), "/orgs/acme/members");
    }

    #[test]
    fn test_resolving_twice_yields_same_path() {
        let resource = Resource::<User>::new("users/{id}")
            .field("id", 5)
            .field("fields", "name")
            .child::<()>("avatar");

        assert_eq!(resource.resolve().unwrap(), resource.resolve().unwrap());
    }

    #[test]
    fn test_with_fields_flattens_scalars_and_skips_nulls() {
        let resource = Resource::<()>::new("users")
            .with_fields(&Filters {
                page: 2,
                active: true,
                q: None,
                sort: "name",
            })
            .unwrap();

        let fields = resource.node().fields();
        assert_eq!(fields.get("page").map(String::as_str), Some("2"));
        assert_eq!(fields.get("active").map(String::as_str), Some("true"));
        assert_eq!(fields.get("sort").map(String::as_str), Some("name"));
        assert!(!fields.contains_key("q"));
    }

    #[test]
    fn test_with_fields_rejects_nested_values() {
        let result = Resource::<()>::new("users")
            .with_fields(&serde_json::json!({"tags": ["a", "b"]}));
        assert_eq!(
            result.unwrap_err(),
            ResourceError::UnsupportedFieldValue {
                field: "tags".to_string()
            }
        );
    }

    #[test]
    fn test_with_fields_rejects_non_objects() {
        let result = Resource::<()>::new("users").with_fields(&[1, 2]);
        assert!(matches!(result, Err(ResourceError::InvalidFields { .. })));
    }

    #[test]
    fn test_with_body_keeps_node_and_body() {
        let user = User {
            id: 1,
            name: "Ada".to_string(),
        };
        let resource = Resource::<User>::new("users/create").with_body(user.clone());

        assert_eq!(resource.body(), &user);
        assert_eq!(resource.resolve().unwrap().path(), "/users/create");

        let (plain, body) = resource.into_parts();
        assert_eq!(body, user);
        assert_eq!(plain.resolve().unwrap().path(), "/users/create");
    }

    #[test]
    fn test_endpoint_shape_matches_capability() {
        let plain = Resource::<User>::new("users");
        assert!(matches!(plain.endpoint(), Endpoint::Plain(_)));
        assert!(plain.endpoint().body().is_none());

        let with_body = UnitResourceWithBody::new("ping", "hello".to_string());
        match with_body.endpoint() {
            Endpoint::WithBody { node, body } => {
                assert_eq!(node.segment(), "ping");
                assert_eq!(body, "hello");
            }
            Endpoint::Plain(_) => panic!("expected a body-bearing endpoint"),
        }
    }

    #[test]
    fn test_clone_and_eq_ignore_response_type_bounds() {
        struct NotClone;
        let a = Resource::<Vec<NotClone>>::new("x").field("id", 1);
        let b = a.clone();
        assert_eq!(a, b);
        assert!(format!("{a:?}").contains("Resource"));
    }
}
