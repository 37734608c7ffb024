//! Resolution errors for resource paths.
//!
//! A [`ResourceError`] means the request was never sent: the resource value
//! itself could not be turned into a path.
//!
//! # Example
//!
//! ```rust
//! use api_resource::{Resource, ResourceError};
//!
//! let user = Resource::<()>::new("users/{id}");
//!
//! match user.resolve() {
//!     Err(ResourceError::MissingPathParameter { field, .. }) => assert_eq!(field, "id"),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use thiserror::Error;

/// Error raised while building a resource or resolving its path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// A `{placeholder}` has no matching field on its resource.
    #[error("Path segment '{segment}' requires field '{field}', but the resource does not set it")]
    MissingPathParameter {
        /// The segment template containing the placeholder.
        segment: String,
        /// The name of the missing field.
        field: String,
    },

    /// A required `{placeholder}` is set to an empty string.
    #[error("Path segment '{segment}' requires a non-empty value for field '{field}'")]
    EmptyPathParameter {
        /// The segment template containing the placeholder.
        segment: String,
        /// The name of the empty field.
        field: String,
    },

    /// A segment template has an unbalanced or empty placeholder, or an
    /// optional placeholder that shares its `/`-part with other text.
    #[error("Malformed path segment '{segment}': placeholders must look like '{{name}}' or '{{name?}}'")]
    MalformedTemplate {
        /// The offending segment template.
        segment: String,
    },

    /// A field value is not a scalar and cannot be placed in a URL.
    #[error("Field '{field}' must be a string, number, or boolean to be used in a path or query")]
    UnsupportedFieldValue {
        /// The name of the offending field.
        field: String,
    },

    /// A value passed to `with_fields` does not serialize to an object.
    #[error("Resource fields must serialize to a JSON object: {reason}")]
    InvalidFields {
        /// Why the value was rejected.
        reason: String,
    },
}
