//! Path resolution for resource chains.
//!
//! A resource's path is built by walking its parent chain from the root to
//! the resource itself and joining every link's segment template with `/`.
//!
//! # Segment Templates
//!
//! A segment is plain text with optional placeholders:
//! - `users` - Literal segment
//! - `users/{id}` - Required placeholder, filled from the link's own `id` field
//! - `posts/{slug?}` - Optional placeholder; its `/`-part is dropped when the
//!   field is absent or empty, so it must stand alone in that part
//!
//! A required placeholder set to an empty string is an error rather than an
//! empty part, so `users/{id}` can never collapse into `/users`.
//!
//! Placeholder values are percent-encoded. Fields that no placeholder
//! consumes become query parameters, root first, then by field name.
//!
//! Resolution is pure: the same resource value always yields the same
//! [`ResolvedPath`].
//!
//! # Example
//!
//! ```rust
//! use api_resource::Resource;
//!
//! let comments = Resource::<()>::new("users/{id}")
//!     .field("id", 7)
//!     .child::<()>("comments")
//!     .field("page", 2);
//!
//! let resolved = comments.resolve().unwrap();
//! assert_eq!(resolved.path(), "/users/7/comments");
//! assert_eq!(resolved.query(), &[("page".to_string(), "2".to_string())]);
//! ```

use std::collections::BTreeSet;
use std::fmt;

use crate::resource::errors::ResourceError;
use crate::resource::node::ResourceNode;

/// The outcome of resolving a resource chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedPath {
    path: String,
    query: Vec<(String, String)>,
}

impl ResolvedPath {
    /// Returns the absolute path, always starting with `/`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the query parameters contributed by unconsumed fields.
    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Consumes the value, returning the path and query parameters.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<(String, String)>) {
        (self.path, self.query)
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (index, (name, value)) in self.query.iter().enumerate() {
            let separator = if index == 0 { '?' } else { '&' };
            write!(
                f,
                "{separator}{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Piece<'a> {
    Literal(&'a str),
    Placeholder { name: &'a str, optional: bool },
}

/// Resolves a resource chain into its path and query parameters.
///
/// # Errors
///
/// Returns [`ResourceError::MissingPathParameter`] when a required
/// placeholder has no field on its own link,
/// [`ResourceError::EmptyPathParameter`] when that field is an empty string,
/// and [`ResourceError::MalformedTemplate`] for unbalanced or empty braces or
/// an optional placeholder that does not fill its whole part.
pub fn resolve(node: &ResourceNode) -> Result<ResolvedPath, ResourceError> {
    let mut chain: Vec<&ResourceNode> = node.ancestors().collect();
    chain.reverse();

    let mut parts = Vec::new();
    let mut query = Vec::new();

    for link in chain {
        let used = expand_link(link, &mut parts)?;
        query.extend(
            link.fields()
                .iter()
                .filter(|(name, _)| !used.contains(name.as_str()))
                .map(|(name, value)| (name.clone(), value.clone())),
        );
    }

    Ok(ResolvedPath {
        path: format!("/{}", parts.join("/")),
        query,
    })
}

/// Appends the expanded parts of one link, returning the field names its
/// placeholders consumed.
fn expand_link<'a>(
    link: &'a ResourceNode,
    parts: &mut Vec<String>,
) -> Result<BTreeSet<&'a str>, ResourceError> {
    let segment = link.segment();
    let mut used = BTreeSet::new();

    for part in segment.split('/').filter(|part| !part.is_empty()) {
        let mut expanded = String::new();
        let mut dropped = false;

        for piece in parse_part(part, segment)? {
            match piece {
                Piece::Literal(text) => expanded.push_str(text),
                Piece::Placeholder { name, optional } => match link.field(name) {
                    Some(value) if !value.is_empty() => {
                        used.insert(name);
                        expanded.push_str(&urlencoding::encode(value));
                    }
                    Some(_) if optional => {
                        used.insert(name);
                        dropped = true;
                    }
                    Some(_) => {
                        return Err(ResourceError::EmptyPathParameter {
                            segment: segment.to_string(),
                            field: name.to_string(),
                        })
                    }
                    None if optional => dropped = true,
                    None => {
                        return Err(ResourceError::MissingPathParameter {
                            segment: segment.to_string(),
                            field: name.to_string(),
                        })
                    }
                },
            }
        }

        if !dropped {
            parts.push(expanded);
        }
    }

    Ok(used)
}

fn parse_part<'a>(part: &'a str, segment: &str) -> Result<Vec<Piece<'a>>, ResourceError> {
    let malformed = || ResourceError::MalformedTemplate {
        segment: segment.to_string(),
    };

    let mut pieces = Vec::new();
    let mut rest = part;

    while let Some(start) = rest.find(|c| c == '{' || c == '}') {
        if rest[start..].starts_with('}') {
            return Err(malformed());
        }
        if start > 0 {
            pieces.push(Piece::Literal(&rest[..start]));
        }

        let after = &rest[start + 1..];
        let end = after.find('}').ok_or_else(malformed)?;
        let inner = &after[..end];
        if inner.contains('{') {
            return Err(malformed());
        }

        let (name, optional) = inner
            .strip_suffix('?')
            .map_or((inner, false), |name| (name, true));
        if name.is_empty() {
            return Err(malformed());
        }

        pieces.push(Piece::Placeholder { name, optional });
        rest = &after[end + 1..];
    }

    if !rest.is_empty() {
        pieces.push(Piece::Literal(rest));
    }

    let has_optional = pieces
        .iter()
        .any(|piece| matches!(piece, Piece::Placeholder { optional: true, .. }));
    if has_optional && pieces.len() > 1 {
        return Err(malformed());
    }

    Ok(pieces)
}
