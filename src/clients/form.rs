//! Form payloads for URL-encoded and multipart submissions.

use crate::clients::errors::InvalidHttpRequestError;

/// Ordered name/value pairs for a URL-encoded form or query string.
///
/// Repeated names are allowed and keep their insertion order.
///
/// # Example
///
/// ```rust
/// use api_resource::clients::FormParameters;
///
/// let params = FormParameters::new()
///     .append("name", "Ada")
///     .append("tag", "math")
///     .append("tag", "engines");
///
/// assert_eq!(params.len(), 3);
/// assert_eq!(params.get_all("tag"), vec!["math", "engines"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormParameters {
    pairs: Vec<(String, String)>,
}

impl FormParameters {
    /// Creates an empty parameter list.
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn append(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.pairs.push((name.into(), value.to_string()));
        self
    }

    /// Returns the first value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns every value for `name`, in insertion order.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the parameters as name/value pairs.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Consumes the list, returning the name/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for FormParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        }
    }
}

/// The content of a single multipart part.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartContent {
    /// A plain text field.
    Text(String),
    /// Binary content, optionally presented as a file.
    Binary {
        /// The raw bytes.
        bytes: Vec<u8>,
        /// The file name announced in `Content-Disposition`.
        file_name: Option<String>,
        /// The part's MIME type.
        mime_type: Option<String>,
    },
}

/// A named part of a multipart form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormPart {
    /// The form field name.
    pub name: String,
    /// The part content.
    pub content: PartContent,
}

/// An ordered multipart form.
///
/// Unlike [`reqwest::multipart::Form`], this value is `Clone` and can be
/// inspected, so a prepared request can be logged or sent more than once.
///
/// # Example
///
/// ```rust
/// use api_resource::clients::MultipartForm;
///
/// let form = MultipartForm::new()
///     .text("title", "Holiday")
///     .file("photo", "beach.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47]);
///
/// assert_eq!(form.parts().len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    /// Creates an empty form.
    #[must_use]
    pub const fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Appends a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            content: PartContent::Text(value.into()),
        });
        self
    }

    /// Appends an anonymous binary part.
    #[must_use]
    pub fn bytes(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            content: PartContent::Binary {
                bytes: bytes.into(),
                file_name: None,
                mime_type: None,
            },
        });
        self
    }

    /// Appends a file part with a file name and MIME type.
    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            content: PartContent::Binary {
                bytes: bytes.into(),
                file_name: Some(file_name.into()),
                mime_type: Some(mime_type.into()),
            },
        });
        self
    }

    /// Returns the parts in order.
    #[must_use]
    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Converts the form into a `reqwest` multipart form.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::InvalidMimeType`] if a part's MIME
    /// type cannot be parsed.
    pub(crate) fn to_reqwest(&self) -> Result<reqwest::multipart::Form, InvalidHttpRequestError> {
        let mut form = reqwest::multipart::Form::new();
        for part in &self.parts {
            form = match &part.content {
                PartContent::Text(value) => form.text(part.name.clone(), value.clone()),
                PartContent::Binary {
                    bytes,
                    file_name,
                    mime_type,
                } => {
                    let mut reqwest_part = reqwest::multipart::Part::bytes(bytes.clone());
                    if let Some(file_name) = file_name {
                        reqwest_part = reqwest_part.file_name(file_name.clone());
                    }
                    if let Some(mime_type) = mime_type {
                        reqwest_part = reqwest_part.mime_str(mime_type).map_err(|_| {
                            InvalidHttpRequestError::InvalidMimeType {
                                part: part.name.clone(),
                                mime_type: mime_type.clone(),
                            }
                        })?;
                    }
                    form.part(part.name.clone(), reqwest_part)
                }
            };
        }
        Ok(form)
    }
}
