//! Tagged body stages.
//!
//! Request and response bodies move through the pipeline as explicit sum
//! types, one per stage, so that each stage's expected shape is checked at
//! compile time rather than by runtime tag inspection. The boundary layer
//! produces a [`RawBody`] for every inbound request; transform stages
//! replace it with richer values; every terminal response carries a
//! [`ResponseBody`].

use bytes::Bytes;

/// The wire-stage request body, as produced by the boundary layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RawBody {
    /// No body was sent.
    #[default]
    Empty,
    /// A UTF-8 text body (includes JSON payloads, which are parsed by a
    /// later transform stage).
    Text(String),
    /// An opaque binary body (file uploads).
    Binary(Bytes),
}

impl RawBody {
    /// Returns the body as text, if it is the text variant.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Returns true for the empty variant.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Builds a wire body from collected bytes and the declared content type.
    ///
    /// Valid UTF-8 text-ish payloads become [`RawBody::Text`]; everything
    /// else stays binary. An empty payload is always [`RawBody::Empty`].
    #[must_use]
    pub fn from_bytes(bytes: Bytes, content_type: Option<&str>) -> Self {
        if bytes.is_empty() {
            return Self::Empty;
        }
        let textual = content_type.map_or(true, |ct| {
            ct.starts_with("text/")
                || ct.starts_with("application/json")
                || ct.starts_with("application/x-www-form-urlencoded")
        });
        if textual {
            match String::from_utf8(bytes.to_vec()) {
                Ok(text) => Self::Text(text),
                Err(_) => Self::Binary(bytes),
            }
        } else {
            Self::Binary(bytes)
        }
    }
}

/// The terminal response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// No body.
    Empty,
    /// A JSON document.
    Json(serde_json::Value),
    /// Plain text.
    Text(String),
    /// An HTML document (front-end entry and downtime pages).
    Html(String),
    /// File contents with an explicit content type.
    File {
        /// The file bytes.
        bytes: Bytes,
        /// The MIME type to serve the file with.
        content_type: String,
    },
}

impl ResponseBody {
    /// Returns the `Content-Type` to serve this body with, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Json(_) => Some("application/json"),
            Self::Text(_) => Some("text/plain; charset=utf-8"),
            Self::Html(_) => Some("text/html; charset=utf-8"),
            Self::File { content_type, .. } => Some(content_type),
        }
    }

    /// Serializes the body into wire bytes.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        match self {
            Self::Empty => Bytes::new(),
            Self::Json(value) => Bytes::from(value.to_string()),
            Self::Text(text) | Self::Html(text) => Bytes::from(text),
            Self::File { bytes, .. } => bytes,
        }
    }

    /// Coerces the body into the JSON variant.
    ///
    /// Used by the resource compiler's body-envelope transform: API routes
    /// always answer JSON, whatever shape their handler produced. File
    /// bodies are not representable as JSON and pass through untouched.
    #[must_use]
    pub fn into_json(self) -> Self {
        match self {
            Self::Empty => Self::Json(serde_json::Value::Null),
            Self::Text(text) | Self::Html(text) => Self::Json(serde_json::Value::String(text)),
            body @ (Self::Json(_) | Self::File { .. }) => body,
        }
    }
}

impl From<serde_json::Value> for ResponseBody {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<String> for ResponseBody {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<()> for ResponseBody {
    fn from((): ()) -> Self {
        Self::Empty
    }
}
