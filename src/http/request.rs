use std::borrow::Cow;
use std::collections::HashMap;

/// Request headers with case-insensitive names.
///
/// Inserting a name that is already present (in any casing) replaces the
/// previous entry, so the last value sent wins. The name is kept as it was
/// last sent, for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: HashMap<String, (String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a header.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.entries
            .insert(name.to_ascii_lowercase(), (name, value.into()));
    }

    /// Retrieves a header value by name, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    /// Header names as they were sent. Order is unspecified.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Represents a parsed HTTP request from a client.
///
/// The method is kept verbatim; nothing besides serving static files is
/// implemented, so no method is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method as sent (e.g. "GET")
    pub method: String,
    /// Percent-decoded path with the query string removed
    pub path: String,
    /// The request-target exactly as it appeared on the request line
    pub target: String,
    /// HTTP version, informational only
    pub version: String,
    pub headers: Headers,
    /// Percent-decoded query parameters, last duplicate wins
    pub query: HashMap<String, String>,
    /// Request body, at most `Content-Length` bytes
    pub body: Vec<u8>,
}

impl Request {
    /// The path portion of the request-target, still percent-encoded.
    pub fn raw_path(&self) -> &str {
        self.target
            .split_once('?')
            .map_or(self.target.as_str(), |(path, _)| path)
    }

    /// Retrieves a header value by name (case-insensitive).
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    /// The declared body length.
    ///
    /// Returns 0 when the header is missing, not a number, or not positive.
    pub fn content_length(&self) -> usize {
        self.header("Content-Length")
            .and_then(|v| v.trim().parse::<i32>().ok())
            .filter(|len| *len > 0)
            .map(|len| len as usize)
            .unwrap_or(0)
    }

    /// Whether `Accept-Encoding` mentions gzip anywhere in its value.
    pub fn accepts_gzip(&self) -> bool {
        self.header("Accept-Encoding")
            .map(|v| v.contains("gzip"))
            .unwrap_or(false)
    }

    pub fn body_as_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
