use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;

/// HTTP status code of a response.
///
/// The server only ever emits 200 and 404, so only those two carry their
/// own reason phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode(u16);

impl StatusCode {
    /// 200 OK
    pub const OK: StatusCode = StatusCode(200);
    /// 404 Not Found
    pub const NOT_FOUND: StatusCode = StatusCode(404);

    pub fn from_u16(code: u16) -> Self {
        StatusCode(code)
    }

    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use miniweb::http::response::StatusCode;
    /// assert_eq!(StatusCode::OK.as_u16(), 200);
    /// assert_eq!(StatusCode::NOT_FOUND.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns the reason phrase for this status code.
    ///
    /// Codes other than 200 and 404 fall back to "OK".
    ///
    /// # Example
    ///
    /// ```
    /// # use miniweb::http::response::StatusCode;
    /// assert_eq!(StatusCode::OK.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NOT_FOUND.reason_phrase(), "Not Found");
    /// assert_eq!(StatusCode::from_u16(500).reason_phrase(), "OK");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self.0 {
            404 => "Not Found",
            _ => "OK",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Gzip,
}

impl ContentEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentEncoding::Gzip => "gzip",
        }
    }
}

/// A complete HTTP response ready to be serialized.
///
/// `body` holds the bytes that go on the wire: when `content_encoding` is
/// set, it is already compressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub content_type: String,
    pub content_encoding: Option<ContentEncoding>,
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use miniweb::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::OK)
///     .content_type("text/plain; charset=utf-8")
///     .body(b"hello".to_vec())
///     .gzip(false)
///     .build()
///     .unwrap();
/// assert_eq!(response.body, b"hello");
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    content_type: String,
    body: Vec<u8>,
    gzip: bool,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: crate::http::mime::DEFAULT_CONTENT_TYPE.to_string(),
            body: Vec::new(),
            gzip: false,
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Sets the uncompressed response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Requests gzip compression of the body.
    pub fn gzip(mut self, gzip: bool) -> Self {
        self.gzip = gzip;
        self
    }

    /// Builds the final Response, compressing the body if requested.
    pub fn build(self) -> std::io::Result<Response> {
        let (body, content_encoding) = if self.gzip {
            (gzip(&self.body)?, Some(ContentEncoding::Gzip))
        } else {
            (self.body, None)
        };

        Ok(Response {
            status: self.status,
            content_type: self.content_type,
            content_encoding,
            body,
        })
    }
}

impl Response {
    /// Number of body bytes actually sent.
    pub fn content_length(&self) -> usize {
        self.body.len()
    }
}

/// Gzip-compresses `data` at the default compression level.
pub fn gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
