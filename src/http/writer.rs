use std::time::SystemTime;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Value of the `Server` header.
pub const SERVER_NAME: &str = concat!("miniweb/", env!("CARGO_PKG_VERSION"));

/// Serializes a response into wire bytes, stamping it with `date`.
///
/// Headers always come out in the same order and the connection is always
/// declared closed.
pub fn serialize_response(resp: &Response, date: SystemTime) -> Vec<u8> {
    let mut head = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );

    head.push_str(&format!("Date: {}\r\n", httpdate::fmt_http_date(date)));
    head.push_str(&format!("Server: {}\r\n", SERVER_NAME));
    head.push_str(&format!("Content-Type: {}\r\n", resp.content_type));
    head.push_str(&format!("Content-Length: {}\r\n", resp.content_length()));
    if let Some(encoding) = resp.content_encoding {
        head.push_str(&format!("Content-Encoding: {}\r\n", encoding.as_str()));
    }
    head.push_str("Connection: close\r\n");

    // Header/body separator
    head.push_str("\r\n");

    let mut buf = Vec::with_capacity(head.len() + resp.body.len());
    buf.extend_from_slice(head.as_bytes());
    buf.extend_from_slice(&resp.body);
    buf
}

/// Holds a fully serialized response and pushes it to a stream.
///
/// Serialization happens up front, so nothing reaches the client until every
/// content decision has been made.
pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response, SystemTime::now()),
            written: 0,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
