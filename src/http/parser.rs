use std::collections::HashMap;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::http::percent;
use crate::http::request::{Headers, Request};

/// Version assumed when the request line does not carry one.
pub const DEFAULT_VERSION: &str = "HTTP/1.1";

/// Longest request or header line accepted, terminator included.
pub const MAX_LINE: usize = 8 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read request: {0}")]
    Io(#[from] std::io::Error),
    #[error("request line has no request-target")]
    MissingTarget,
    #[error("request line or header line too long")]
    LineTooLong,
}

/// Reads one request from `reader`.
///
/// Returns `Ok(None)` when the stream is closed or the first line is blank:
/// there is nothing to respond to. Malformed header lines are skipped and a
/// missing or invalid `Content-Length` means an empty body. A body shorter
/// than declared is accepted as-is once the stream runs dry.
///
/// Lines longer than [`MAX_LINE`] fail the parse. The caller is responsible
/// for bounding how long each read may wait.
pub async fn parse_http_request<R>(reader: &mut R) -> Result<Option<Request>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let request_line = match read_line(reader).await? {
        Some(line) if !line.trim().is_empty() => line,
        _ => return Ok(None),
    };

    let mut parts = request_line.split_whitespace();
    let (Some(method), Some(target)) = (parts.next(), parts.next()) else {
        return Err(ParseError::MissingTarget);
    };
    let version = parts.next().unwrap_or(DEFAULT_VERSION);

    let (raw_path, query) = match target.split_once('?') {
        Some((path, query)) => (path, parse_query(query)),
        None => (target, HashMap::new()),
    };

    let mut request = Request {
        method: method.to_string(),
        path: percent::decode(raw_path),
        target: target.to_string(),
        version: version.to_string(),
        headers: read_headers(reader).await?,
        query,
        body: Vec::new(),
    };

    let len = request.content_length();
    if len > 0 {
        let mut body = Vec::with_capacity(len.min(64 * 1024));
        let mut limited = reader.take(len as u64);
        limited.read_to_end(&mut body).await?;
        request.body = body;
    }

    Ok(Some(request))
}

/// Parses `a=1&b&c=%20` into a map. Empty segments are ignored and a bare key
/// maps to the empty string.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (percent::decode(k), percent::decode(v)),
            None => (percent::decode(pair), String::new()),
        })
        .collect()
}

async fn read_headers<R>(reader: &mut R) -> Result<Headers, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut headers = Headers::new();

    while let Some(line) = read_line(reader).await? {
        if line.is_empty() {
            break;
        }

        // No colon, or an empty name: skip the line
        match line.find(':') {
            Some(colon) if colon > 0 => {
                headers.insert(line[..colon].trim(), line[colon + 1..].trim());
            }
            _ => tracing::trace!(line = %line, "Skipping malformed header line"),
        }
    }

    Ok(headers)
}

/// Reads a line terminated by LF or CRLF, without the terminator.
/// `None` means the stream ended before any byte was read.
async fn read_line<R>(reader: &mut R) -> Result<Option<String>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut limited = (&mut *reader).take(MAX_LINE as u64);
    let n = limited.read_until(b'\n', &mut buf).await?;
    if n == 0 {
        return Ok(None);
    }
    if n == MAX_LINE && buf.last() != Some(&b'\n') {
        return Err(ParseError::LineTooLong);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }

    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}
