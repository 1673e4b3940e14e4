use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::config::Config;
use crate::http::deadline::DeadlineStream;
use crate::http::mime;
use crate::http::parser::parse_http_request;
use crate::http::request::Request;
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::logging::{self, LogSink};
use crate::static_files::{PathResolver, Resolution};

/// Body sent with a 404 when the root has no `404.html`.
pub const NOT_FOUND_BODY: &str = "<h1>404 Not Found</h1>";
pub const NOT_FOUND_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// State shared by every connection of a server.
#[derive(Clone)]
pub struct HandlerContext {
    pub config: Arc<Config>,
    pub resolver: PathResolver,
    pub log: Arc<dyn LogSink>,
}

impl HandlerContext {
    pub fn new(config: Arc<Config>, log: Arc<dyn LogSink>) -> Self {
        let resolver = PathResolver::new(config.root_directory.clone(), config.reject_traversal);
        Self {
            config,
            resolver,
            log,
        }
    }
}

/// Serves exactly one request on a stream, then closes it.
///
/// Every individual read and write on the stream is bounded by the
/// configured timeouts.
pub struct Connection<S> {
    stream: DeadlineStream<S>,
    peer: String,
    ctx: HandlerContext,
    state: ConnectionState,
}

pub enum ConnectionState {
    Accepted,
    Parsing,
    Resolving(Request),
    Responding(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: impl Into<String>, ctx: HandlerContext) -> Self {
        let stream = DeadlineStream::new(
            stream,
            ctx.config.read_timeout(),
            ctx.config.write_timeout(),
        );
        Self {
            stream,
            peer: peer.into(),
            ctx,
            state: ConnectionState::Accepted,
        }
    }

    /// Drives the connection to `Closed`.
    ///
    /// Any error leaves the state at `Closed` and is returned without a
    /// response having been written.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Accepted => {
                    self.state = ConnectionState::Parsing;
                }

                ConnectionState::Parsing => match self.read_request().await? {
                    Some(req) => self.state = ConnectionState::Resolving(req),
                    None => {
                        tracing::debug!(peer = %self.peer, "Empty request, closing");
                    }
                },

                ConnectionState::Resolving(req) => {
                    self.log_request(&req);
                    let response = self.respond_to(&req).await?;

                    tracing::debug!(
                        peer = %self.peer,
                        status = response.status.as_u16(),
                        bytes = response.content_length(),
                        gzip = response.content_encoding.is_some(),
                        "Responding"
                    );
                    self.state = ConnectionState::Responding(ResponseWriter::new(&response));
                }

                ConnectionState::Responding(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                }

                ConnectionState::Closed => break,
            }
        }

        // The peer may already be gone
        let _ = self.stream.shutdown().await;
        Ok(())
    }

    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        let mut reader = BufReader::new(&mut self.stream);

        parse_http_request(&mut reader)
            .await
            .context("HTTP parse error")
    }

    fn log_request(&self, req: &Request) {
        tracing::info!(
            peer = %self.peer,
            method = %req.method,
            path = %req.path,
            "Request"
        );

        for entry in logging::request_entries(&self.peer, req) {
            self.ctx.log.append(&entry);
        }
    }

    async fn respond_to(&self, req: &Request) -> anyhow::Result<Response> {
        let accepts_gzip = req.accepts_gzip();

        match self.ctx.resolver.resolve(req.raw_path()).await {
            Resolution::Found(path) => file_response(StatusCode::OK, &path, accepts_gzip).await,
            Resolution::NotFound { page: Some(page) } => {
                file_response(StatusCode::NOT_FOUND, &page, accepts_gzip).await
            }
            Resolution::NotFound { page: None } => ResponseBuilder::new(StatusCode::NOT_FOUND)
                .content_type(NOT_FOUND_CONTENT_TYPE)
                .body(NOT_FOUND_BODY.as_bytes().to_vec())
                .gzip(accepts_gzip)
                .build()
                .context("failed to compress response body"),
        }
    }
}

async fn file_response(status: StatusCode, path: &Path, accepts_gzip: bool) -> anyhow::Result<Response> {
    let body = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    ResponseBuilder::new(status)
        .content_type(mime::content_type_for_path(path))
        .body(body)
        .gzip(accepts_gzip && mime::is_compressible(path))
        .build()
        .context("failed to compress response body")
}
