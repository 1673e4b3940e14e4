use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Config;
use crate::http::connection::{Connection, HandlerContext};
use crate::logging::LogSink;

/// Pause after a failed accept, so a persistent error (e.g. out of file
/// descriptors) does not spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Binds the configured port on all interfaces and serves until the process
/// ends. Only a bind failure is returned.
pub async fn run(cfg: Arc<Config>, log: Arc<dyn LogSink>) -> anyhow::Result<()> {
    let addr = cfg.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(
        port = cfg.port,
        root = %cfg.root_directory.display(),
        "Listening on {}", addr
    );

    serve(listener, HandlerContext::new(cfg, log)).await;
    Ok(())
}

/// Accept loop. Each connection gets its own task; the loop never waits for
/// one to finish.
pub async fn serve(listener: TcpListener, ctx: HandlerContext) {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "Failed to accept connection");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };
        tracing::debug!("Accepted connection from {}", peer);

        let ctx = ctx.clone();
        tokio::spawn(async move {
            let peer = peer.to_string();
            let log = Arc::clone(&ctx.log);
            let mut conn = Connection::new(socket, peer.clone(), ctx);
            if let Err(e) = conn.run().await {
                tracing::error!(peer = %peer, error = ?e, "Connection error");
                log.append(&format!("Error handling client {}: {:#}", peer, e));
            }
        });
    }
}
