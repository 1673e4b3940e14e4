use std::sync::Arc;

use miniweb::config::Config;
use miniweb::logging::{self, FileLog, LogSink};
use miniweb::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let cfg = match Config::load() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            tracing::error!("Startup failed: {:#}", e);
            return Err(e);
        }
    };
    let log: Arc<dyn LogSink> = Arc::new(FileLog::new(cfg.log_directory.clone()));

    tokio::select! {
        res = server::listener::run(Arc::clone(&cfg), log) => {
            if let Err(e) = &res {
                tracing::error!("Server stopped: {:#}", e);
            }
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
