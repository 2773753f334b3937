//! Connect to a game gateway and obey `bt` chat commands
//!
//! Run with: cargo run --bin blockbot -- <host> <port> [<username>] [<password>] [-v]

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use blockbot::config::{SessionConfig, VIEWER_PORT};
use blockbot::{Dispatcher, Error, Session, ViewerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = SessionConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_filter().into()),
        )
        .init();

    tracing::info!(host = %config.host, port = config.port, username = %config.username, "connecting");
    let (session, events) = Session::connect(config.client_config()).await?;

    let mut dispatcher = Dispatcher::new(Arc::new(session));
    if config.verbose {
        dispatcher = dispatcher.with_viewer(ViewerConfig {
            port: VIEWER_PORT,
            first_person: false,
        });
    }

    match dispatcher.run(events).await {
        Ok(()) => Ok(()),
        Err(Error::Disconnected { reason }) => {
            tracing::info!(%reason, "session ended");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
