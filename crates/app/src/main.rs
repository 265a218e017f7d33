mod cli;
mod config;
mod http;
mod state;
mod wiring;

use clap::Parser;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::ConfigError;
use crate::http::HttpError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("http error: {0}")]
    Http(#[from] HttpError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    config::load_dotenv()?;
    let mut config = config::AppConfig::from_env()?;
    config.apply_cli(&cli);
    info!(
        posts_dir = %config.posts_dir.display(),
        static_dir = %config.static_dir.display(),
        post_locks = config.post_locks.as_str(),
        edit_applies_media = config.edit_applies_media,
        "configuration loaded"
    );

    let state = wiring::build_state(config);
    let addr = state.config.http_addr;
    let api = tokio::spawn(async move {
        info!(%addr, "http server starting");
        http::serve(addr, state).await
    });

    tokio::select! {
        _ = shutdown_signal() => {
            info!("shutdown signal received");
        }
        res = api => {
            res??;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to install ctrl-c handler");
    }
}
