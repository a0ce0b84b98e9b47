//! Rokubun AI Gateway - journaling app backend
//!
//! Async gateway service with retry/fallback dispatch over Gemini

use std::process::ExitCode;

use rokubun_gateway::{Config, server::HttpServer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Local development reads .env; deployed environments inject variables.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::from_env();

    match HttpServer::new(config).start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
