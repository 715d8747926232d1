//! Standalone server answering every request with a plain-text greeting.
//!
//! Binds `NOTEJAR_HOST` (default `127.0.0.1`) on port 3000.

use anyhow::{Context, Result};
use notejar::Config;
use notejar::logging::{Verbosity, init_logging};
use notejar::web::{self, GREETER_PORT};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_logging(Verbosity::Verbose);

    let config = Config::from_env().context("Failed to load configuration")?;
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), GREETER_PORT))
        .await
        .with_context(|| format!("Failed to bind {}:{GREETER_PORT}", config.host))?;
    println!("Server is up on http://{}", listener.local_addr()?);

    web::serve(listener, web::greeter_router()).await?;
    Ok(())
}
