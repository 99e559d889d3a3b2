use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use carhub::server::{self, ServerConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %err, "failed to initialise tracing subscriber");
    }

    server::run(ServerConfig::parse()).await
}
