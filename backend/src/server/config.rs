//! Command line and environment configuration.

use std::net::SocketAddr;

use clap::{Parser, ValueEnum};

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Relational storage over PostgreSQL (find-or-create lookups, audit
    /// trail).
    Postgres,
    /// Document storage over MongoDB (reject-unknown lookups).
    Mongodb,
    /// Non-durable in-process storage for local development.
    Memory,
}

/// Server configuration parsed from flags and environment variables.
#[derive(Debug, Clone, Parser)]
#[command(name = "carhub", about = "Car inventory CRUD service")]
pub struct ServerConfig {
    /// Socket address to bind the HTTP server to.
    #[arg(long, env = "CARHUB_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Storage backend to run against.
    #[arg(long, value_enum, env = "CARHUB_BACKEND", default_value = "memory")]
    pub backend: Backend,

    /// PostgreSQL connection string, required for the postgres backend.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// MongoDB connection string, required for the mongodb backend.
    #[arg(long, env = "MONGODB_URL")]
    pub mongodb_url: Option<String>,

    /// Skip schema and seed provisioning on startup.
    #[arg(long, default_value_t = false)]
    pub skip_provision: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_memory_backend_on_port_8080() {
        let config = ServerConfig::parse_from(["carhub"]);
        assert_eq!(config.backend, Backend::Memory);
        assert_eq!(config.bind.port(), 8080);
        assert!(!config.skip_provision);
    }

    #[test]
    fn flags_select_the_postgres_backend() {
        let config = ServerConfig::parse_from([
            "carhub",
            "--backend",
            "postgres",
            "--database-url",
            "postgres://localhost/carhub",
            "--skip-provision",
        ]);
        assert_eq!(config.backend, Backend::Postgres);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/carhub")
        );
        assert!(config.skip_provision);
    }
}
