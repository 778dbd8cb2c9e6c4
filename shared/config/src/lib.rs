//! Environment-driven configuration for the inventory service (§6.3).

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database connection URL.
    pub database_url: String,

    /// Upper bound on pooled Postgres connections.
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    /// Server-side statement timeout, bounding a stuck lock's blast radius.
    #[serde(default = "default_statement_timeout_ms")]
    pub database_statement_timeout_ms: u64,

    /// REST bind port.
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// gRPC bind port.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Bound on concurrent in-flight RPCs.
    #[serde(default = "default_rpc_max_concurrent")]
    pub rpc_max_concurrent_requests: usize,

    /// Optional NATS URL. When unset, the engine falls back to the logging
    /// event sink — the engine is correct either way (spec.md §9).
    pub nats_url: Option<String>,
}

fn default_max_connections() -> u32 {
    10
}

fn default_statement_timeout_ms() -> u64 {
    5000
}

fn default_http_port() -> u16 {
    8080
}

fn default_rpc_port() -> u16 {
    8081
}

fn default_rpc_max_concurrent() -> usize {
    256
}

impl Config {
    /// Load configuration from the environment, layering a `.env` file (if
    /// present) underneath real environment variables.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let _ = dotenvy::dotenv();

        let builder = config::Config::builder()
            .set_default("database_max_connections", 10)?
            .set_default("database_statement_timeout_ms", 5000)?
            .set_default("http_port", 8080)?
            .set_default("rpc_port", 8081)?
            .set_default("rpc_max_concurrent_requests", 256)?
            .add_source(config::Environment::default());

        builder.build()?.try_deserialize()
    }
}
