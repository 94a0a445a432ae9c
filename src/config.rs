//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::{Context, bail};

use crate::service::password::DEFAULT_COST;

/// Which [`crate::persistence::Store`] implementation to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// MongoDB via [`crate::persistence::MongoStore`].
    Mongo,
    /// Volatile in-process storage.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(Self::Mongo),
            "memory" | "mem" => Ok(Self::Memory),
            other => bail!("unknown storage backend {other:?} (expected `mongo` or `memory`)"),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Storage implementation to use.
    pub storage_backend: StorageBackend,

    /// MongoDB connection string.
    pub mongo_uri: String,

    /// MongoDB database name.
    pub mongo_database: String,

    /// bcrypt work factor for new password hashes.
    pub bcrypt_cost: u32,

    /// Maximum GraphQL query depth.
    pub graphql_depth_limit: usize,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Log output format.
    pub log_format: LogFormat,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file, then
    /// defers to [`GatewayConfig::from_lookup`].
    ///
    /// # Errors
    ///
    /// See [`GatewayConfig::from_lookup`].
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// Falls back to defaults when a key is missing or unparseable (or zero,
    /// for the depth limit, timeout, and bus capacity), except for the keys
    /// listed below.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is not a socket address or
    /// `STORAGE_BACKEND` names an unknown backend.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr: SocketAddr = lookup("LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse()
            .context("LISTEN_ADDR is not a valid socket address")?;

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => StorageBackend::Mongo,
        };

        let mongo_database = lookup("MONGO_DB").unwrap_or_else(|| "events".to_string());
        let mongo_uri = lookup("MONGO_URI").unwrap_or_else(|| {
            mongo_uri_from_parts(
                lookup("MONGO_USER").as_deref(),
                lookup("MONGO_PASSWORD").as_deref().unwrap_or_default(),
                &lookup("MONGO_HOST").unwrap_or_else(|| "localhost:27017".to_string()),
                &mongo_database,
            )
        });

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            storage_backend,
            mongo_uri,
            mongo_database,
            bcrypt_cost: parse_key(&lookup, "BCRYPT_COST", DEFAULT_COST),
            graphql_depth_limit: parse_nonzero(&lookup, "GRAPHQL_DEPTH_LIMIT", 16),
            request_timeout_secs: parse_nonzero(&lookup, "REQUEST_TIMEOUT_SECS", 30),
            event_bus_capacity: parse_nonzero(&lookup, "EVENT_BUS_CAPACITY", 1024),
            log_format,
        })
    }
}

/// Assembles a MongoDB URI.
///
/// With credentials this produces an Atlas-style SRV URI with the password
/// percent-encoded; without, a plain `mongodb://host/db` URI.
#[must_use]
pub fn mongo_uri_from_parts(user: Option<&str>, password: &str, host: &str, db: &str) -> String {
    match user {
        Some(user) if !user.is_empty() => format!(
            "mongodb+srv://{}:{}@{host}/{db}?retryWrites=true&w=majority",
            urlencoding::encode(user),
            urlencoding::encode(password),
        ),
        _ => format!("mongodb://{host}/{db}"),
    }
}

/// Parses `key` as `T`, returning `default` on missing or invalid values.
fn parse_key<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Like [`parse_key`], but zero also counts as invalid.
fn parse_nonzero<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr + PartialEq + Default,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.parse().ok())
        .filter(|v: &T| *v != T::default())
        .unwrap_or(default)
}
