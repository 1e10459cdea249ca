//! Environment-driven server settings.
//!
//! Everything is read through [`mockable::Env`] so the parsing rules can be
//! exercised with `MockEnv` instead of the process environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use mockable::Env;
use todo_backend::inbound::http::failure_policy::{
    STORAGE_POLICY_EXPECTED, StorageFailurePolicy,
};

const PORT_ENV: &str = "PORT";
const BIND_HOST_ENV: &str = "TODO_BIND_HOST";
const DATABASE_PATH_ENV: &str = "TODO_DATABASE_PATH";
const POOL_SIZE_ENV: &str = "TODO_DB_POOL_SIZE";
const STATIC_DIR_ENV: &str = "TODO_STATIC_DIR";
const COOKIE_SECURE_ENV: &str = "TODO_COOKIE_SECURE";
const STORAGE_FAILURES_ENV: &str = "TODO_STORAGE_FAILURES";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_PATH: &str = "./todos.db";
const DEFAULT_POOL_SIZE: u32 = 4;
const DEFAULT_STATIC_DIR: &str = ".";

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const PORT_EXPECTED: &str = "an integer port in 1..=65535";
const HOST_EXPECTED: &str = "an IPv4 or IPv6 address";
const POOL_SIZE_EXPECTED: &str = "a positive integer";

/// Settings needed to start the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Listen address.
    pub bind_addr: SocketAddr,
    /// SQLite database file.
    pub database_path: String,
    /// Maximum pooled database connections.
    pub pool_size: u32,
    /// Directory holding the client scripts.
    pub static_dir: PathBuf,
    /// Whether issued identity cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// What handlers do when storage fails.
    pub storage_failures: StorageFailurePolicy,
}

/// Errors raised while reading server settings.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl ConfigError {
    fn invalid(name: &'static str, value: String, expected: &'static str) -> Self {
        Self::InvalidEnv {
            name,
            value,
            expected,
        }
    }
}

/// Build server settings from environment variables.
///
/// Unset variables take their defaults; set but unparsable ones are errors.
pub fn server_settings_from_env<E: Env>(env: &E) -> Result<ServerSettings, ConfigError> {
    let host = bind_host_from_env(env)?;
    let port = port_from_env(env)?;
    let storage_failures = match env.string(STORAGE_FAILURES_ENV) {
        Some(value) => value.parse().map_err(|_| {
            ConfigError::invalid(STORAGE_FAILURES_ENV, value, STORAGE_POLICY_EXPECTED)
        })?,
        None => StorageFailurePolicy::default(),
    };

    Ok(ServerSettings {
        bind_addr: SocketAddr::new(host, port),
        database_path: env
            .string(DATABASE_PATH_ENV)
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_owned()),
        pool_size: pool_size_from_env(env)?,
        static_dir: env
            .string(STATIC_DIR_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR), PathBuf::from),
        cookie_secure: cookie_secure_from_env(env)?,
        storage_failures,
    })
}

fn port_from_env<E: Env>(env: &E) -> Result<u16, ConfigError> {
    let Some(value) = env.string(PORT_ENV) else {
        return Ok(DEFAULT_PORT);
    };
    match value.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ConfigError::invalid(PORT_ENV, value, PORT_EXPECTED)),
    }
}

fn bind_host_from_env<E: Env>(env: &E) -> Result<IpAddr, ConfigError> {
    let Some(value) = env.string(BIND_HOST_ENV) else {
        return Ok(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    };
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(BIND_HOST_ENV, value, HOST_EXPECTED))
}

fn pool_size_from_env<E: Env>(env: &E) -> Result<u32, ConfigError> {
    let Some(value) = env.string(POOL_SIZE_ENV) else {
        return Ok(DEFAULT_POOL_SIZE);
    };
    match value.trim().parse::<u32>() {
        Ok(size) if size >= 1 => Ok(size),
        _ => Err(ConfigError::invalid(POOL_SIZE_ENV, value, POOL_SIZE_EXPECTED)),
    }
}

fn cookie_secure_from_env<E: Env>(env: &E) -> Result<bool, ConfigError> {
    let Some(value) = env.string(COOKIE_SECURE_ENV) else {
        return Ok(false);
    };
    parse_bool(&value).ok_or_else(|| ConfigError::invalid(COOKIE_SECURE_ENV, value, BOOL_EXPECTED))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
