use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::services::QrSettings;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::SecurityHeaders;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/ingressos";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub port: u16,
    pub qr: QrSettings,
}

impl Config {
    pub fn from_env() -> Self {
        let qr_defaults = QrSettings::default();

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS),
            acquire_timeout: Duration::from_secs(parse_var(
                "DATABASE_ACQUIRE_TIMEOUT_SECS",
                DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )),
            port: parse_var("SERVER_PORT", DEFAULT_PORT),
            qr: QrSettings {
                version: parse_var("QR_VERSION", qr_defaults.version),
                width: parse_var("QR_WIDTH", qr_defaults.width),
                margin: parse_var("QR_MARGIN", qr_defaults.margin),
            },
        }
    }
}

/// Reads `key`, falling back to `default` when unset or unparseable.
fn parse_var<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Config: invalid {}='{}', using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
