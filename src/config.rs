// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! parsed [`ServerConfig`]. Configuration is loaded from the environment once
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8000` |
//! | `DATA_DIR` | Directory holding the note database | `./data` |
//! | `ACCESS_TOKEN_SECRET` | HS256 signing secret (at least 32 bytes) | Ephemeral random key |
//! | `TOKEN_TTL_MINUTES` | Bearer token validity window | `36000` |
//! | `TLS_CERT_PATH` | PEM certificate chain (enables HTTPS) | Unset |
//! | `TLS_KEY_PATH` | PEM private key (enables HTTPS) | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `notes_server=info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::logging::LogFormat;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the database directory.
///
/// The redb file [`DATABASE_FILE`] is created inside this directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the token signing secret.
///
/// When unset a random key is generated at startup and every issued token
/// becomes invalid on restart.
pub const ACCESS_TOKEN_SECRET_ENV: &str = "ACCESS_TOKEN_SECRET";

pub const TOKEN_TTL_MINUTES_ENV: &str = "TOKEN_TTL_MINUTES";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DATABASE_FILE: &str = "notes.redb";

/// Token validity window: 36000 minutes (25 days).
pub const DEFAULT_TOKEN_TTL_MINUTES: u64 = 36_000;

/// HS256 keys shorter than the hash output weaken the MAC.
pub const MIN_SECRET_LEN: usize = 32;

/// Configuration errors raised while reading the environment.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid bind address {0}")]
    InvalidBindAddress(String),

    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("ACCESS_TOKEN_SECRET must be at least 32 bytes")]
    SecretTooShort,

    #[error("TLS_CERT_PATH and TLS_KEY_PATH must be set together")]
    IncompleteTls,

    #[error("unknown LOG_FORMAT {0:?} (expected json or pretty)")]
    InvalidLogFormat(String),
}

/// PEM files for the optional HTTPS listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Parsed server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    /// Signing secret; `None` means an ephemeral key is generated.
    pub token_secret: Option<Vec<u8>>,
    pub token_ttl: Duration,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidNumber {
                name: PORT_ENV,
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };
        let bind_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(format!("{host}:{port}")))?;

        let data_dir = lookup(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let token_secret = match lookup(ACCESS_TOKEN_SECRET_ENV) {
            Some(secret) if secret.len() < MIN_SECRET_LEN => {
                return Err(ConfigError::SecretTooShort)
            }
            Some(secret) => Some(secret.into_bytes()),
            None => None,
        };

        let ttl_secs = match lookup(TOKEN_TTL_MINUTES_ENV) {
            Some(raw) => match raw.trim().parse::<u64>().ok().and_then(|m| m.checked_mul(60)) {
                Some(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        name: TOKEN_TTL_MINUTES_ENV,
                        value: raw,
                    })
                }
            },
            None => DEFAULT_TOKEN_TTL_MINUTES * 60,
        };

        let tls = match (lookup(TLS_CERT_PATH_ENV), lookup(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: PathBuf::from(cert),
                key: PathBuf::from(key),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };

        let log_format = match lookup(LOG_FORMAT_ENV) {
            Some(raw) => LogFormat::parse(&raw).ok_or(ConfigError::InvalidLogFormat(raw))?,
            None => LogFormat::Pretty,
        };

        Ok(Self {
            bind_addr,
            data_dir,
            token_secret,
            token_ttl: Duration::from_secs(ttl_secs),
            tls,
            log_format,
        })
    }

    /// Full path of the redb database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}
