//! Server configuration loaded via OrthoConfig.
//!
//! Every field can be set with a `FOODGRAM_`-prefixed environment variable
//! (for example `FOODGRAM_DATABASE_URL`), a command-line flag or a
//! configuration file.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::security::{DEFAULT_BCRYPT_COST, MAX_BCRYPT_COST, MIN_BCRYPT_COST};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MEDIA_ROOT: &str = "media";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("bcrypt cost {cost} is outside {min}..={max}")]
    BcryptCost { cost: u32, min: u32, max: u32 },
}

/// Configuration values for the HTTP server and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FOODGRAM")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. Without it the server keeps everything in
    /// memory.
    pub database_url: Option<String>,
    /// File holding the cookie signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`.
    pub cookie_secure: Option<bool>,
    /// `SameSite` policy for session cookies: `Strict`, `Lax` or `None`.
    pub same_site: Option<String>,
    /// Fall back to a random session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub allow_ephemeral_session_key: bool,
    /// Directory recipe images are written to.
    pub media_root: Option<PathBuf>,
    /// Work factor for password hashes.
    pub bcrypt_cost: Option<u32>,
    /// Apply pending database migrations on start-up. Defaults to `true`.
    pub run_migrations: Option<bool>,
}

impl ServerSettings {
    /// Parsed listen address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Whether to apply pending migrations before serving.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    pub fn media_root(&self) -> PathBuf {
        self.media_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_ROOT))
    }

    /// Password hashing cost, checked against the range bcrypt accepts.
    pub fn bcrypt_cost(&self) -> Result<u32, SettingsError> {
        let cost = self.bcrypt_cost.unwrap_or(DEFAULT_BCRYPT_COST);
        if (MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
            Ok(cost)
        } else {
            Err(SettingsError::BcryptCost {
                cost,
                min: MIN_BCRYPT_COST,
                max: MAX_BCRYPT_COST,
            })
        }
    }
}
