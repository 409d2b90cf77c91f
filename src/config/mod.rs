//! Configuration module for the Atlas backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

/// Gemini model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key guarding author routes (required in production)
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Directory receiving uploaded images
    pub upload_dir: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Gemini API key; absent means the AI assistant falls back
    pub gemini_api_key: Option<String>,
    /// Gemini model name
    pub gemini_model: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AddrParseError> {
        dotenvy::dotenv().ok();

        let api_psk = env::var("ATLAS_API_PSK").ok().filter(|k| !k.is_empty());

        let db_path = env::var("ATLAS_DB_PATH")
            .unwrap_or_else(|_| "./data/atlas.sqlite".to_string())
            .into();

        let upload_dir = env::var("ATLAS_UPLOAD_DIR")
            .unwrap_or_else(|_| "./data/uploads".to_string())
            .into();

        let bind_addr = env::var("ATLAS_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()?;

        let log_level = env::var("ATLAS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let gemini_api_key = env::var("ATLAS_GEMINI_API_KEY").ok();

        let gemini_model =
            env::var("ATLAS_GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());

        Ok(Self {
            api_psk,
            db_path,
            upload_dir,
            bind_addr,
            log_level,
            gemini_api_key,
            gemini_model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 7] = [
        "ATLAS_API_PSK",
        "ATLAS_DB_PATH",
        "ATLAS_UPLOAD_DIR",
        "ATLAS_BIND_ADDR",
        "ATLAS_LOG_LEVEL",
        "ATLAS_GEMINI_API_KEY",
        "ATLAS_GEMINI_MODEL",
    ];

    // Both cases live in one test so they never race on the process environment.
    #[test]
    fn test_config_from_env() {
        for var in VARS {
            env::remove_var(var);
        }

        let config = Config::from_env().unwrap();

        assert!(config.api_psk.is_none());
        assert_eq!(config.db_path, PathBuf::from("./data/atlas.sqlite"));
        assert_eq!(config.upload_dir, PathBuf::from("./data/uploads"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);

        env::set_var("ATLAS_BIND_ADDR", "not-an-address");
        assert!(Config::from_env().is_err());
        env::remove_var("ATLAS_BIND_ADDR");
    }
}
