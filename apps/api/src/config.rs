use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_ENGINE_CONFIG_PATH: &str = "config/engine.json";

/// Process configuration loaded from environment variables.
/// Scoring constants live in the engine settings file, not here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Catalog artifact: postings plus their embedding rows.
    pub catalog_path: PathBuf,
    pub engine_config_path: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            catalog_path: require_env("CATALOG_PATH")?.into(),
            engine_config_path: std::env::var("ENGINE_CONFIG_PATH")
                .unwrap_or_else(|_| DEFAULT_ENGINE_CONFIG_PATH.to_string())
                .into(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
