use std::fmt;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

pub const DEFAULT_BASE_URL: &str = "https://services.onetcenter.org/ws";
pub const DEFAULT_OUTPUT_DIR: &str = "./occupation_data";

/// Basic auth credentials for the occupation web service.
/// Loaded once at startup and handed to the transport client.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub base_url: String,
    pub output_dir: PathBuf,
    /// Report detail-stage HTTP failures as run notices instead of only logging them.
    pub report_detail_fetch_failures: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            credentials: Credentials {
                username: require_env("ONET_USERNAME")?,
                password: require_env("ONET_PASSWORD")?,
            },
            base_url: std::env::var("ONET_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            output_dir: std::env::var("OUTPUT_DIR")
                .unwrap_or_else(|_| DEFAULT_OUTPUT_DIR.to_string())
                .into(),
            report_detail_fetch_failures: match std::env::var("REPORT_DETAIL_FETCH_FAILURES") {
                Ok(raw) => parse_flag(&raw)
                    .context("REPORT_DETAIL_FETCH_FAILURES must be a boolean")?,
                Err(_) => false,
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => bail!("unrecognised flag value '{other}'"),
    }
}
