//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use ticketing::{OrchestratorConfig, QrCodeGenerator};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `5000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `text` or `json` (default: `text`)
/// - `ARTIFACT_ROOT`: directory holding ticket images (default: `"uploads"`)
/// - `ADMIN_SECRET`: admin secret, empty disables admin routes
/// - `DATABASE_URL`: PostgreSQL URL, in-memory order store when unset
/// - `PURCHASE_MAX_ATTEMPTS`: attempts per contended purchase (default: `2`)
/// - `QR_MODULE_SCALE`: pixels per QR module (default: `8`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub artifact_root: PathBuf,
    pub admin_secret: String,
    pub database_url: Option<String>,
    pub purchase_max_attempts: u32,
    pub qr_module_scale: u32,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT").unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: lookup("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or(defaults.log_format),
            artifact_root: lookup("ARTIFACT_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.artifact_root),
            admin_secret: lookup("ADMIN_SECRET").unwrap_or(defaults.admin_secret),
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            purchase_max_attempts: parse_var(&lookup, "PURCHASE_MAX_ATTEMPTS")
                .filter(|n: &u32| *n >= 1)
                .unwrap_or(defaults.purchase_max_attempts),
            qr_module_scale: parse_var(&lookup, "QR_MODULE_SCALE")
                .filter(|n: &u32| (1..=QrCodeGenerator::MAX_MODULE_SCALE).contains(n))
                .unwrap_or(defaults.qr_module_scale),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn orchestrator(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            max_attempts: self.purchase_max_attempts,
        }
    }

    pub fn code_generator(&self) -> QrCodeGenerator {
        QrCodeGenerator::with_module_scale(self.qr_module_scale)
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|value| value.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            artifact_root: PathBuf::from("uploads"),
            admin_secret: String::new(),
            database_url: None,
            purchase_max_attempts: OrchestratorConfig::default().max_attempts,
            qr_module_scale: QrCodeGenerator::DEFAULT_MODULE_SCALE,
        }
    }
}
