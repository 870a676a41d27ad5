//! Configuration resolution for moodsense
//!
//! Settings resolve with CLI flag → environment variable → TOML file →
//! compiled default priority. The upload size ceiling and target frame
//! dimensions are fixed constants of the service contract, not settings.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

const DEFAULT_BIND: &str = "0.0.0.0:8000";
const DEFAULT_CLASSIFIER_URL: &str = "http://127.0.0.1:5005";
const DEFAULT_CLASSIFIER_TIMEOUT_SECS: u64 = 30;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "moodsense", about = "Facial emotion analysis HTTP microservice")]
pub struct Args {
    /// Address to listen on (e.g. 0.0.0.0:8000)
    #[arg(long, env = "MOODSENSE_BIND")]
    pub bind: Option<String>,

    /// Base URL of the face-analysis sidecar
    #[arg(long, env = "MOODSENSE_CLASSIFIER_URL")]
    pub classifier_url: Option<String>,

    /// Per-request classifier timeout in seconds
    #[arg(long, env = "MOODSENSE_CLASSIFIER_TIMEOUT_SECS")]
    pub classifier_timeout_secs: Option<u64>,

    /// Path to a TOML config file
    #[arg(long, env = "MOODSENSE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Optional TOML configuration file contents
#[derive(Debug, Default, Deserialize)]
pub struct TomlConfig {
    pub bind: Option<String>,
    pub classifier_url: Option<String>,
    pub classifier_timeout_secs: Option<u64>,
}

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen address
    pub bind: SocketAddr,
    /// Base URL of the face-analysis sidecar
    pub classifier_url: String,
    /// Per-request classifier timeout
    pub classifier_timeout: Duration,
}

impl Config {
    /// Resolve configuration from arguments, environment, and TOML file.
    pub fn load(args: &Args) -> Result<Self> {
        let toml_config = match &args.config {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                let parsed: TomlConfig = toml::from_str(&content)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?;
                info!("Loaded config file: {}", path.display());
                parsed
            }
            None => TomlConfig::default(),
        };

        let bind_str = args
            .bind
            .clone()
            .or(toml_config.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_str
            .parse()
            .with_context(|| format!("Invalid bind address: {}", bind_str))?;

        let classifier_url = args
            .classifier_url
            .clone()
            .or(toml_config.classifier_url)
            .unwrap_or_else(|| DEFAULT_CLASSIFIER_URL.to_string());

        if !classifier_url.starts_with("http://") && !classifier_url.starts_with("https://") {
            warn!(
                "Classifier URL has no http(s) scheme: {} (requests will likely fail)",
                classifier_url
            );
        }

        let timeout_secs = args
            .classifier_timeout_secs
            .or(toml_config.classifier_timeout_secs)
            .unwrap_or(DEFAULT_CLASSIFIER_TIMEOUT_SECS);

        Ok(Self {
            bind,
            classifier_url,
            classifier_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_args() -> Args {
        Args {
            bind: None,
            classifier_url: None,
            classifier_timeout_secs: None,
            config: None,
        }
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::load(&no_args()).unwrap();

        assert_eq!(config.bind.to_string(), "0.0.0.0:8000");
        assert_eq!(config.classifier_url, "http://127.0.0.1:5005");
        assert_eq!(config.classifier_timeout, Duration::from_secs(30));
    }

    #[test]
    fn cli_flags_override_defaults() {
        let args = Args {
            bind: Some("127.0.0.1:9100".to_string()),
            classifier_url: Some("http://10.0.0.5:5005".to_string()),
            classifier_timeout_secs: Some(5),
            config: None,
        };

        let config = Config::load(&args).unwrap();
        assert_eq!(config.bind.to_string(), "127.0.0.1:9100");
        assert_eq!(config.classifier_url, "http://10.0.0.5:5005");
        assert_eq!(config.classifier_timeout, Duration::from_secs(5));
    }

    #[test]
    fn toml_file_fills_unset_fields() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("moodsense_test_{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "bind = \"127.0.0.1:9200\"\nclassifier_timeout_secs = 10\n",
        )
        .unwrap();

        let args = Args {
            config: Some(path.clone()),
            ..no_args()
        };

        let config = Config::load(&args).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.bind.to_string(), "127.0.0.1:9200");
        assert_eq!(config.classifier_url, "http://127.0.0.1:5005");
        assert_eq!(config.classifier_timeout, Duration::from_secs(10));
    }

    #[test]
    fn invalid_bind_address_is_rejected() {
        let args = Args {
            bind: Some("not-an-address".to_string()),
            ..no_args()
        };

        assert!(Config::load(&args).is_err());
    }

    #[test]
    fn flag_beats_toml() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("moodsense_test_prio_{}.toml", std::process::id()));
        std::fs::write(&path, "classifier_url = \"http://from-toml:5005\"\n").unwrap();

        let args = Args {
            classifier_url: Some("http://from-flag:5005".to_string()),
            config: Some(path.clone()),
            ..no_args()
        };

        let config = Config::load(&args).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.classifier_url, "http://from-flag:5005");
    }
}
