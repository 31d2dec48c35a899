// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub database_path: PathBuf,
    pub deepseek_base_url: String,
    pub razorpay_base_url: String,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

impl EnvironmentConfig {
    /// Load configuration based on environment
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);
        Self::load_from_file(&environment)
    }

    fn get_environment() -> String {
        std::env::var("CVFORGE_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(environment: &str) -> Result<Self> {
        let config_path = PathBuf::from("config.yaml");
        if !config_path.exists() {
            anyhow::bail!(
                "config.yaml not found in current directory. Server cannot start without configuration."
            );
        }

        let config_content =
            std::fs::read_to_string(&config_path).context("Failed to read config.yaml")?;

        let config_file: ConfigFile =
            serde_yaml::from_str(&config_content).context("Failed to parse config.yaml")?;

        let config = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };

        Ok(config)
    }
}

/// Credentials for the external services, read from env. Empty values are
/// treated as absent so the status endpoint reports them accurately.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    pub deepseek_api_key: Option<String>,
    pub razorpay_key_id: Option<String>,
    pub razorpay_key_secret: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self {
            deepseek_api_key: non_empty_env("DEEPSEEK_API_KEY"),
            razorpay_key_id: non_empty_env("RAZORPAY_KEY_ID"),
            razorpay_key_secret: non_empty_env("RAZORPAY_KEY_SECRET"),
        }
    }

    pub fn has_deepseek_key(&self) -> bool {
        self.deepseek_api_key.is_some()
    }

    pub fn has_razorpay_keys(&self) -> bool {
        self.razorpay_key_id.is_some() && self.razorpay_key_secret.is_some()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secrets_flags() {
        let secrets = Secrets {
            deepseek_api_key: Some("sk-test".to_string()),
            razorpay_key_id: Some("rzp_key".to_string()),
            razorpay_key_secret: None,
        };
        assert!(secrets.has_deepseek_key());
        assert!(!secrets.has_razorpay_keys());

        let empty = Secrets::default();
        assert!(!empty.has_deepseek_key());
        assert!(!empty.has_razorpay_keys());
    }
}
