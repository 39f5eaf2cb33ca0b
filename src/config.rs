//! Configuration loader and validator for the shop admin server.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::fetch::MAX_PAGE_SIZE;
use crate::shopify::Session;

const SHOP_DOMAIN_SUFFIX: &str = ".myshopify.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub app: App,
    pub shopify: Shopify,
}

/// App-level settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct App {
    pub listen: String,
    pub data_dir: String,
    pub page_size: i64,
}

/// Shopify Admin API settings for the installed shop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Shopify {
    pub shop: String,
    pub access_token: String,
    pub api_version: String,
    /// Overrides `https://{shop}/`; mostly useful for tests and proxies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Config {
    /// Ensure required directories exist (creates `app.data_dir` if missing).
    pub fn ensure_dirs(&self) -> Result<(), std::io::Error> {
        if self.app.data_dir.trim().is_empty() {
            return Ok(());
        }
        fs::create_dir_all(&self.app.data_dir)
    }

    /// `DATABASE_URL` wins; otherwise a SQLite file inside `app.data_dir`.
    pub fn database_url(&self) -> String {
        std::env::var("DATABASE_URL").unwrap_or_else(|_| {
            format!(
                "sqlite://{}/shop_admin.db",
                self.app.data_dir.trim_end_matches('/')
            )
        })
    }

    /// Offline session for the configured shop.
    pub fn session(&self) -> Session {
        Session {
            shop: self.shopify.shop.clone(),
            access_token: self.shopify.access_token.clone(),
        }
    }
}

/// Load configuration from a YAML file and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.app.listen.trim().is_empty() {
        return Err(ConfigError::Invalid("app.listen must be non-empty"));
    }
    if cfg.app.data_dir.trim().is_empty() {
        return Err(ConfigError::Invalid("app.data_dir must be non-empty"));
    }
    if !(1..=MAX_PAGE_SIZE).contains(&cfg.app.page_size) {
        return Err(ConfigError::Invalid("app.page_size must be within 1..=250"));
    }

    let shop = cfg.shopify.shop.trim();
    if shop.is_empty() {
        return Err(ConfigError::Invalid("shopify.shop must be non-empty"));
    }
    if !shop.ends_with(SHOP_DOMAIN_SUFFIX) || shop.len() == SHOP_DOMAIN_SUFFIX.len() {
        return Err(ConfigError::Invalid(
            "shopify.shop must be a *.myshopify.com domain",
        ));
    }
    if cfg.shopify.access_token.trim().is_empty() {
        return Err(ConfigError::Invalid("shopify.access_token must be non-empty"));
    }
    if cfg.shopify.api_version.trim().is_empty() {
        return Err(ConfigError::Invalid("shopify.api_version must be non-empty"));
    }
    if let Some(base) = cfg.shopify.base_url.as_deref() {
        if reqwest::Url::parse(base).is_err() {
            return Err(ConfigError::Invalid("shopify.base_url must be a valid URL"));
        }
    }

    Ok(())
}

/// Returns the example YAML shipped with the project.
pub fn example() -> &'static str {
    r#"app:
  listen: "127.0.0.1:3000"
  data_dir: "./data"
  page_size: 10

shopify:
  shop: "example-store.myshopify.com"
  access_token: "YOUR_ADMIN_API_ACCESS_TOKEN"
  api_version: "2023-07"
"#
}
