//! Configuration model loaded from external sources.

use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

use crate::domain::query::{QueryDefaults, SortBy};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[cfg(feature = "cli")]
    #[error("Error loading settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn default_catalog_page_size() -> usize {
    crate::DEFAULT_PAGE_SIZE
}

fn default_wishlist_page_size() -> usize {
    10
}

fn default_max_page_size() -> usize {
    crate::MAX_PAGE_SIZE
}

#[derive(Clone, Debug, Deserialize, Validate)]
/// Settings shared by every listing view of the storefront.
pub struct StorefrontConfig {
    /// Base URL of the marketplace API.
    #[validate(url)]
    pub api_base_url: String,
    #[serde(default = "default_catalog_page_size")]
    #[validate(range(min = 1))]
    pub catalog_page_size: usize,
    #[serde(default = "default_wishlist_page_size")]
    #[validate(range(min = 1))]
    pub wishlist_page_size: usize,
    #[serde(default = "default_max_page_size")]
    #[validate(range(min = 1))]
    pub max_page_size: usize,
}

impl StorefrontConfig {
    /// Field validation plus the page size ceiling.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        let largest = self.catalog_page_size.max(self.wishlist_page_size);
        if largest > self.max_page_size {
            return Err(ConfigError::Invalid(format!(
                "page size {largest} exceeds max_page_size {}",
                self.max_page_size
            )));
        }
        Ok(())
    }

    /// Catalog: newest listings first.
    pub fn catalog_defaults(&self) -> QueryDefaults {
        QueryDefaults::new(self.catalog_page_size, SortBy::Latest).max_page_size(self.max_page_size)
    }

    /// Wishlist: most recently saved first.
    pub fn wishlist_defaults(&self) -> QueryDefaults {
        QueryDefaults::new(self.wishlist_page_size, SortBy::AddTime)
            .max_page_size(self.max_page_size)
    }

    /// Reads `<dir>/default.*`, then `<dir>/<app_env>.*`, then `APP_*`
    /// environment variables; later sources win.
    #[cfg(feature = "cli")]
    pub fn load(dir: &std::path::Path, app_env: &str) -> Result<Self, ConfigError> {
        use config::{Config, Environment, File};

        let settings = Config::builder()
            .add_source(File::with_name(&dir.join("default").to_string_lossy()).required(false))
            .add_source(File::with_name(&dir.join(app_env).to_string_lossy()).required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?;

        let config: StorefrontConfig = settings.try_deserialize()?;
        config.check()?;
        Ok(config)
    }
}
