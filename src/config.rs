use crate::constants::*;
use crate::error::{Result, ScraperError};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mongo: MongoConfig,
    pub scrape: ScrapeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    pub uri: Option<String>,
    pub database: String,
    pub collection: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: None,
            database: DEFAULT_MONGO_DB.to_string(),
            collection: DEFAULT_MONGO_COLL.to_string(),
        }
    }
}

impl MongoConfig {
    pub fn require_uri(&self) -> Result<&str> {
        self.uri
            .as_deref()
            .filter(|uri| !uri.trim().is_empty())
            .ok_or_else(|| ScraperError::Config(format!("Define {} in your .env", ENV_MONGO_URI)))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub list_urls: Vec<String>,
    pub max_catalog_size: usize,
    pub page_item_limit: usize,
    pub ready_timeout_secs: u64,
    pub page_delay_ms: u64,
    pub accept_language: String,
    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            list_urls: DEFAULT_LIST_URLS.iter().map(|u| u.to_string()).collect(),
            max_catalog_size: DEFAULT_MAX_CATALOG_SIZE,
            page_item_limit: DEFAULT_PAGE_ITEM_LIMIT,
            ready_timeout_secs: DEFAULT_READY_TIMEOUT_SECS,
            page_delay_ms: DEFAULT_PAGE_DELAY_MS,
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ScrapeConfig {
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

impl AppConfig {
    /// Reads the TOML file (missing file means defaults), then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                ScraperError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
            })?;
            Self::from_toml_str(&content)?
        } else {
            Self::default()
        };
        config.apply_env_with(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(uri) = lookup(ENV_MONGO_URI) {
            self.mongo.uri = Some(uri);
        }
        if let Some(db) = lookup(ENV_MONGO_DB) {
            self.mongo.database = db;
        }
        if let Some(coll) = lookup(ENV_MONGO_COLL) {
            self.mongo.collection = coll;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.scrape.max_catalog_size == 0 {
            return Err(ScraperError::Config("max_catalog_size must be at least 1".into()));
        }
        if self.scrape.page_item_limit == 0 {
            return Err(ScraperError::Config("page_item_limit must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_source_listing() {
        let config = AppConfig::default();
        assert_eq!(config.scrape.list_urls.len(), 2);
        assert_eq!(config.scrape.max_catalog_size, 500);
        assert_eq!(config.mongo.database, "movie-analysis-2025");
        assert_eq!(config.mongo.collection, "imdb-scraper");
        assert!(config.mongo.require_uri().is_err());
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [scrape]
            max_catalog_size = 100

            [mongo]
            collection = "top250"
            "#,
        )
        .unwrap();
        assert_eq!(config.scrape.max_catalog_size, 100);
        assert_eq!(config.scrape.page_item_limit, 250);
        assert_eq!(config.mongo.collection, "top250");
        assert_eq!(config.mongo.database, "movie-analysis-2025");
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut config = AppConfig::from_toml_str("[mongo]\ndatabase = \"from_file\"\n").unwrap();
        let env: HashMap<&str, &str> =
            [("MONGO_URI", "mongodb://localhost:27017"), ("MONGO_DB", "from_env")].into();
        config.apply_env_with(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.mongo.require_uri().unwrap(), "mongodb://localhost:27017");
        assert_eq!(config.mongo.database, "from_env");
        assert_eq!(config.mongo.collection, "imdb-scraper");
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[scrape]\npage_item_limit = 50\n").unwrap();
        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.scrape.page_item_limit, 50);
    }

    #[test]
    fn zero_catalog_size_is_rejected() {
        let config = AppConfig::from_toml_str("[scrape]\nmax_catalog_size = 0\n").unwrap();
        assert!(matches!(config.validate(), Err(ScraperError::Config(_))));
    }
}
