use crate::config::ScrapeConfig;
use crate::error::{Result, ScraperError};
use crate::parser::count_matches;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Page loading collaborator: navigate to a listing and hand back its markup
/// once the entry selector is present.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn load(&self, url: &str, ready_selector: &str, timeout: Duration) -> Result<String>;
}

/// Fetches listing pages over HTTP, polling until the entries show up.
pub struct HttpPageSource {
    client: reqwest::Client,
    poll_interval: Duration,
    settle_delay: Duration,
}

impl HttpPageSource {
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let language = HeaderValue::from_str(&config.accept_language)
            .map_err(|e| ScraperError::Config(format!("Invalid accept_language: {}", e)))?;
        headers.insert(ACCEPT_LANGUAGE, language);

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(config.ready_timeout())
            .build()?;

        Ok(Self {
            client,
            poll_interval: Duration::from_secs(1),
            settle_delay: config.page_delay(),
        })
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn load(&self, url: &str, ready_selector: &str, timeout: Duration) -> Result<String> {
        info!("Opening page {}", url);
        let deadline = Instant::now() + timeout;

        loop {
            let body = self.fetch(url).await?;
            let found = count_matches(&body, ready_selector)?;
            if found > 0 {
                debug!("{} entries matched '{}' on {}", found, ready_selector, url);
                tokio::time::sleep(self.settle_delay).await;
                return Ok(body);
            }

            if Instant::now() + self.poll_interval >= deadline {
                warn!("Timed out waiting for '{}' on {}", ready_selector, url);
                return Err(ScraperError::PageNotReady {
                    url: url.to_string(),
                    selector: ready_selector.to_string(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
