use super::Summary;
use crate::{CrawlerError, Summarize};
use serde_json::json;
use tracing::debug;

/// Client for an article-extraction service that downloads a URL itself and
/// answers with a generated summary and keywords.
#[derive(Debug, Clone)]
pub struct HttpSummarizer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSummarizer {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        HttpSummarizer {
            client,
            endpoint: format!("{}/article", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait::async_trait]
impl Summarize for HttpSummarizer {
    async fn summarize(&self, url: &str) -> Result<Summary, CrawlerError> {
        debug!("Summarize {}", url);
        let summary = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "url": url }))
            .send()
            .await?
            .error_for_status()?
            .json::<Summary>()
            .await?;
        Ok(summary)
    }
}
