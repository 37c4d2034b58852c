use crate::{CrawlerError, Fetch};
use tokio::{
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing::debug;

/// Fetches pages over HTTP, keeping at least `delay` between the start of
/// two consecutive requests.
#[derive(Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client, delay: Duration) -> Self {
        HttpFetcher {
            client,
            delay,
            last_request: Mutex::new(None),
        }
    }
}

#[async_trait::async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, CrawlerError> {
        let mut last_request = self.last_request.lock().await;
        if let Some(last) = last_request.take() {
            let elapsed = Instant::now().duration_since(last);
            if elapsed < self.delay {
                tokio::time::sleep(self.delay - elapsed).await;
            }
        }
        last_request.replace(Instant::now());

        debug!("Visit {}", url);
        let html = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_failed_fetch_is_error() {
        let fetcher = HttpFetcher::new(reqwest::Client::new(), Duration::from_millis(0));
        assert!(matches!(
            fetcher.fetch("http://127.0.0.1:1/newspaper").await,
            Err(CrawlerError::HttpError(_))
        ));
    }

    #[tokio::test]
    async fn test_requests_are_spaced_by_delay() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/newspaper"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(2)
            .mount(&server)
            .await;

        let delay = Duration::from_millis(300);
        let fetcher = HttpFetcher::new(reqwest::Client::new(), delay);
        let url = format!("{}/newspaper", server.uri());

        let start = Instant::now();
        assert_eq!(fetcher.fetch(&url).await.unwrap(), "<html></html>");
        fetcher.fetch(&url).await.unwrap();
        assert!(start.elapsed() >= delay);
    }

    #[tokio::test]
    async fn test_not_found_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(reqwest::Client::new(), Duration::from_millis(0));
        assert!(matches!(
            fetcher.fetch(&format!("{}/newspaper", server.uri())).await,
            Err(CrawlerError::HttpError(_))
        ));
    }
}
