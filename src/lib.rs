use chrono::{Local, NaiveDate};
use tracing::{debug, error, info, warn};

pub mod dailystar;
pub mod enrich;

mod data;
mod error;
mod fetch;
mod index;
mod utils;

pub use data::Table;
pub use error::{CrawlerError, TaggingFailed};
pub use fetch::HttpFetcher;
pub use index::ElasticIndex;

use dailystar::{ArchiveDriver, ArticleStub, NewsDocument};
use enrich::{Entities, Summary};

#[async_trait::async_trait]
pub trait Fetch {
    async fn fetch(&self, url: &str) -> Result<String, CrawlerError>;
}

/// Summary and keyword generation for an article, given its URL.
#[async_trait::async_trait]
pub trait Summarize {
    async fn summarize(&self, url: &str) -> Result<Summary, CrawlerError>;
}

/// Entity and sentiment tagging over raw article text.
#[async_trait::async_trait]
pub trait Tag {
    async fn entities(&self, text: &str) -> Result<Entities, TaggingFailed>;
    async fn sentiment(&self, text: &str) -> Result<f64, CrawlerError>;
}

#[async_trait::async_trait]
pub trait DocumentIndex {
    async fn index(&self, id: u64, doc: &NewsDocument) -> Result<(), CrawlerError>;
}

#[async_trait::async_trait]
pub trait Storage {
    async fn results_count(&self) -> Result<u32, CrawlerError>;
    async fn results_insert(&self, doc: &NewsDocument) -> Result<(), CrawlerError>;
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CrawlReport {
    pub pages: u32,
    pub skipped_days: Vec<NaiveDate>,
    pub indexed: u32,
    pub failed: u32,
}

/// Sequential crawl-and-enrich loop: one archive page, then each of its
/// articles, then the next day.
pub struct Pipeline<F, S, T, I, D> {
    pub fetcher: F,
    pub summarizer: S,
    pub tagger: T,
    pub index: I,
    pub storage: D,
    next_id: u64,
}

impl<F, S, T, I, D> Pipeline<F, S, T, I, D>
where
    F: Fetch + Send + Sync,
    S: Summarize + Send + Sync,
    T: Tag + Send + Sync,
    I: DocumentIndex + Send + Sync,
    D: Storage + Send + Sync,
{
    pub fn new(fetcher: F, summarizer: S, tagger: T, index: I, storage: D) -> Self {
        Pipeline {
            fetcher,
            summarizer,
            tagger,
            index,
            storage,
            next_id: 0,
        }
    }

    pub async fn run(&mut self, mut driver: ArchiveDriver) -> Result<CrawlReport, CrawlerError> {
        let mut report = CrawlReport::default();
        info!(
            "Crawl archive from {} to {}, {} documents stored so far",
            driver.begin(),
            driver.end(),
            self.storage.results_count().await?
        );

        let mut page = driver.first_page();
        while let Some(current) = page {
            match self.fetcher.fetch(&current.url).await {
                Ok(html) => {
                    report.pages += 1;
                    let stubs = driver.parse_page(&html);
                    info!("[{}] {} headlines", current.date, stubs.len());

                    for stub in stubs {
                        let url = stub.url.clone();
                        match self.process_article(stub).await {
                            Ok(_) => report.indexed += 1,
                            Err(e) => {
                                warn!("Article {} dropped: {}", url, e);
                                report.failed += 1;
                            }
                        }
                    }
                }
                // The day is skipped, not retried.
                Err(e) => {
                    warn!("Skip archive page {}: {}", current.url, e);
                    report.skipped_days.push(current.date);
                }
            }
            page = driver.advance();
        }

        Ok(report)
    }

    pub async fn process_article(
        &mut self,
        stub: ArticleStub,
    ) -> Result<NewsDocument, CrawlerError> {
        let html = self.fetcher.fetch(&stub.url).await?;

        self.next_id += 1;
        let id = self.next_id;

        let scraped = stub.scrape(&html)?;

        // Slow: the extraction service downloads the article again.
        let summary = self.summarizer.summarize(&scraped.url).await?;

        let entities = match self.tagger.entities(&scraped.content).await {
            Ok(entities) => entities,
            Err(e) => {
                error!("NER tagger failed for {}: {}", scraped.url, e);
                Entities::default()
            }
        };
        let sentiment = self.tagger.sentiment(&scraped.content).await?;

        let doc = scraped.enrich(summary, entities, sentiment, Local::now().naive_local());
        debug!("\n{}", doc);

        self.index.index(id, &doc).await?;
        self.storage.results_insert(&doc).await?;
        info!("[{}] Insert Result {}", id, doc.news_url);

        Ok(doc)
    }
}
