use crate::{dailystar::NewsDocument, CrawlerError, DocumentIndex};
use tracing::debug;

/// Writes documents to an Elasticsearch index under a fixed document type.
#[derive(Debug, Clone)]
pub struct ElasticIndex {
    client: reqwest::Client,
    base_url: String,
    index: String,
    doc_type: String,
}

impl ElasticIndex {
    pub fn new(client: reqwest::Client, base_url: &str, index: &str, doc_type: &str) -> Self {
        ElasticIndex {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            index: index.to_string(),
            doc_type: doc_type.to_string(),
        }
    }

    fn document_url(&self, id: u64) -> String {
        format!("{}/{}/{}/{}", self.base_url, self.index, self.doc_type, id)
    }
}

#[async_trait::async_trait]
impl DocumentIndex for ElasticIndex {
    async fn index(&self, id: u64, doc: &NewsDocument) -> Result<(), CrawlerError> {
        let url = self.document_url(id);
        debug!("Index {} as {}", doc.news_url, url);
        self.client
            .put(&url)
            .json(doc)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
