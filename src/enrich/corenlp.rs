use super::{Entities, EntityGroup};
use crate::{CrawlerError, Tag, TaggingFailed};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const PROPERTIES: &str = r#"{"annotators":"tokenize,ssplit,ner","outputFormat":"json"}"#;

#[derive(Debug, Deserialize)]
struct Annotation {
    #[serde(default)]
    sentences: Vec<Sentence>,
}

#[derive(Debug, Deserialize)]
struct Sentence {
    #[serde(default)]
    entitymentions: Vec<Mention>,
}

#[derive(Debug, Deserialize)]
struct Mention {
    text: String,
    ner: String,
}

#[derive(Debug, Deserialize)]
struct SentimentResponse {
    results: f64,
}

/// Named entities from a Stanford CoreNLP server, sentiment from a separate
/// scoring endpoint.
#[derive(Debug, Clone)]
pub struct CoreNlpTagger {
    client: reqwest::Client,
    corenlp_url: String,
    sentiment_url: String,
    sentiment_key: Option<String>,
}

impl CoreNlpTagger {
    pub fn new(
        client: reqwest::Client,
        corenlp_url: &str,
        sentiment_base_url: &str,
        sentiment_key: Option<String>,
    ) -> Self {
        CoreNlpTagger {
            client,
            corenlp_url: format!("{}/", corenlp_url.trim_end_matches('/')),
            sentiment_url: format!("{}/sentiment", sentiment_base_url.trim_end_matches('/')),
            sentiment_key,
        }
    }
}

fn group_mentions(annotation: Annotation) -> Entities {
    let mut person = vec![];
    let mut organization = vec![];
    let mut time = vec![];
    let mut percent = vec![];
    let mut money = vec![];
    let mut location = vec![];

    for mention in annotation
        .sentences
        .into_iter()
        .flat_map(|s| s.entitymentions)
    {
        let bucket = match mention.ner.as_str() {
            "PERSON" => &mut person,
            "ORGANIZATION" => &mut organization,
            "TIME" | "DATE" => &mut time,
            "PERCENT" => &mut percent,
            "MONEY" => &mut money,
            "LOCATION" | "CITY" | "COUNTRY" | "STATE_OR_PROVINCE" => &mut location,
            _ => continue,
        };
        bucket.push(mention.text);
    }

    Entities {
        person: EntityGroup::from_occurrences(person),
        organization: EntityGroup::from_occurrences(organization),
        time: EntityGroup::from_occurrences(time),
        percent: EntityGroup::from_occurrences(percent),
        money: EntityGroup::from_occurrences(money),
        location: EntityGroup::from_occurrences(location),
    }
}

#[async_trait::async_trait]
impl Tag for CoreNlpTagger {
    async fn entities(&self, text: &str) -> Result<Entities, TaggingFailed> {
        if text.trim().is_empty() {
            return Ok(Entities::default());
        }

        let annotation = self
            .client
            .post(&self.corenlp_url)
            .query(&[("properties", PROPERTIES)])
            .body(text.to_string())
            .send()
            .await?
            .error_for_status()?
            .json::<Annotation>()
            .await?;

        let entities = group_mentions(annotation);
        debug!("Tagged entities: {:?}", entities);
        Ok(entities)
    }

    async fn sentiment(&self, text: &str) -> Result<f64, CrawlerError> {
        let mut request = self
            .client
            .post(&self.sentiment_url)
            .json(&json!({ "data": text }));
        if let Some(key) = &self.sentiment_key {
            request = request.query(&[("key", key)]);
        }

        let response = request
            .send()
            .await?
            .error_for_status()?
            .json::<SentimentResponse>()
            .await?;
        Ok(response.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_json, body_string, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_group_mentions() {
        let annotation: Annotation = serde_json::from_str(
            r#"{
                "sentences": [
                    {
                        "index": 0,
                        "entitymentions": [
                            {"text": "Bangladesh", "ner": "COUNTRY"},
                            {"text": "Russia", "ner": "COUNTRY"},
                            {"text": "yesterday", "ner": "DATE"},
                            {"text": "Rosatom", "ner": "ORGANIZATION"}
                        ]
                    },
                    {
                        "index": 1,
                        "entitymentions": [
                            {"text": "Dhaka", "ner": "CITY"},
                            {"text": "Russia", "ner": "COUNTRY"},
                            {"text": "$12.65 billion", "ner": "MONEY"},
                            {"text": "10 percent", "ner": "PERCENT"},
                            {"text": "Yeafesh Osman", "ner": "PERSON"},
                            {"text": "first", "ner": "ORDINAL"}
                        ]
                    },
                    {"index": 2}
                ]
            }"#,
        )
        .unwrap();

        let entities = group_mentions(annotation);
        assert_eq!(entities.location.primary.as_deref(), Some("Russia"));
        assert_eq!(
            entities.location.occurrences,
            vec!["Bangladesh", "Russia", "Dhaka", "Russia"]
        );
        assert_eq!(entities.time.occurrences, vec!["yesterday"]);
        assert_eq!(entities.organization.primary.as_deref(), Some("Rosatom"));
        assert_eq!(entities.money.primary.as_deref(), Some("$12.65 billion"));
        assert_eq!(entities.percent.primary.as_deref(), Some("10 percent"));
        assert_eq!(entities.person.primary.as_deref(), Some("Yeafesh Osman"));
    }

    #[test]
    fn test_no_mentions_is_empty_not_failure() {
        let annotation: Annotation = serde_json::from_str(r#"{"sentences": []}"#).unwrap();
        assert!(group_mentions(annotation).is_empty());
    }

    #[tokio::test]
    async fn test_blank_text_skips_service() {
        let tagger = CoreNlpTagger::new(
            reqwest::Client::new(),
            "http://127.0.0.1:1",
            "http://127.0.0.1:1",
            None,
        );
        assert_eq!(tagger.entities("   ").await.unwrap(), Entities::default());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_tagging_failure() {
        let tagger = CoreNlpTagger::new(
            reqwest::Client::new(),
            "http://127.0.0.1:1",
            "http://127.0.0.1:1",
            None,
        );
        assert!(tagger.entities("Dhaka").await.is_err());
    }

    fn local_tagger(server: &MockServer, key: Option<String>) -> CoreNlpTagger {
        CoreNlpTagger::new(reqwest::Client::new(), &server.uri(), &server.uri(), key)
    }

    #[tokio::test]
    async fn test_entities_from_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(query_param("properties", PROPERTIES))
            .and(body_string("Rosatom signed in Dhaka."))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sentences": [{
                    "entitymentions": [
                        {"text": "Rosatom", "ner": "ORGANIZATION"},
                        {"text": "Dhaka", "ner": "CITY"}
                    ]
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tagger = local_tagger(&server, None);
        let entities = tagger.entities("Rosatom signed in Dhaka.").await.unwrap();
        assert_eq!(entities.organization.primary.as_deref(), Some("Rosatom"));
        assert_eq!(entities.location.occurrences, vec!["Dhaka"]);
        assert!(entities.person.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_tagging_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let tagger = local_tagger(&server, None);
        assert!(matches!(tagger.entities("Dhaka").await, Err(TaggingFailed(_))));
    }

    #[tokio::test]
    async fn test_sentiment_score() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sentiment"))
            .and(query_param("key", "secret"))
            .and(body_json(json!({ "data": "Good news." })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": 0.8 })))
            .expect(1)
            .mount(&server)
            .await;

        let tagger = local_tagger(&server, Some("secret".to_string()));
        assert_eq!(tagger.sentiment("Good news.").await.unwrap(), 0.8);
    }

    #[tokio::test]
    async fn test_unexpected_sentiment_response_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sentiment"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "bad key" })))
            .mount(&server)
            .await;

        let tagger = local_tagger(&server, None);
        assert!(matches!(
            tagger.sentiment("Good news.").await,
            Err(CrawlerError::HttpError(_))
        ));
    }
}
