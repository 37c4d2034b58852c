mod archive;
mod crawler;
mod data;

pub use archive::{parse_date, ArchiveDriver, ArchivePage};
pub use crawler::format_published;
pub use data::DailyStarData;

use crate::enrich::{Entities, Summary};
use crate::CrawlerError;

use chrono::NaiveDateTime;
use itertools::Itertools;
use serde::Serialize;
use std::{fmt, string::String};

pub const ORIGIN: &str = "http://www.thedailystar.net";
const CAPTURED_FORMAT: &str = "%d-%m-%Y %I:%M %p";

/// An article link found on an archive page, before the article itself has
/// been fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleStub {
    pub url: String,
    pub title: String,
    pub section: Option<String>,
}

impl ArticleStub {
    /// Parses the fetched article page into a [`ScrapedArticle`].
    pub fn scrape(self, html: &str) -> Result<ScrapedArticle, CrawlerError> {
        crawler::scrape(self, html)
    }
}

/// An article whose page has been parsed but not yet enriched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedArticle {
    pub url: String,
    pub title: String,
    pub section: Option<String>,
    pub content: String,
    pub top_tagline: Option<String>,
    pub bottom_tagline: Option<String>,
    pub published: String,
    pub images: Vec<String>,
    pub image_captions: Vec<String>,
    pub breadcrumb: Vec<String>,
    pub reporter: Option<String>,
}

impl ScrapedArticle {
    pub fn enrich(
        self,
        summary: Summary,
        entities: Entities,
        sentiment: f64,
        captured_at: NaiveDateTime,
    ) -> NewsDocument {
        let Entities {
            person,
            organization,
            time,
            percent,
            money,
            location,
        } = entities;

        NewsDocument {
            news_url: self.url,
            reporter: self.reporter,
            published: self.published,
            title: self.title,
            content: self.content,
            top_tagline: self.top_tagline,
            bottom_tagline: self.bottom_tagline,
            images: self.images,
            image_captions: self.image_captions,
            breadcrumb: self.breadcrumb,
            sentiment,
            ml_tags: None,
            section: self.section,
            ner_person: person.primary,
            ner_organization: organization.primary,
            ner_money: money.primary,
            ner_time: time.primary,
            ner_location: location.primary,
            ner_percent: percent.primary,
            ner_list_person: person.occurrences,
            ner_list_organization: organization.occurrences,
            ner_list_money: money.occurrences,
            ner_list_time: time.occurrences,
            ner_list_location: location.occurrences,
            ner_list_percent: percent.occurrences,
            generated_keywords: summary.keywords,
            generated_summary: summary.summary,
            timestamp: captured_at.format(CAPTURED_FORMAT).to_string(),
        }
    }
}

/// The complete, flat record that gets indexed and stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsDocument {
    pub news_url: String,
    pub reporter: Option<String>,
    pub published: String,
    pub title: String,
    pub content: String,
    pub top_tagline: Option<String>,
    pub bottom_tagline: Option<String>,
    pub images: Vec<String>,
    pub image_captions: Vec<String>,
    pub breadcrumb: Vec<String>,
    pub sentiment: f64,
    pub ml_tags: Option<Vec<String>>,
    pub section: Option<String>,

    pub ner_person: Option<String>,
    pub ner_organization: Option<String>,
    pub ner_money: Option<String>,
    pub ner_time: Option<String>,
    pub ner_location: Option<String>,
    pub ner_percent: Option<String>,

    pub ner_list_person: Vec<String>,
    pub ner_list_organization: Vec<String>,
    pub ner_list_money: Vec<String>,
    pub ner_list_time: Vec<String>,
    pub ner_list_location: Vec<String>,
    pub ner_list_percent: Vec<String>,

    pub generated_keywords: Vec<String>,
    pub generated_summary: String,
    pub timestamp: String,
}

impl fmt::Display for NewsDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title           : {}", self.title)?;
        writeln!(f, "Url             : {}", self.news_url)?;
        if let Some(d) = self.section.as_ref() {
            writeln!(f, "Section         : {}", d)?;
        } else {
            writeln!(f, "Section         : None")?;
        };

        if let Some(d) = self.reporter.as_ref() {
            writeln!(f, "Reporter        : {}", d)?;
        } else {
            writeln!(f, "Reporter        : None")?;
        };

        writeln!(f, "Published Date  : {}", self.published)?;
        writeln!(f, "Breadcrumb      : {}", self.breadcrumb.iter().join(" > "))?;
        writeln!(f, "Sentiment       : {}", self.sentiment)?;
        writeln!(f, "Keywords        : {}", self.generated_keywords.join(", "))?;
        writeln!(f, "Summary         : ")?;
        writeln!(f, "> {}", self.generated_summary.replace('\n', "\n  "))?;

        Ok(())
    }
}
