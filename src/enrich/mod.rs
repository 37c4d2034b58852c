mod corenlp;
mod summarizer;

pub use corenlp::CoreNlpTagger;
pub use summarizer::HttpSummarizer;

use serde::Deserialize;
use std::collections::HashMap;

/// Output of the article-extraction service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// All mentions of one entity category, in text order, plus the one that
/// best represents the article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityGroup {
    pub primary: Option<String>,
    pub occurrences: Vec<String>,
}

impl EntityGroup {
    /// The primary value is the most frequent mention; ties go to whichever
    /// appeared first.
    pub fn from_occurrences(occurrences: Vec<String>) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for o in &occurrences {
            *counts.entry(o.as_str()).or_default() += 1;
        }

        let mut primary: Option<(&str, usize)> = None;
        for o in &occurrences {
            let count = counts[o.as_str()];
            if primary.map_or(true, |(_, best)| count > best) {
                primary = Some((o.as_str(), count));
            }
        }

        EntityGroup {
            primary: primary.map(|(p, _)| p.to_string()),
            occurrences,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entities {
    pub person: EntityGroup,
    pub organization: EntityGroup,
    pub time: EntityGroup,
    pub percent: EntityGroup,
    pub money: EntityGroup,
    pub location: EntityGroup,
}

impl Entities {
    pub fn is_empty(&self) -> bool {
        [
            &self.person,
            &self.organization,
            &self.time,
            &self.percent,
            &self.money,
            &self.location,
        ]
        .iter()
        .all(|g| g.is_empty())
    }
}
