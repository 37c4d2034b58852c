use super::ArticleStub;
use crate::CrawlerError;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};

const E: &str = "Invalid selector";
lazy_static! {
    static ref HEADLINE: Selector = Selector::parse("h5").expect(E);
    static ref A: Selector = Selector::parse("a").expect(E);
}

/// Number of element ancestors between a headline and the block that holds
/// its section title.
const SECTION_DEPTH: usize = 7;

/// Parses `DD<delimiter>MM<delimiter>YYYY`.
pub fn parse_date(input: &str, delimiter: &str) -> Result<NaiveDate, CrawlerError> {
    let invalid = || CrawlerError::InvalidDate(input.to_string());
    if delimiter.is_empty() {
        return Err(invalid());
    }

    let parts = input
        .split(delimiter)
        .map(|part| part.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid())?;

    match parts.as_slice() {
        [day, month, year] => i32::try_from(*year)
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, *month, *day))
            .ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

/// One day of the newspaper archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePage {
    pub date: NaiveDate,
    pub url: String,
}

/// Walks the archive one calendar day at a time, from `begin` to `end`
/// inclusive.
#[derive(Debug)]
pub struct ArchiveDriver {
    origin: String,
    begin: NaiveDate,
    cursor: NaiveDate,
    end: NaiveDate,
}

impl ArchiveDriver {
    pub fn new(
        start_date: &str,
        end_date: &str,
        delimiter: &str,
        origin: &str,
    ) -> Result<ArchiveDriver, CrawlerError> {
        let begin = parse_date(start_date, delimiter)?;
        let end = parse_date(end_date, delimiter)?;
        Ok(ArchiveDriver {
            origin: origin.trim_end_matches('/').to_string(),
            begin,
            cursor: begin,
            end,
        })
    }

    pub fn begin(&self) -> NaiveDate {
        self.begin
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    fn page(&self, date: NaiveDate) -> ArchivePage {
        ArchivePage {
            date,
            url: format!("{}/newspaper?date={}", self.origin, date.format("%Y-%m-%d")),
        }
    }

    /// The page for the start date, unless the range is empty.
    pub fn first_page(&self) -> Option<ArchivePage> {
        (self.cursor <= self.end).then(|| self.page(self.cursor))
    }

    /// Moves the cursor to the next calendar day. Returns `None` once the
    /// cursor has passed the end date, which means the crawl is done.
    pub fn advance(&mut self) -> Option<ArchivePage> {
        let next = self.cursor.succ_opt().filter(|next| *next <= self.end);
        let Some(next) = next else {
            info!("Done scraping from {} upto {}", self.begin, self.end);
            return None;
        };
        self.cursor = next;
        Some(self.page(next))
    }

    /// Extracts one [`ArticleStub`] per headline on an archive page.
    pub fn parse_page(&self, html: &str) -> Vec<ArticleStub> {
        let doc = Html::parse_document(html);
        let mut stubs = vec![];

        for headline in doc.select(&HEADLINE) {
            let Some(link) = headline.select(&A).next() else {
                warn!("Headline without link: {}", headline.html());
                continue;
            };
            let Some(href) = link.value().attr("href") else {
                warn!("Headline without href: {}", headline.html());
                continue;
            };

            stubs.push(ArticleStub {
                url: format!("{}{}", self.origin, href.trim()),
                title: link.text().collect::<String>().trim().to_string(),
                section: section_of(headline),
            });
        }

        stubs
    }
}

/// Section title sits in the first `div` child of the headline's seventh
/// ancestor, as `div > h2`.
fn section_of(headline: ElementRef) -> Option<String> {
    let block = headline
        .ancestors()
        .filter_map(ElementRef::wrap)
        .nth(SECTION_DEPTH - 1)?;

    let title_block = block
        .children()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "div")?;

    title_block
        .children()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "h2")
        .map(|h2| h2.text().collect::<String>().trim().to_string())
}
