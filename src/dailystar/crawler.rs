use super::{ArticleStub, ScrapedArticle};
use crate::CrawlerError;
use chrono::NaiveDateTime;
use itertools::Itertools;
use lazy_regex::regex;
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

const E: &str = "Invalid selector";
lazy_static! {
    static ref BODY_PARAGRAPHS: Selector =
        Selector::parse(r#"div[class="field-body view-mode-teaser"] p"#).expect(E);
    static ref BOTTOM_TAGLINE: Selector =
        Selector::parse(r#"h2[class="h5 margin-bottom-zero"] > em"#).expect(E);
    static ref TOP_TAGLINE: Selector = Selector::parse(r#"h4[class="uppercase"]"#).expect(E);
    static ref PUBLISH_DATE: Selector =
        Selector::parse(r#"meta[itemprop="datePublished"]"#).expect(E);
    static ref CAPTION: Selector = Selector::parse(r#"div[class="caption"]"#).expect(E);
    static ref IMG: Selector = Selector::parse("img").expect(E);
    static ref BREADCRUMB: Selector =
        Selector::parse(r#"div[class="breadcrumb"] span[itemprop="name"]"#).expect(E);
    static ref REPORTER: Selector =
        Selector::parse(r#"div[class="author-name margin-bottom-big"] > span > a"#).expect(E);
}

const PUBLISHED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DISPLAY_FORMAT: &str = "%Y-%m-%d %I:%M %p";

/// Drops the timezone suffix of a `datePublished` value without converting
/// the wall-clock time, and renders it as `YYYY-MM-DD hh:mm AM/PM`.
pub fn format_published(raw: &str) -> Result<String, CrawlerError> {
    let local = regex!(r"(Z|[+-]\d{2}:?\d{2})$").replace(raw.trim(), "");
    let parsed = NaiveDateTime::parse_from_str(&local, PUBLISHED_FORMAT)
        .map_err(|_| CrawlerError::InvalidPublishedDate(raw.to_string()))?;
    Ok(parsed.format(DISPLAY_FORMAT).to_string())
}

/// Text nodes that are direct children of `el`.
fn own_text<'a>(el: ElementRef<'a>) -> impl Iterator<Item = &'a str> {
    el.children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
}

fn first_text(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector)
        .next()
        .and_then(|el| own_text(el).map(str::trim).find(|s| !s.is_empty()))
        .map(ToString::to_string)
}

fn has_caption(img: &ElementRef) -> bool {
    img.parent()
        .and_then(ElementRef::wrap)
        .map(|parent| {
            parent
                .children()
                .filter_map(ElementRef::wrap)
                .any(|sibling| CAPTION.matches(&sibling))
        })
        .unwrap_or(false)
}

pub(super) fn scrape(stub: ArticleStub, html: &str) -> Result<ScrapedArticle, CrawlerError> {
    let doc = Html::parse_document(html);

    let content = doc
        .select(&BODY_PARAGRAPHS)
        .flat_map(own_text)
        .map(str::trim)
        .join("");

    let bottom_tagline = first_text(&doc, &BOTTOM_TAGLINE);
    let top_tagline = first_text(&doc, &TOP_TAGLINE);

    let published = doc
        .select(&PUBLISH_DATE)
        .next()
        .and_then(|el| el.value().attr("content"))
        .ok_or(CrawlerError::MissingPublishedDate)
        .and_then(format_published)?;

    // Images and captions are collected independently; nothing pairs them up.
    let images = doc
        .select(&IMG)
        .filter(has_caption)
        .filter_map(|img| img.value().attr("src"))
        .map(ToString::to_string)
        .collect_vec();

    let image_captions = doc
        .select(&CAPTION)
        .flat_map(own_text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect_vec();

    let breadcrumb = doc
        .select(&BREADCRUMB)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .collect_vec();

    let reporter = first_text(&doc, &REPORTER);

    if content.is_empty() {
        tracing::warn!("Empty article body extracted: {}", stub.url);
    }

    Ok(ScrapedArticle {
        url: stub.url,
        title: stub.title,
        section: stub.section,
        content,
        top_tagline,
        bottom_tagline,
        published,
        images,
        image_captions,
        breadcrumb,
        reporter,
    })
}
