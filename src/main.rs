use clap::Parser;
use dailystar_crawler::dailystar::{ArchiveDriver, DailyStarData, ORIGIN};
use dailystar_crawler::enrich::{CoreNlpTagger, HttpSummarizer};
use dailystar_crawler::{ElasticIndex, HttpFetcher, Pipeline};
use tokio::time::Duration;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;

/// Crawl The Daily Star newspaper archive between two dates and index every
/// article into Elasticsearch.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// First archive day, DD<delimiter>MM<delimiter>YYYY
    #[arg(long, default_value = "01-01-2016")]
    start_date: String,

    /// Last archive day (inclusive)
    #[arg(long, default_value = "02-01-2016")]
    end_date: String,

    #[arg(long, default_value = "-")]
    delimiter: String,

    #[arg(long, default_value = ORIGIN)]
    origin: String,

    #[arg(long, default_value = "http://localhost:9200")]
    elastic_url: String,

    #[arg(long, default_value = "newspaper_index")]
    index: String,

    #[arg(long, default_value = "news")]
    doc_type: String,

    /// Article-extraction service answering `POST /article`
    #[arg(long, default_value = "http://localhost:5000")]
    summarizer_url: String,

    /// Stanford CoreNLP server
    #[arg(long, default_value = "http://localhost:9000")]
    corenlp_url: String,

    #[arg(long, default_value = "https://apiv2.indico.io")]
    sentiment_url: String,

    #[arg(long)]
    sentiment_key: Option<String>,

    /// Results are also written to `<db-name>.db`
    #[arg(long, default_value = "dailystar")]
    db_name: String,

    /// Minimum delay between two page requests, in milliseconds
    #[arg(long, default_value_t = 200)]
    request_delay_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| {
                "debug,html5ever=error,selectors=error,hyper=warn,reqwest=info,sqlx=warn".into()
            }),
        )
        .with(ErrorLayer::default())
        .init();

    let args = Args::parse();

    let driver = ArchiveDriver::new(
        &args.start_date,
        &args.end_date,
        &args.delimiter,
        &args.origin,
    )?;

    let client = reqwest::Client::new();
    let mut pipeline = Pipeline::new(
        HttpFetcher::new(client.clone(), Duration::from_millis(args.request_delay_ms)),
        HttpSummarizer::new(client.clone(), &args.summarizer_url),
        CoreNlpTagger::new(
            client.clone(),
            &args.corenlp_url,
            &args.sentiment_url,
            args.sentiment_key.clone(),
        ),
        ElasticIndex::new(client, &args.elastic_url, &args.index, &args.doc_type),
        DailyStarData::new(&args.db_name).await?,
    );

    let report = pipeline.run(driver).await?;
    info!(
        "Crawled {} pages, indexed {} articles, {} failed, skipped days: {:?}",
        report.pages, report.indexed, report.failed, report.skipped_days
    );

    Ok(())
}
