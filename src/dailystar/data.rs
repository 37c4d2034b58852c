use super::NewsDocument;
use crate::{utils, CrawlerError, Storage, Table};
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};

pub struct NewsDocumentTable {
    name: String,
    pool: SqlitePool,
}

#[async_trait::async_trait]
impl Table for NewsDocumentTable {
    type Record<'a> = &'a NewsDocument;

    fn get_name(&self) -> &str {
        self.name.as_str()
    }

    fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn create(&self) -> Result<(), sqlx::Error> {
        if !utils::is_table_exists(self.get_pool(), &self.name).await? {
            let query = format!(
                r#"
                        CREATE TABLE {} (
                            id TEXT PRIMARY KEY,
                            created_at DATETIME,
                            reporter TEXT,
                            published TEXT,
                            title TEXT,
                            content TEXT,
                            top_tagline TEXT,
                            bottom_tagline TEXT,
                            images TEXT,
                            image_captions TEXT,
                            breadcrumb TEXT,
                            sentiment REAL,
                            section TEXT,
                            ner_person TEXT,
                            ner_organization TEXT,
                            ner_money TEXT,
                            ner_time TEXT,
                            ner_location TEXT,
                            ner_percent TEXT,
                            ner_list_person TEXT,
                            ner_list_organization TEXT,
                            ner_list_money TEXT,
                            ner_list_time TEXT,
                            ner_list_location TEXT,
                            ner_list_percent TEXT,
                            generated_keywords TEXT,
                            generated_summary TEXT,
                            timestamp TEXT
                        )
                    "#,
                &self.name
            );
            sqlx::query(query.as_str()).execute(self.get_pool()).await?;
        }
        Ok(())
    }

    async fn insert<'a>(&self, record: Self::Record<'a>) -> Result<(), sqlx::Error> {
        let list = |v: &Vec<String>| serde_json::to_string(v).unwrap_or_else(|_| "[]".into());

        let mut tx = self.get_pool().begin().await?;
        let query = format!(
            r#"INSERT OR IGNORE INTO {} (
                id,
                created_at,
                reporter,
                published,
                title,
                content,
                top_tagline,
                bottom_tagline,
                images,
                image_captions,
                breadcrumb,
                sentiment,
                section,
                ner_person,
                ner_organization,
                ner_money,
                ner_time,
                ner_location,
                ner_percent,
                ner_list_person,
                ner_list_organization,
                ner_list_money,
                ner_list_time,
                ner_list_location,
                ner_list_percent,
                generated_keywords,
                generated_summary,
                timestamp) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            self.name
        );
        sqlx::query(&query)
            .bind(record.news_url.trim())
            .bind(utils::get_now())
            .bind(&record.reporter)
            .bind(&record.published)
            .bind(&record.title)
            .bind(&record.content)
            .bind(&record.top_tagline)
            .bind(&record.bottom_tagline)
            .bind(list(&record.images))
            .bind(list(&record.image_captions))
            .bind(list(&record.breadcrumb))
            .bind(record.sentiment)
            .bind(&record.section)
            .bind(&record.ner_person)
            .bind(&record.ner_organization)
            .bind(&record.ner_money)
            .bind(&record.ner_time)
            .bind(&record.ner_location)
            .bind(&record.ner_percent)
            .bind(list(&record.ner_list_person))
            .bind(list(&record.ner_list_organization))
            .bind(list(&record.ner_list_money))
            .bind(list(&record.ner_list_time))
            .bind(list(&record.ner_list_location))
            .bind(list(&record.ner_list_percent))
            .bind(list(&record.generated_keywords))
            .bind(&record.generated_summary)
            .bind(&record.timestamp)
            .execute(&mut tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

/// SQLite copy of every indexed document, one row per article URL.
pub struct DailyStarData {
    pub name: String,
    pub results: NewsDocumentTable,
    pool: SqlitePool,
}

impl DailyStarData {
    pub async fn new(name: &str) -> Result<DailyStarData, CrawlerError> {
        let opt = SqliteConnectOptions::new()
            .filename(format!("{}.db", name))
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(opt).await?;
        let p = DailyStarData {
            name: name.to_string(),
            results: NewsDocumentTable {
                name: format!("{}_results", name),
                pool: pool.clone(),
            },
            pool,
        };

        if !utils::is_table_exists(&p.pool, &p.results.name).await? {
            tracing::debug!("Create table {}", p.results.name);
            p.results.create().await?;
        } else {
            tracing::debug!("Use table {}", p.results.name);
        }

        Ok(p)
    }
}

#[async_trait::async_trait]
impl Storage for DailyStarData {
    async fn results_count(&self) -> Result<u32, CrawlerError> {
        Ok(self.results.count().await?)
    }

    async fn results_insert(&self, doc: &NewsDocument) -> Result<(), CrawlerError> {
        Ok(self.results.insert(doc).await?)
    }
}
