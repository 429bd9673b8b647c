//! Notion API client.
//!
//! Queries each configured database for rows due on a given date,
//! flattens configured properties to display strings, and resolves
//! relation references to page titles via follow-up lookups.

pub mod property;

use chrono::{NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use log::{debug, warn};
use serde_json::{json, Value};
use std::time::Duration;

use crate::agenda::TaskRecord;
use crate::config::DatabaseConfig;
use crate::error::NotionError;
use self::property::{plain_text, PropertyValue};

const NOTION_VERSION: &str = "2022-06-28";
const QUERY_TIMEOUT: Duration = Duration::from_secs(30);
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);
/// Relation references resolved per field before falling back to a count.
const MAX_RELATION_LOOKUPS: usize = 3;
/// Notes excerpt length in characters.
const NOTES_EXCERPT_CHARS: usize = 300;

pub struct NotionClient {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

impl NotionClient {
    pub fn new(token: &str) -> Result<Self, NotionError> {
        if token.is_empty() {
            return Err(NotionError::MissingToken);
        }
        let http = reqwest::Client::builder()
            .timeout(QUERY_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            token: token.to_string(),
            base_url: "https://api.notion.com".to_string(),
        })
    }

    /// Point the client at a different endpoint; used by tests with a
    /// local mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}{path}", self.base_url))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Notion-Version", NOTION_VERSION)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .post(format!("{}{path}", self.base_url))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Notion-Version", NOTION_VERSION)
    }

    async fn json_or_api_error(response: reqwest::Response) -> Result<Value, NotionError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotionError::Api { status, message });
        }
        Ok(response.json().await?)
    }

    /// Fetch a database object (schema and title).
    async fn get_database(&self, database_id: &str) -> Result<Value, NotionError> {
        let response = self.get(&format!("/v1/databases/{database_id}")).send().await?;
        Self::json_or_api_error(response).await
    }

    /// Database title for display; falls back to "Notion DB" on any failure.
    pub async fn database_title(&self, database_id: &str) -> String {
        match self.get_database(database_id).await {
            Ok(db) => {
                let title = plain_text(&db["title"]);
                if title.is_empty() {
                    "Notion DB".into()
                } else {
                    title
                }
            }
            Err(e) => {
                debug!("could not fetch title for database {database_id}: {e}");
                "Notion DB".into()
            }
        }
    }

    /// Title of a page, read from its title property. None when the page
    /// cannot be fetched (deleted, unshared) or has no title.
    async fn page_title(&self, page_id: &str) -> Option<String> {
        let response = self
            .get(&format!("/v1/pages/{page_id}"))
            .timeout(LOOKUP_TIMEOUT)
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        let page: Value = response.json().await.ok()?;
        let props = page["properties"].as_object()?;
        for prop in props.values() {
            if prop["type"].as_str() == Some("title") {
                let title = plain_text(&prop["title"]);
                if !title.is_empty() {
                    return Some(title);
                }
            }
        }
        None
    }

    /// Render a relation field: resolve up to [`MAX_RELATION_LOOKUPS`]
    /// referenced pages to titles. Unresolvable references are omitted;
    /// when nothing resolves at all, fall back to a count.
    async fn render_relation(&self, page_ids: &[String]) -> String {
        if page_ids.is_empty() {
            return String::new();
        }
        let mut titles = Vec::new();
        for page_id in page_ids.iter().take(MAX_RELATION_LOOKUPS) {
            if let Some(title) = self.page_title(page_id).await {
                titles.push(title);
            }
        }
        if titles.is_empty() {
            return format!("{} linked item(s)", page_ids.len());
        }
        let mut rendered = titles.join(", ");
        if page_ids.len() > titles.len() {
            rendered.push_str(&format!(" (+{} more)", page_ids.len() - titles.len()));
        }
        rendered
    }

    /// Render any property to its display string, resolving relations.
    async fn render_property(&self, prop: &Value) -> String {
        match PropertyValue::from_json(prop) {
            PropertyValue::Relation(page_ids) => self.render_relation(&page_ids).await,
            value => value.display_text(),
        }
    }

    /// Build the query payload for one database and date.
    ///
    /// `created_time` properties cannot be filtered with an exact-date
    /// match, so those use an on_or_after/on_or_before range covering the
    /// local day in the configured timezone.
    fn query_payload(property: &str, property_type: &str, date: NaiveDate, tz: Tz) -> Value {
        if property_type == "created_time" {
            let day_start = tz
                .from_local_datetime(&date.and_time(NaiveTime::MIN))
                .earliest()
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_else(|| format!("{date}T00:00:00Z"));
            let day_end = tz
                .from_local_datetime(
                    &date
                        .and_hms_milli_opt(23, 59, 59, 999)
                        .unwrap_or_else(|| date.and_time(NaiveTime::MIN)),
                )
                .latest()
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_else(|| format!("{date}T23:59:59Z"));
            json!({
                "filter": {
                    "and": [
                        {"property": property, "created_time": {"on_or_after": day_start}},
                        {"property": property, "created_time": {"on_or_before": day_end}}
                    ]
                },
                "sorts": [{"property": property, "direction": "ascending"}],
                "page_size": 100
            })
        } else {
            json!({
                "filter": {"property": property, "date": {"equals": date.format("%Y-%m-%d").to_string()}},
                "sorts": [{"property": property, "direction": "ascending"}],
                "page_size": 100
            })
        }
    }

    /// Query one database for rows due on `date`.
    ///
    /// A date property name absent from the database schema is an error
    /// for this database only; the caller decides whether to continue
    /// with other databases.
    pub async fn query_database_due_on(
        &self,
        db: &DatabaseConfig,
        database_rank: usize,
        date: NaiveDate,
        tz: Tz,
    ) -> Result<Vec<TaskRecord>, NotionError> {
        let schema = self.get_database(&db.id).await?;
        let properties = &schema["properties"];
        let Some(prop_info) = properties.get(db.date_property.as_str()) else {
            return Err(NotionError::MissingDateProperty {
                database: db.id.clone(),
                property: db.date_property.clone(),
            });
        };
        let property_type = prop_info["type"].as_str().unwrap_or("date");

        let database_name = match &db.name {
            Some(name) => name.clone(),
            None => {
                let title = plain_text(&schema["title"]);
                if title.is_empty() {
                    "Notion DB".into()
                } else {
                    title
                }
            }
        };

        let mut payload = Self::query_payload(&db.date_property, property_type, date, tz);
        let mut tasks = Vec::new();

        loop {
            let response = self
                .post(&format!("/v1/databases/{}/query", db.id))
                .json(&payload)
                .send()
                .await?;
            let data = Self::json_or_api_error(response).await?;

            for page in data["results"].as_array().into_iter().flatten() {
                tasks.push(self.task_from_page(page, db, &database_name, database_rank, date).await);
            }

            if data["has_more"].as_bool() != Some(true) {
                break;
            }
            match data["next_cursor"].as_str() {
                Some(cursor) => payload["start_cursor"] = json!(cursor),
                None => break,
            }
        }

        Ok(tasks)
    }

    /// Flatten one page into a task record.
    async fn task_from_page(
        &self,
        page: &Value,
        db: &DatabaseConfig,
        database_name: &str,
        database_rank: usize,
        due_date: NaiveDate,
    ) -> TaskRecord {
        let props = &page["properties"];

        let mut title = "(Untitled)".to_string();
        if let Some(map) = props.as_object() {
            for prop in map.values() {
                if prop["type"].as_str() == Some("title") {
                    let text = plain_text(&prop["title"]);
                    if !text.is_empty() {
                        title = text;
                    }
                    break;
                }
            }
        }

        let notes = match &props["Notes"] {
            notes_prop if notes_prop["type"].as_str() == Some("rich_text") => {
                let text: String = plain_text(&notes_prop["rich_text"])
                    .chars()
                    .take(NOTES_EXCERPT_CHARS)
                    .collect();
                (!text.is_empty()).then_some(text)
            }
            _ => None,
        };

        let mut extra_fields = Vec::new();
        for field in &db.fields {
            if let Some(prop) = props.get(field.as_str()) {
                extra_fields.push((field.clone(), self.render_property(prop).await));
            }
        }

        TaskRecord {
            title,
            due_date,
            database_name: database_name.to_string(),
            database_rank,
            url: page["url"].as_str().map(str::to_string),
            notes,
            extra_fields,
        }
    }

    /// Query every configured database, returning whatever subset
    /// succeeded; a failing database is logged and skipped.
    pub async fn fetch_tasks_due_on(
        &self,
        databases: &[DatabaseConfig],
        date: NaiveDate,
        tz: Tz,
    ) -> Vec<TaskRecord> {
        let mut tasks = Vec::new();
        for (rank, db) in databases.iter().enumerate() {
            match self.query_database_due_on(db, rank, date, tz).await {
                Ok(mut db_tasks) => {
                    debug!("database {}: {} task(s) due {date}", db.id, db_tasks.len());
                    tasks.append(&mut db_tasks);
                }
                Err(e) => {
                    warn!("skipping Notion database {}: {e}", db.id);
                }
            }
        }
        tasks
    }
}

#[cfg(test)]
mod client_tests;
