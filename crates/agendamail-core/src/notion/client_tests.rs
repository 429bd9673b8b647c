//! Tests for the Notion client against a mock HTTP server.

#[cfg(test)]
mod tests {
    use super::super::NotionClient;
    use crate::config::DatabaseConfig;
    use crate::error::NotionError;
    use chrono::NaiveDate;
    use chrono_tz::Tz;
    use serde_json::json;

    const TZ: Tz = chrono_tz::America::New_York;

    fn target() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 2).unwrap()
    }

    fn db_config(id: &str) -> DatabaseConfig {
        DatabaseConfig {
            id: id.into(),
            date_property: "Date".into(),
            name: None,
            fields: vec!["Priority".into(), "Class".into()],
        }
    }

    fn schema_body() -> serde_json::Value {
        json!({
            "title": [{"plain_text": "School"}],
            "properties": {
                "Date": {"type": "date"},
                "Priority": {"type": "select"},
                "Class": {"type": "relation"}
            }
        })
    }

    fn date_payload() -> serde_json::Value {
        json!({
            "filter": {"property": "Date", "date": {"equals": "2025-09-02"}},
            "sorts": [{"property": "Date", "direction": "ascending"}],
            "page_size": 100
        })
    }

    #[tokio::test]
    async fn query_flattens_pages_to_tasks() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/databases/db1")
            .with_body(schema_body().to_string())
            .create_async()
            .await;
        server
            .mock("POST", "/v1/databases/db1/query")
            .match_header("Notion-Version", "2022-06-28")
            .match_body(mockito::Matcher::Json(date_payload()))
            .with_body(
                json!({
                    "results": [{
                        "url": "https://notion.so/page-1",
                        "properties": {
                            "Name": {"type": "title", "title": [{"plain_text": "Essay draft"}]},
                            "Priority": {"type": "select", "select": {"name": "High"}},
                            "Notes": {"type": "rich_text", "rich_text": [{"plain_text": "outline first"}]}
                        }
                    }],
                    "has_more": false
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = NotionClient::new("secret_token")
            .unwrap()
            .with_base_url(&server.url());
        let tasks = client
            .query_database_due_on(&db_config("db1"), 0, target(), TZ)
            .await
            .unwrap();

        assert_eq!(tasks.len(), 1);
        let task = &tasks[0];
        assert_eq!(task.title, "Essay draft");
        assert_eq!(task.database_name, "School");
        assert_eq!(task.url.as_deref(), Some("https://notion.so/page-1"));
        assert_eq!(task.notes.as_deref(), Some("outline first"));
        assert_eq!(
            task.extra_fields,
            vec![("Priority".to_string(), "High".to_string())]
        );
    }

    #[tokio::test]
    async fn missing_date_property_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/databases/db1")
            .with_body(json!({"title": [], "properties": {"Due": {"type": "date"}}}).to_string())
            .create_async()
            .await;

        let client = NotionClient::new("secret_token")
            .unwrap()
            .with_base_url(&server.url());
        let err = client
            .query_database_due_on(&db_config("db1"), 0, target(), TZ)
            .await
            .unwrap_err();
        assert!(matches!(err, NotionError::MissingDateProperty { .. }));
    }

    #[tokio::test]
    async fn relation_field_resolves_to_page_titles() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/databases/db1")
            .with_body(schema_body().to_string())
            .create_async()
            .await;
        server
            .mock("POST", "/v1/databases/db1/query")
            .with_body(
                json!({
                    "results": [{
                        "url": "https://notion.so/page-1",
                        "properties": {
                            "Name": {"type": "title", "title": [{"plain_text": "Problem set"}]},
                            "Class": {"type": "relation", "relation": [{"id": "p-math"}, {"id": "p-phys"}]}
                        }
                    }],
                    "has_more": false
                })
                .to_string(),
            )
            .create_async()
            .await;
        server
            .mock("GET", "/v1/pages/p-math")
            .with_body(
                json!({"properties": {"Name": {"type": "title", "title": [{"plain_text": "Math"}]}}})
                    .to_string(),
            )
            .create_async()
            .await;
        server
            .mock("GET", "/v1/pages/p-phys")
            .with_body(
                json!({"properties": {"Name": {"type": "title", "title": [{"plain_text": "Physics"}]}}})
                    .to_string(),
            )
            .create_async()
            .await;

        let client = NotionClient::new("secret_token")
            .unwrap()
            .with_base_url(&server.url());
        let tasks = client
            .query_database_due_on(&db_config("db1"), 0, target(), TZ)
            .await
            .unwrap();

        assert_eq!(
            tasks[0].extra_fields,
            vec![("Class".to_string(), "Math, Physics".to_string())]
        );
    }

    #[tokio::test]
    async fn unresolvable_relation_falls_back_to_count() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/databases/db1")
            .with_body(schema_body().to_string())
            .create_async()
            .await;
        server
            .mock("POST", "/v1/databases/db1/query")
            .with_body(
                json!({
                    "results": [{
                        "properties": {
                            "Name": {"type": "title", "title": [{"plain_text": "Reading"}]},
                            "Class": {"type": "relation", "relation": [{"id": "deleted-page"}]}
                        }
                    }],
                    "has_more": false
                })
                .to_string(),
            )
            .create_async()
            .await;
        server
            .mock("GET", "/v1/pages/deleted-page")
            .with_status(404)
            .create_async()
            .await;

        let client = NotionClient::new("secret_token")
            .unwrap()
            .with_base_url(&server.url());
        let tasks = client
            .query_database_due_on(&db_config("db1"), 0, target(), TZ)
            .await
            .unwrap();
        assert_eq!(
            tasks[0].extra_fields,
            vec![("Class".to_string(), "1 linked item(s)".to_string())]
        );
    }

    #[tokio::test]
    async fn created_time_property_queried_with_local_day_range() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/databases/journal")
            .with_body(
                json!({
                    "title": [{"plain_text": "Journal"}],
                    "properties": {"Created": {"type": "created_time"}}
                })
                .to_string(),
            )
            .create_async()
            .await;
        // The day window must carry the configured zone's offset
        // (New York is -04:00 on this date), not a fixed one.
        let range_payload = json!({
            "filter": {
                "and": [
                    {"property": "Created", "created_time": {"on_or_after": "2025-09-02T00:00:00-04:00"}},
                    {"property": "Created", "created_time": {"on_or_before": "2025-09-02T23:59:59.999-04:00"}}
                ]
            },
            "sorts": [{"property": "Created", "direction": "ascending"}],
            "page_size": 100
        });
        let query = server
            .mock("POST", "/v1/databases/journal/query")
            .match_body(mockito::Matcher::Json(range_payload))
            .with_body(
                json!({
                    "results": [{"properties": {"Name": {"type": "title", "title": [{"plain_text": "Entry"}]}}}],
                    "has_more": false
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = NotionClient::new("secret_token")
            .unwrap()
            .with_base_url(&server.url());
        let db = DatabaseConfig {
            id: "journal".into(),
            date_property: "Created".into(),
            name: None,
            fields: vec![],
        };
        let tasks = client.query_database_due_on(&db, 0, target(), TZ).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Entry");
        query.assert_async().await;
    }

    #[tokio::test]
    async fn pagination_follows_next_cursor() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/databases/db1")
            .with_body(schema_body().to_string())
            .create_async()
            .await;

        let mut second_payload = date_payload();
        second_payload["start_cursor"] = json!("cursor-2");

        server
            .mock("POST", "/v1/databases/db1/query")
            .match_body(mockito::Matcher::Json(date_payload()))
            .with_body(
                json!({
                    "results": [{"properties": {"Name": {"type": "title", "title": [{"plain_text": "First"}]}}}],
                    "has_more": true,
                    "next_cursor": "cursor-2"
                })
                .to_string(),
            )
            .create_async()
            .await;
        server
            .mock("POST", "/v1/databases/db1/query")
            .match_body(mockito::Matcher::Json(second_payload))
            .with_body(
                json!({
                    "results": [{"properties": {"Name": {"type": "title", "title": [{"plain_text": "Second"}]}}}],
                    "has_more": false
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = NotionClient::new("secret_token")
            .unwrap()
            .with_base_url(&server.url());
        let tasks = client
            .query_database_due_on(&db_config("db1"), 0, target(), TZ)
            .await
            .unwrap();
        let titles: Vec<_> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn failing_database_is_skipped() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/databases/broken")
            .with_status(500)
            .create_async()
            .await;
        server
            .mock("GET", "/v1/databases/db1")
            .with_body(schema_body().to_string())
            .create_async()
            .await;
        server
            .mock("POST", "/v1/databases/db1/query")
            .with_body(
                json!({
                    "results": [{"properties": {"Name": {"type": "title", "title": [{"plain_text": "Survivor"}]}}}],
                    "has_more": false
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = NotionClient::new("secret_token")
            .unwrap()
            .with_base_url(&server.url());
        let databases = vec![
            DatabaseConfig {
                id: "broken".into(),
                date_property: "Date".into(),
                name: None,
                fields: vec![],
            },
            DatabaseConfig {
                id: "db1".into(),
                date_property: "Date".into(),
                name: None,
                fields: vec![],
            },
        ];
        let tasks = client.fetch_tasks_due_on(&databases, target(), TZ).await;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Survivor");
        assert_eq!(tasks[0].database_rank, 1);
    }

    #[tokio::test]
    async fn database_title_falls_back() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/databases/untitled")
            .with_body(json!({"title": [], "properties": {}}).to_string())
            .create_async()
            .await;

        let client = NotionClient::new("secret_token")
            .unwrap()
            .with_base_url(&server.url());
        assert_eq!(client.database_title("untitled").await, "Notion DB");
    }

    #[test]
    fn empty_token_rejected() {
        assert!(matches!(
            NotionClient::new(""),
            Err(NotionError::MissingToken)
        ));
    }
}
