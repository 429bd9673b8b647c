//! Notion task model.

use chrono::NaiveDate;

/// One task row pulled from a Notion database, flattened to display strings.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    pub title: String,
    /// Due date in the configured local timezone.
    pub due_date: NaiveDate,
    /// Display name of the source database.
    pub database_name: String,
    /// Declaration index of the source database in the configuration;
    /// drives bucket ordering.
    pub database_rank: usize,
    /// Link to the Notion page.
    pub url: Option<String>,
    /// Excerpt of the page's Notes property.
    pub notes: Option<String>,
    /// Extra property values in configured order: (name, display text).
    pub extra_fields: Vec<(String, String)>,
}
