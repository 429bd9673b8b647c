//! CLI subcommands.

pub mod config;
pub mod preview;
pub mod send;

use chrono::{Days, NaiveDate, Utc};
use log::info;

use agendamail_core::agenda::build_view;
use agendamail_core::{AgendaView, Config, ConfigError, CoreError, FeedClient, NotionClient};

/// Resolve the target date: an explicit override, or today in the
/// configured timezone.
pub(crate) fn resolve_date(
    config: &Config,
    date: Option<NaiveDate>,
) -> Result<NaiveDate, ConfigError> {
    let tz = config.tz()?;
    Ok(date.unwrap_or_else(|| Utc::now().with_timezone(&tz).date_naive()))
}

/// Fetch all sources and aggregate them into one view. Per-source
/// failures have already been logged by the fetchers; whatever subset
/// succeeded is what gets aggregated.
pub(crate) async fn collect_view(
    config: &Config,
    date: NaiveDate,
) -> Result<AgendaView, CoreError> {
    let tz = config.tz()?;

    let feeds = FeedClient::new()?;
    let events = feeds
        .fetch_events_for_day(&config.calendar.ics_urls, tz, date)
        .await;
    info!("{} event(s) on {date}", events.len());

    let mut tasks = Vec::new();
    if !config.notion.databases.is_empty() {
        let notion = NotionClient::new(&config.notion.token)?;
        let tomorrow = date + Days::new(1);
        tasks.extend(
            notion
                .fetch_tasks_due_on(&config.notion.databases, date, tz)
                .await,
        );
        tasks.extend(
            notion
                .fetch_tasks_due_on(&config.notion.databases, tomorrow, tz)
                .await,
        );
        info!("{} task(s) in the two-day window", tasks.len());
    }

    Ok(build_view(events, tasks, date, tz))
}
