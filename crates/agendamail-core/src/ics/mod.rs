//! ICS calendar feed fetching.
//!
//! Downloads each configured feed over HTTP and parses it into
//! [`CalendarEvent`]s for the target day. A feed that fails to fetch or
//! parse contributes zero events and a warning; it never aborts the run
//! or affects other feeds.

pub mod parse;

use chrono::NaiveDate;
use chrono_tz::Tz;
use log::{debug, warn};
use std::time::Duration;

use crate::agenda::CalendarEvent;
use crate::error::FeedError;

const FEED_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for ICS feeds.
pub struct FeedClient {
    http: reqwest::Client,
}

impl FeedClient {
    pub fn new() -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(FEED_TIMEOUT)
            .build()?;
        Ok(Self { http })
    }

    /// Fetch and parse one feed.
    pub async fn fetch_feed(
        &self,
        url: &str,
        tz: Tz,
        date: NaiveDate,
    ) -> Result<Vec<CalendarEvent>, FeedError> {
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }
        let body = response.text().await?;
        parse::parse_feed(&body, url, tz, date)
    }

    /// Fetch every configured feed, returning whatever subset succeeded.
    pub async fn fetch_events_for_day(
        &self,
        urls: &[String],
        tz: Tz,
        date: NaiveDate,
    ) -> Vec<CalendarEvent> {
        let mut events = Vec::new();
        for url in urls {
            match self.fetch_feed(url, tz, date).await {
                Ok(mut feed_events) => {
                    debug!("feed {url}: {} event(s) on {date}", feed_events.len());
                    events.append(&mut feed_events);
                }
                Err(e) => {
                    warn!("skipping calendar feed {url}: {e}");
                }
            }
        }
        events
    }
}
