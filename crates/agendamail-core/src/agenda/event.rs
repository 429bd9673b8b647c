//! Calendar event model.

use chrono::{DateTime, Days, NaiveDate};
use chrono_tz::Tz;

/// One calendar entry, normalized to the configured timezone.
///
/// Immutable once parsed; the aggregator never mutates events, it only
/// annotates them in the view.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub title: String,
    pub start: DateTime<Tz>,
    /// None only for all-day entries without a DTEND, which span one day.
    pub end: Option<DateTime<Tz>>,
    pub location: Option<String>,
    /// DESCRIPTION text, shown truncated in the agenda.
    pub notes: Option<String>,
    pub all_day: bool,
    /// Display name of the feed this event came from.
    pub source_feed: String,
}

impl CalendarEvent {
    /// Local date the event starts on.
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// End of the event's time range. All-day entries without a DTEND
    /// span exactly one day; timed entries without one are zero-length.
    pub fn effective_end(&self) -> DateTime<Tz> {
        match self.end {
            Some(end) => end,
            None if self.all_day => self.start + Days::new(1),
            None => self.start,
        }
    }

    /// Whether the event's date span `[start, end)` covers `date`.
    ///
    /// An end falling exactly on midnight excludes that day; an end with
    /// a time component includes it.
    pub fn spans_date(&self, date: NaiveDate) -> bool {
        let end = self.effective_end();
        let mut end_date = end.date_naive();
        if end.time() != chrono::NaiveTime::MIN {
            end_date = end_date + Days::new(1);
        }
        if end_date <= self.start_date() {
            end_date = self.start_date() + Days::new(1);
        }
        self.start_date() <= date && date < end_date
    }
}
