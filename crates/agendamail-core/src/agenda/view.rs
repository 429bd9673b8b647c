//! Agenda aggregation: the single ordered view for one target date.
//!
//! Merges events from all feeds and tasks from all databases into one
//! deterministic structure. Nothing here touches the network; fetch
//! failures were already handled upstream by handing us whatever subset
//! of sources succeeded.

use chrono::{Days, NaiveDate};
use chrono_tz::Tz;

use super::event::CalendarEvent;
use super::task::TaskRecord;

/// A timed event plus its display annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedEntry {
    pub event: CalendarEvent,
    /// True when the event's `[start, end)` range intersects at least one
    /// other timed event that day.
    pub overlaps: bool,
    /// Minutes from this event's end to the next event's start, when a
    /// next event exists. Negative while ranges overlap.
    pub gap_to_next_min: Option<i64>,
}

/// The aggregate view handed to the renderer. No independent identity or
/// persistence beyond one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AgendaView {
    pub date: NaiveDate,
    pub timezone: Tz,
    pub all_day: Vec<CalendarEvent>,
    pub timed: Vec<TimedEntry>,
    pub due_today: Vec<TaskRecord>,
    pub due_tomorrow: Vec<TaskRecord>,
}

impl AgendaView {
    /// True when nothing at all is scheduled for the window.
    pub fn is_empty(&self) -> bool {
        self.all_day.is_empty()
            && self.timed.is_empty()
            && self.due_today.is_empty()
            && self.due_tomorrow.is_empty()
    }

    /// Header label, e.g. "Tuesday, September 2".
    pub fn day_label(&self) -> String {
        self.date.format("%A, %B %-d").to_string()
    }
}

/// Build the agenda view for `date`.
///
/// Input order of `events` and `tasks` is irrelevant; output order is
/// fully determined by the sort rules below, so the view is identical
/// whatever order the feeds and databases were fetched in.
pub fn build_view(
    events: Vec<CalendarEvent>,
    tasks: Vec<TaskRecord>,
    date: NaiveDate,
    timezone: Tz,
) -> AgendaView {
    let mut all_day = Vec::new();
    let mut timed = Vec::new();

    for event in events {
        if event.all_day {
            // All-day entries span their whole date range.
            if event.spans_date(date) {
                all_day.push(event);
            }
        } else if event.start_date() == date {
            timed.push(event);
        }
    }

    all_day.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.source_feed.cmp(&b.source_feed)));
    timed.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.source_feed.cmp(&b.source_feed))
    });

    // Pairwise half-open interval intersection; informational only.
    let mut overlapped = vec![false; timed.len()];
    for i in 0..timed.len() {
        for j in 0..i {
            let (a, b) = (&timed[i], &timed[j]);
            if a.start < b.effective_end() && b.start < a.effective_end() {
                overlapped[i] = true;
                overlapped[j] = true;
            }
        }
    }

    let gaps: Vec<Option<i64>> = (0..timed.len())
        .map(|i| {
            timed
                .get(i + 1)
                .map(|next| (next.start - timed[i].effective_end()).num_minutes())
        })
        .collect();

    let timed = timed
        .into_iter()
        .zip(overlapped)
        .zip(gaps)
        .map(|((event, overlaps), gap_to_next_min)| TimedEntry {
            event,
            overlaps,
            gap_to_next_min,
        })
        .collect();

    let tomorrow = date + Days::new(1);
    let mut due_today = Vec::new();
    let mut due_tomorrow = Vec::new();
    for task in tasks {
        if task.due_date == date {
            due_today.push(task);
        } else if task.due_date == tomorrow {
            due_tomorrow.push(task);
        }
        // Anything outside the two-day window is dropped from the view.
    }

    let bucket_order = |a: &TaskRecord, b: &TaskRecord| {
        a.database_rank
            .cmp(&b.database_rank)
            .then_with(|| a.title.cmp(&b.title))
    };
    due_today.sort_by(bucket_order);
    due_tomorrow.sort_by(bucket_order);

    AgendaView {
        date,
        timezone,
        all_day,
        timed,
        due_today,
        due_tomorrow,
    }
}
