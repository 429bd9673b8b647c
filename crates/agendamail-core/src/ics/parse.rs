//! ICS feed parsing and timezone normalization.

use chrono::{DateTime, Days, Duration, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use icalendar::{Calendar, CalendarComponent, CalendarDateTime, Component, DatePerhapsTime, EventLike};
use url::Url;

use crate::agenda::CalendarEvent;
use crate::error::FeedError;

/// Convert an iCalendar date/datetime into the configured local zone.
///
/// UTC stamps convert directly; floating stamps are treated as UTC, as
/// are stamps with an unrecognized TZID; date-only values become local
/// midnight.
fn to_local(value: &DatePerhapsTime, tz: Tz) -> DateTime<Tz> {
    match value {
        DatePerhapsTime::DateTime(cdt) => match cdt {
            CalendarDateTime::Utc(dt) => dt.with_timezone(&tz),
            CalendarDateTime::Floating(naive) => naive.and_utc().with_timezone(&tz),
            CalendarDateTime::WithTimezone { date_time, tzid } => match tzid.parse::<Tz>() {
                Ok(source_tz) => local_or_utc(source_tz, date_time).with_timezone(&tz),
                Err(_) => date_time.and_utc().with_timezone(&tz),
            },
        },
        DatePerhapsTime::Date(date) => {
            let midnight = date.and_time(NaiveTime::MIN);
            local_or_utc(tz, &midnight)
        }
    }
}

/// Resolve a naive local time in `tz`, falling back through DST gaps.
fn local_or_utc(tz: Tz, naive: &NaiveDateTime) -> DateTime<Tz> {
    tz.from_local_datetime(naive)
        .earliest()
        .unwrap_or_else(|| naive.and_utc().with_timezone(&tz))
}

/// Derive a display name from the feed URL's file stem when the calendar
/// carries no X-WR-CALNAME.
pub fn feed_name_from_url(url: &str) -> String {
    let stem = Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .unwrap_or_default();
    let stem = stem.strip_suffix(".ics").unwrap_or(&stem).to_string();
    if stem.is_empty() {
        "Calendar".into()
    } else {
        stem
    }
}

fn calendar_name(calendar: &Calendar, url: &str) -> String {
    // get_name reads NAME with an X-WR-CALNAME fallback.
    match calendar.get_name() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => feed_name_from_url(url),
    }
}

/// Parse one feed body into events overlapping the target day.
///
/// Events outside `[local midnight, next midnight)` are dropped here;
/// the aggregator applies the stricter per-date rules afterwards.
pub fn parse_feed(
    text: &str,
    url: &str,
    tz: Tz,
    date: chrono::NaiveDate,
) -> Result<Vec<CalendarEvent>, FeedError> {
    let calendar: Calendar = text.parse().map_err(|message: String| FeedError::Parse {
        url: url.to_string(),
        message,
    })?;
    let feed_name = calendar_name(&calendar, url);

    let day_start = local_or_utc(tz, &date.and_time(NaiveTime::MIN));
    let day_end = local_or_utc(tz, &(date + Days::new(1)).and_time(NaiveTime::MIN));

    let mut events = Vec::new();
    for component in &calendar.components {
        let CalendarComponent::Event(entry) = component else {
            continue;
        };
        let Some(dtstart) = entry.get_start() else {
            continue;
        };
        let start = to_local(&dtstart, tz);
        let date_only = matches!(dtstart, DatePerhapsTime::Date(_));

        let end = entry.get_end().map(|dtend| to_local(&dtend, tz));

        // All-day: DTSTART is date-only, or the entry starts at local
        // midnight and runs for most of a day.
        let mut all_day = date_only;
        if !all_day {
            if let Some(end) = end {
                if start.time() == NaiveTime::MIN
                    && end - start >= Duration::hours(23) + Duration::minutes(30)
                {
                    all_day = true;
                }
            }
        }

        let end = match end {
            Some(end) => Some(end),
            // Date-only entries without DTEND span one day; the model
            // represents that as a missing end.
            None if all_day => None,
            None => Some(start),
        };

        let event = CalendarEvent {
            title: entry
                .get_summary()
                .filter(|s| !s.is_empty())
                .unwrap_or("(No title)")
                .to_string(),
            start,
            end,
            location: entry
                .get_location()
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            notes: entry
                .get_description()
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            all_day,
            source_feed: feed_name.clone(),
        };

        if event.effective_end() <= day_start || event.start >= day_end {
            continue;
        }
        events.push(event);
    }

    Ok(events)
}
