//! HTML rendering of the agenda view.
//!
//! Pure functions: [`AgendaView`] in, email-client-friendly HTML out.
//! No network or file I/O happens here.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::agenda::{AgendaView, CalendarEvent, TaskRecord, TimedEntry};

/// Gaps shorter than this (minutes) get a warning in the schedule.
const TIGHT_GAP_MIN: i64 = 15;

const PILL_STYLE: &str =
    "background:#f3f4f6; color:#6b7280; padding:2px 8px; border-radius:12px; font-size:12px;";

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn fmt_time(dt: &DateTime<Tz>) -> String {
    dt.format("%-I:%M %p").to_string()
}

fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        words.join(" ")
    } else {
        format!("{}...", words[..max_words].join(" "))
    }
}

fn pill(label: &str, margin: &str) -> String {
    format!(
        "<span style=\"{PILL_STYLE} {margin}\">{}</span>",
        escape_html(label)
    )
}

fn render_all_day(events: &[CalendarEvent]) -> String {
    if events.is_empty() {
        return "<p style='color:#666; margin:8px 0;'>None</p>".into();
    }
    let mut out = String::new();
    for event in events {
        let mut item = format!(
            "{}<strong style=\"color:#111827;\">{}</strong>",
            pill(&event.source_feed, "margin-right:8px;"),
            escape_html(&event.title)
        );
        if let Some(location) = &event.location {
            item.push_str(&format!(
                " <span style=\"color:#6b7280;\">· {}</span>",
                escape_html(location)
            ));
        }
        out.push_str(&format!(
            "<div style=\"margin:8px 0; line-height:1.4;\">{item}</div>"
        ));
    }
    out
}

fn render_schedule(entries: &[TimedEntry]) -> String {
    if entries.is_empty() {
        return "<p style='color:#666; margin:8px 0;'>No scheduled events</p>".into();
    }
    let mut rows = String::new();
    for entry in entries {
        let event = &entry.event;
        let time_range = format!(
            "{}-{}",
            fmt_time(&event.start),
            fmt_time(&event.effective_end())
        );

        let mut body = format!(
            "<strong style=\"color:#111827;\">{}</strong>{}",
            escape_html(&event.title),
            pill(&event.source_feed, "margin-left:8px;")
        );
        if entry.overlaps {
            body.push_str(
                " <span style=\"color:#dc2626; background:#fef2f2; padding:2px 6px; \
                 border-radius:8px; font-size:11px; font-weight:600;\">⚠ overlap</span>",
            );
        }
        if let Some(gap) = entry.gap_to_next_min {
            if gap > 0 && gap < TIGHT_GAP_MIN {
                body.push_str(&format!(
                    " <span style=\"color:#dc2626; font-size:12px;\">• only {gap} min gap</span>"
                ));
            }
        }

        let mut details = Vec::new();
        if let Some(location) = &event.location {
            details.push(format!(
                "<span style=\"color:#6b7280;\">{}</span>",
                escape_html(location)
            ));
        }
        if let Some(notes) = &event.notes {
            details.push(format!(
                "<span style=\"color:#9ca3af; font-size:13px;\">{}</span>",
                escape_html(&truncate_words(notes, 6))
            ));
        }
        if !details.is_empty() {
            body.push_str(&format!(
                "<div style=\"margin-top:4px;\">{}</div>",
                details.join(" · ")
            ));
        }

        rows.push_str(&format!(
            "<tr>\
             <td style=\"white-space:nowrap; padding:12px 16px 12px 0; vertical-align:top; \
             color:#6b7280; font-size:13px; font-weight:500;\">{time_range}</td>\
             <td style=\"padding:12px 0; line-height:1.4;\">{body}</td>\
             </tr>"
        ));
    }
    format!("<table style=\"width:100%; border-collapse:collapse;\">{rows}</table>")
}

fn render_due_list(tasks: &[TaskRecord]) -> String {
    if tasks.is_empty() {
        return "<p style='color:#666; margin:8px 0;'>Nothing due</p>".into();
    }
    let mut out = String::new();
    for task in tasks {
        let title = escape_html(&task.title);
        let link = match &task.url {
            Some(url) => format!(
                "<a href=\"{}\" style=\"color:#3b82f6; text-decoration:none;\">{title}</a>",
                escape_html(url)
            ),
            None => title,
        };
        let first_line = format!(
            "<span style=\"color:#94a3b8; margin-right:6px;\">✮</span>{}{link}",
            pill(&task.database_name.to_lowercase(), "margin-right:8px;")
        );

        let mut metadata: Vec<String> = task
            .extra_fields
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(name, value)| format!("{}: {}", escape_html(name), escape_html(value)))
            .collect();
        if let Some(notes) = &task.notes {
            metadata.push(format!(
                "<span style=\"color:#9ca3af;\">{}</span>",
                escape_html(&truncate_words(notes, 8))
            ));
        }
        let metadata_html = if metadata.is_empty() {
            String::new()
        } else {
            format!(
                "<div style=\"font-size:13px; color:#6b7280; margin-top:2px;\">{}</div>",
                metadata.join(" · ")
            )
        };

        out.push_str(&format!(
            "<div style=\"margin:8px 0; line-height:1.4;\">{first_line}{metadata_html}</div>"
        ));
    }
    out
}

fn section(heading: &str, body: &str) -> String {
    format!(
        "<div style=\"margin-bottom:32px;\">\
         <h3 style=\"margin:0 0 12px 0; font-size:16px; font-weight:500; color:#374151;\">{heading}</h3>\
         {body}</div>"
    )
}

/// Render the full agenda email body.
pub fn build_html(view: &AgendaView) -> String {
    let day_label = view.day_label();

    let inner = if view.is_empty() {
        "<p style=\"color:#666; margin:8px 0;\">Nothing scheduled.</p>".to_string()
    } else {
        format!(
            "{}{}{}{}\
             <p style=\"color:#9ca3af; margin:16px 0 0 0; font-size:12px; line-height:1.4;\">\
             Overlap warnings and tight gaps (&lt;{TIGHT_GAP_MIN} min) apply to timed events only.</p>",
            section("All-day today", &render_all_day(&view.all_day)),
            section("Schedule", &render_schedule(&view.timed)),
            section("Due today", &render_due_list(&view.due_today)),
            section("Due tomorrow", &render_due_list(&view.due_tomorrow)),
        )
    };

    format!(
        "<div style=\"background-color:#f8fafc; padding:24px; font-family:-apple-system, \
         BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;\">\
         <div style=\"max-width:720px; margin:0 auto; background:#ffffff; border-radius:8px; \
         padding:24px; box-shadow:0 1px 3px rgba(0,0,0,0.1);\">\
         <h2 style=\"margin:0 0 24px 0; font-size:20px; font-weight:600; color:#111827; \
         line-height:1.3;\">Today's agenda - {day_label}</h2>\
         {inner}</div></div>"
    )
}
