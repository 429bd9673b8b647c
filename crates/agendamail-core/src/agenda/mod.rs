//! Agenda data model and aggregation.
//!
//! The one piece of real logic in the pipeline: merging unordered events
//! and tasks from N sources into a single deterministic view for one
//! target date, with overlap detection and due-date bucketing.

pub mod event;
pub mod task;
pub mod view;


pub use event::CalendarEvent;
pub use task::TaskRecord;
pub use view::{build_view, AgendaView, TimedEntry};
