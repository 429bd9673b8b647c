//! # Agendamail Core Library
//!
//! Core logic for the Agendamail daily agenda mailer. The CLI binary is a
//! thin layer over this crate; every run is one sequential pass with no
//! state kept between invocations:
//!
//! 1. Fetch calendar events from configured ICS feeds
//! 2. Query configured Notion databases for tasks due today and tomorrow
//! 3. Aggregate everything into one ordered [`AgendaView`]
//! 4. Render the view to HTML and send it over SMTP
//!
//! ## Key Components
//!
//! - [`Config`]: TOML configuration with environment overrides for secrets
//! - [`agenda::build_view`]: the aggregation step: date filtering,
//!   deterministic ordering, overlap detection, due-date bucketing
//! - [`FeedClient`] / [`NotionClient`]: per-source fetchers that isolate
//!   failures to the failing source
//! - [`render::build_html`]: pure view-to-HTML rendering
//! - [`Mailer`]: SMTP delivery with classified errors

pub mod agenda;
pub mod config;
pub mod error;
pub mod ics;
pub mod mailer;
pub mod notion;
pub mod render;

pub use agenda::{build_view, AgendaView, CalendarEvent, TaskRecord, TimedEntry};
pub use config::{Config, DatabaseConfig};
pub use error::{ConfigError, CoreError, FeedError, MailError, NotionError};
pub use ics::FeedClient;
pub use mailer::Mailer;
pub use notion::NotionClient;
