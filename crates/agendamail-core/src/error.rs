//! Core error types for agendamail-core.
//!
//! One enum per concern, with a `CoreError` umbrella used at the
//! CLI boundary. Per-source fetch errors (`FeedError`, `NotionError`)
//! are recoverable: callers log them and continue with whatever
//! sources succeeded. `ConfigError` and `MailError` are fatal for
//! the run.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for agendamail-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Calendar feed errors
    #[error("Calendar feed error: {0}")]
    Feed(#[from] FeedError),

    /// Notion API errors
    #[error("Notion error: {0}")]
    Notion(#[from] NotionError),

    /// Mail delivery errors
    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors. Always fatal, raised before any
/// network call where feasible.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file does not exist
    #[error("Config file not found at {path}")]
    NotFound { path: PathBuf },

    /// Config file failed to parse as TOML
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A required setting is absent or empty
    #[error("Missing required setting: {0}")]
    MissingField(&'static str),

    /// The timezone setting is not a valid IANA identifier
    #[error("Invalid timezone identifier: {0}")]
    InvalidTimezone(String),

    /// Could not determine the config directory
    #[error("Could not determine config directory")]
    NoConfigDir,

    /// IO error while reading the config file
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-feed ICS fetch/parse errors. Recoverable: a failing feed
/// contributes zero events and the run continues.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Network-level failure fetching the feed
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The feed body is not valid iCalendar text
    #[error("Failed to parse feed {url}: {message}")]
    Parse { url: String, message: String },
}

/// Per-database Notion errors. Recoverable at the run level: a failing
/// database contributes zero tasks and the run continues.
#[derive(Error, Debug)]
pub enum NotionError {
    /// Network-level failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Notion API returned a non-success status
    #[error("Notion API error (HTTP {status}): {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    /// The configured date property does not exist on the database
    #[error("Database {database} has no property named '{property}'")]
    MissingDateProperty { database: String, property: String },

    /// No integration token configured
    #[error("No Notion token configured")]
    MissingToken,
}

/// SMTP delivery errors, classified so the operator can tell an
/// authentication failure from a connection failure.
#[derive(Error, Debug)]
pub enum MailError {
    /// The server rejected our credentials
    #[error("SMTP authentication failed: {0}")]
    Auth(String),

    /// Could not reach or negotiate with the server
    #[error("SMTP connection failed: {0}")]
    Connect(String),

    /// The server accepted the session but refused the message
    #[error("SMTP delivery failed: {0}")]
    Send(String),

    /// A configured address failed to parse
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// Message construction failed
    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
}
