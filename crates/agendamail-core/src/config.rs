//! TOML-based application configuration.
//!
//! Stores everything a run needs:
//! - SMTP endpoint and recipient
//! - Target timezone
//! - ICS feed URLs
//! - Notion token and per-database query settings
//!
//! Configuration is read from `~/.config/agendamail/config.toml`, or the
//! path in `AGENDAMAIL_CONFIG` when set. Secrets can be supplied via the
//! environment instead of the file: `NOTION_TOKEN` and
//! `AGENDAMAIL_SMTP_PASS` override their file counterparts.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use chrono_tz::Tz;

use crate::error::ConfigError;

/// SMTP endpoint and recipient settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    #[serde(default = "default_smtp_host")]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// SMTP username; also used as the From address.
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    /// Recipient address.
    #[serde(default)]
    pub to: String,
}

/// Settings for one Notion database query.
///
/// Databases are declared as an array of tables so their declaration
/// order is preserved; task ordering in the agenda follows it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Notion database identifier.
    pub id: String,
    /// Name of the property holding the due date.
    #[serde(default = "default_date_property")]
    pub date_property: String,
    /// Display name; when absent the database's own title is fetched.
    #[serde(default)]
    pub name: Option<String>,
    /// Extra property names to show under each task.
    #[serde(default)]
    pub fields: Vec<String>,
}

/// Notion integration settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotionConfig {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub databases: Vec<DatabaseConfig>,
}

/// Calendar feed settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CalendarConfig {
    /// ICS feed URLs.
    #[serde(default)]
    pub ics_urls: Vec<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/agendamail/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IANA timezone identifier used for all date math.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub notion: NotionConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".into()
}
fn default_smtp_port() -> u16 {
    587
}
fn default_date_property() -> String {
    "Date".into()
}
fn default_timezone() -> String {
    "America/New_York".into()
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            user: String::new(),
            password: String::new(),
            to: String::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            smtp: SmtpConfig::default(),
            notion: NotionConfig::default(),
            calendar: CalendarConfig::default(),
        }
    }
}

/// Returns the config file path: `AGENDAMAIL_CONFIG` if set, otherwise
/// `~/.config/agendamail/config.toml`.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = std::env::var("AGENDAMAIL_CONFIG") {
        return Ok(PathBuf::from(path));
    }
    let base = dirs::home_dir()
        .ok_or(ConfigError::NoConfigDir)?
        .join(".config")
        .join("agendamail");
    Ok(base.join("config.toml"))
}

impl Config {
    /// Load configuration from the default path, applying environment
    /// overrides for secrets.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_path()?)
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound { path: path.clone() });
        }
        let text = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Secrets may live in the environment instead of the file.
    fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("NOTION_TOKEN") {
            if !token.is_empty() {
                self.notion.token = token;
            }
        }
        if let Ok(pass) = std::env::var("AGENDAMAIL_SMTP_PASS") {
            if !pass.is_empty() {
                self.smtp.password = pass;
            }
        }
    }

    /// Parse the configured timezone identifier.
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone(self.timezone.clone()))
    }

    /// Check that everything a send run needs is present. Called before
    /// any network activity.
    pub fn validate_for_send(&self) -> Result<(), ConfigError> {
        self.tz()?;
        if self.smtp.to.is_empty() {
            return Err(ConfigError::MissingField("smtp.to"));
        }
        if self.smtp.user.is_empty() {
            return Err(ConfigError::MissingField("smtp.user"));
        }
        if self.smtp.password.is_empty() {
            return Err(ConfigError::MissingField("smtp.password"));
        }
        self.validate_sources()
    }

    /// Weaker check for preview runs: only the fetch side must be sane.
    pub fn validate_sources(&self) -> Result<(), ConfigError> {
        self.tz()?;
        for db in &self.notion.databases {
            if db.id.is_empty() {
                return Err(ConfigError::MissingField("notion.databases[].id"));
            }
            if db.date_property.is_empty() {
                return Err(ConfigError::MissingField("notion.databases[].date_property"));
            }
        }
        if !self.notion.databases.is_empty() && self.notion.token.is_empty() {
            return Err(ConfigError::MissingField("notion.token"));
        }
        Ok(())
    }

    /// Serialize for display with secrets redacted.
    pub fn redacted(&self) -> Config {
        let mut shown = self.clone();
        if !shown.smtp.password.is_empty() {
            shown.smtp.password = "<redacted>".into();
        }
        if !shown.notion.token.is_empty() {
            shown.notion.token = "<redacted>".into();
        }
        shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(text: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(text.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn load_minimal_config() {
        let (_dir, path) = write_config(
            r#"
timezone = "Europe/Brussels"

[smtp]
user = "me@example.com"
password = "hunter2"
to = "me@example.com"

[calendar]
ics_urls = ["https://example.com/cal.ics"]
"#,
        );
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.timezone, "Europe/Brussels");
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.calendar.ics_urls.len(), 1);
        assert!(config.validate_for_send().is_ok());
    }

    #[test]
    fn database_declaration_order_is_preserved() {
        let (_dir, path) = write_config(
            r#"
[[notion.databases]]
id = "db-b"

[[notion.databases]]
id = "db-a"
date_property = "Due"
fields = ["Priority", "Class"]
"#,
        );
        let config = Config::load_from(&path).unwrap();
        let ids: Vec<_> = config.notion.databases.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["db-b", "db-a"]);
        assert_eq!(config.notion.databases[0].date_property, "Date");
        assert_eq!(config.notion.databases[1].fields, vec!["Priority", "Class"]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = Config::load_from(&PathBuf::from("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn send_validation_requires_recipient() {
        let config = Config::default();
        let err = config.validate_for_send().unwrap_err();
        assert!(matches!(err, ConfigError::MissingField("smtp.to")));
    }

    #[test]
    fn bad_timezone_rejected() {
        let config = Config {
            timezone: "Mars/Olympus_Mons".into(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate_sources().unwrap_err(),
            ConfigError::InvalidTimezone(_)
        ));
    }

    #[test]
    fn databases_without_token_rejected() {
        let config = Config {
            notion: NotionConfig {
                token: String::new(),
                databases: vec![DatabaseConfig {
                    id: "db".into(),
                    date_property: "Date".into(),
                    name: None,
                    fields: vec![],
                }],
            },
            ..Config::default()
        };
        assert!(matches!(
            config.validate_sources().unwrap_err(),
            ConfigError::MissingField("notion.token")
        ));
    }

    #[test]
    fn redacted_hides_secrets() {
        let config = Config {
            notion: NotionConfig {
                token: "secret_abc".into(),
                databases: vec![],
            },
            smtp: SmtpConfig {
                password: "hunter2".into(),
                ..SmtpConfig::default()
            },
            ..Config::default()
        };
        let shown = config.redacted();
        assert_eq!(shown.smtp.password, "<redacted>");
        assert_eq!(shown.notion.token, "<redacted>");
    }
}
