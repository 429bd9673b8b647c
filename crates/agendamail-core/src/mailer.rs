//! SMTP delivery of the rendered agenda.
//!
//! Port 465 uses implicit TLS, anything else negotiates STARTTLS. Errors
//! are classified so the operator can tell a bad credential from an
//! unreachable server.

use chrono::NaiveDate;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use log::info;
use std::time::Duration;

use crate::config::SmtpConfig;
use crate::error::MailError;

const SMTP_TIMEOUT: Duration = Duration::from_secs(20);

/// Email subject for a target date, e.g. "Agenda for Tue, Sep 2".
pub fn subject_for(date: NaiveDate) -> String {
    format!("Agenda for {}", date.format("%a, %b %-d"))
}

pub struct Mailer {
    config: SmtpConfig,
}

impl Mailer {
    pub fn new(config: &SmtpConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn transport(&self) -> Result<SmtpTransport, MailError> {
        let builder = if self.config.port == 465 {
            SmtpTransport::relay(&self.config.host)
        } else {
            SmtpTransport::starttls_relay(&self.config.host)
        }
        .map_err(classify_smtp_error)?;

        Ok(builder
            .port(self.config.port)
            .credentials(Credentials::new(
                self.config.user.clone(),
                self.config.password.clone(),
            ))
            .timeout(Some(SMTP_TIMEOUT))
            .build())
    }

    /// Send one HTML message to the configured recipient.
    pub fn send(&self, subject: &str, html_body: String) -> Result<(), MailError> {
        let from: Mailbox = self.config.user.parse()?;
        let to: Mailbox = self.config.to.parse()?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body)?;

        let transport = self.transport()?;
        transport.send(&message).map_err(classify_smtp_error)?;
        info!("sent \"{subject}\" to {}", self.config.to);
        Ok(())
    }
}

/// Map an SMTP error to the taxonomy: 53x replies are authentication
/// failures, other server replies are delivery failures, and anything
/// without a reply (refused connection, timeout, TLS) is a connection
/// failure.
fn classify_smtp_error(e: lettre::transport::smtp::Error) -> MailError {
    match e.status() {
        Some(code) => {
            let digits: u16 = format!("{code}").parse().unwrap_or(0);
            if (530..=539).contains(&digits) {
                MailError::Auth(e.to_string())
            } else {
                MailError::Send(e.to_string())
            }
        }
        None => MailError::Connect(e.to_string()),
    }
}
