//! Full run: fetch, aggregate, render, send.

use chrono::NaiveDate;

use agendamail_core::{mailer, render, Config, Mailer};

pub async fn run(date: Option<NaiveDate>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    // Fail on missing credentials before any network call.
    config.validate_for_send()?;

    let target = super::resolve_date(&config, date)?;
    let view = super::collect_view(&config, target).await?;
    let html = render::build_html(&view);

    Mailer::new(&config.smtp).send(&mailer::subject_for(target), html)?;
    println!("Agenda for {target} sent to {}", config.smtp.to);
    Ok(())
}
