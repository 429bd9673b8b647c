//! Preview run: render the agenda without sending.

use chrono::NaiveDate;
use std::path::PathBuf;

use agendamail_core::{render, Config};

pub async fn run(
    date: Option<NaiveDate>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    // SMTP credentials are not needed to preview.
    config.validate_sources()?;

    let target = super::resolve_date(&config, date)?;
    let view = super::collect_view(&config, target).await?;
    let html = render::build_html(&view);

    match output {
        Some(path) => {
            std::fs::write(&path, html)?;
            println!("Preview for {target} written to {}", path.display());
        }
        None => println!("{html}"),
    }
    Ok(())
}
