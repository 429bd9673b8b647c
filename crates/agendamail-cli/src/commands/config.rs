//! Configuration inspection.

use clap::Subcommand;

use agendamail_core::config::{config_path, Config};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration with secrets redacted
    Show,
    /// Print the config file path
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", toml::to_string_pretty(&config.redacted())?);
        }
        ConfigAction::Path => {
            println!("{}", config_path()?.display());
        }
    }
    Ok(())
}
