use circuitroom_core::TimerConfig;
use clap::Subcommand;

use crate::common;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Write a default configuration file
    Init,
    /// Print the configuration file path
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let path = common::config_path();
    match action {
        ConfigAction::Show => {
            let config = TimerConfig::load_or_default(&path)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Init => {
            TimerConfig::default().save(&path)?;
            println!("wrote {}", path.display());
        }
        ConfigAction::Path => println!("{}", path.display()),
    }
    Ok(())
}
