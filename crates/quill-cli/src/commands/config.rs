use anyhow::Result;
use quill_config::Config;
use std::path::Path;

use crate::cli::ConfigCommands;

pub fn handle(cmd: ConfigCommands, config: &Config, path: &Path) -> Result<()> {
    match cmd {
        ConfigCommands::Path => {
            println!("{}", path.display());
        }
        ConfigCommands::Show => {
            print!("{}", toml::to_string_pretty(config)?);
        }
    }
    Ok(())
}
