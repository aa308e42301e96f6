use clap::{Parser, Subcommand};
use quill_config::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Blog post and lead form backend", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true, env = "QUILL_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, global = true, env = "QUILL_DATABASE")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(long, env = "QUILL_HOST")]
        host: Option<String>,

        #[arg(long, env = "QUILL_PORT")]
        port: Option<u16>,

        /// Prefix for image URLs, e.g. https://blog.example.com
        #[arg(long, env = "BASE_URL")]
        base_url: Option<String>,

        /// Directory uploads are written to and served from
        #[arg(long, env = "QUILL_UPLOAD_DIR")]
        upload_dir: Option<PathBuf>,
    },

    /// Export form submissions to CSV and exit
    Export {
        /// Target file, overwritten if present
        #[arg(long, short, env = "QUILL_CSV_PATH")]
        output: Option<PathBuf>,
    },

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the config file location
    Path,

    /// Print the effective configuration
    Show,
}

impl Cli {
    /// Config file location: `--config`, else the platform default
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::config_path)
    }

    /// Only `serve` persists a default config file on first run
    pub fn writes_default_config(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }

    /// Merge flags and environment values over the loaded config
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(database) = &self.database {
            config.database.path = database.clone();
        }

        match &self.command {
            Commands::Serve {
                host,
                port,
                base_url,
                upload_dir,
            } => {
                if let Some(host) = host {
                    config.server.host = host.clone();
                }
                if let Some(port) = port {
                    config.server.port = *port;
                }
                if let Some(base_url) = base_url {
                    config.uploads.base_url = base_url.clone();
                }
                if let Some(dir) = upload_dir {
                    config.uploads.dir = dir.clone();
                }
            }
            Commands::Export { output } => {
                if let Some(output) = output {
                    config.export.csv_path = output.clone();
                }
            }
            Commands::Config(_) => {}
        }
    }
}
