use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_DB_PATH, ENV_HOST, ENV_MAX_PAGE_LIMIT, ENV_PORT,
};

#[derive(Parser)]
#[command(name = "recipebox")]
#[command(version, about = "Recipe catalog search API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite database file
    #[arg(long, global = true, env = ENV_DB_PATH)]
    pub db_path: Option<PathBuf>,

    /// Largest page size a client may request
    #[arg(long, global = true, env = ENV_MAX_PAGE_LIMIT)]
    pub max_page_limit: Option<u32>,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// Replace the recipe collection with the contents of a JSON file
    Seed {
        /// JSON file holding an object or array of recipes
        file: PathBuf,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub max_page_limit: Option<u32>,
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            config: cli.config,
            db_path: cli.db_path,
            max_page_limit: cli.max_page_limit,
        }
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let mut cli = Cli::parse();
    let command = cli.command.take();
    (cli.into(), command)
}
