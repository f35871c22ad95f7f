//! Core application

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::ApiServer;
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::ENV_LOG;
use crate::core::shutdown::ShutdownService;
use crate::data::seed::load_seed_file;
use crate::data::{RecipeRepository, SqliteService};

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub database: Arc<SqliteService>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self::init(&cli_config).await?;
        match command {
            Some(Commands::Seed { file }) => app.seed(&file).await,
            Some(Commands::Start) | None => Self::start_server(app).await,
        }
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;

        let database = Arc::new(
            SqliteService::init(&config.database)
                .await
                .with_context(|| {
                    format!(
                        "Failed to open database: {}",
                        config.database.path.display()
                    )
                })?,
        );
        let shutdown = ShutdownService::new(database.clone());

        Ok(Self {
            shutdown,
            config,
            database,
        })
    }

    /// Replace the recipe collection with the contents of `file`
    async fn seed(self, file: &Path) -> Result<()> {
        let recipes = load_seed_file(file)
            .await
            .with_context(|| format!("Failed to load seed file: {}", file.display()))?;

        let seeded = self.database.replace_all(&recipes).await?;
        tracing::info!(count = seeded, path = %file.display(), "Recipes seeded");
        println!("Seeded {} recipes", seeded);

        self.shutdown.shutdown().await;
        Ok(())
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", env!("CARGO_CRATE_NAME"));

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        app.start_background_tasks().await;

        banner::print_banner(
            &app.config.server.host,
            app.config.server.port,
            &app.config.database.path.display().to_string(),
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }

    pub async fn start_background_tasks(&self) {
        self.shutdown
            .register(
                self.database
                    .start_checkpoint_task(self.shutdown.subscribe()),
            )
            .await;

        tracing::debug!("Background tasks started");
    }
}
