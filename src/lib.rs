pub mod cli;
pub mod config;
pub mod constants;
pub mod db;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
pub use config::Config;
pub use state::SharedState;

/// Parses the command line and runs one command against `config`, which the
/// caller has already validated.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    if matches!(command, Commands::Init) {
        if Config::write_default(Path::new(constants::config::FILE_NAME))? {
            println!("✓ Config file created. Edit config.toml and run again.");
        } else {
            println!("config.toml already exists.");
        }
        return Ok(());
    }

    let state = SharedState::new(config)
        .await
        .context("Failed to open record store")?;
    info!(
        database = %state.config.general.database_path,
        "Record store ready"
    );

    match command {
        Commands::Init => Ok(()),
        Commands::NextId => cli::cmd_next_username(&state).await,
        Commands::Register {
            password,
            confirm_password,
        } => cli::cmd_register(&state, &password, &confirm_password).await,
        Commands::Login { username, password } => {
            cli::cmd_login(&state, &username, &password).await
        }
        Commands::Details { username, details } => {
            cli::cmd_save_details(&state, &username, details.into()).await
        }
        Commands::Layout { username, layout } => {
            cli::cmd_save_layout(&state, &username, layout.into()).await
        }
        Commands::Dashboard { username } => cli::cmd_dashboard(&state, &username).await,
        Commands::Onboard { username } => cli::cmd_onboard(&state, &username).await,
        Commands::Offboard { username } => cli::cmd_offboard(&state, &username).await,
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides `general.log_level`.
pub fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.general.log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
