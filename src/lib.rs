pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod parser;
pub mod services;
pub mod state;

use clap::Parser;
use cli::{Cli, Commands};
pub use config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("✓ Created config.toml");
            } else {
                println!("config.toml already exists");
            }
            Ok(())
        }

        Commands::AddShow {
            tmdb_id,
            name,
            folder_id,
            poster,
        } => cli::cmd_add_show(&config, tmdb_id, &name, folder_id, poster).await,

        Commands::Shows => cli::cmd_list_shows(&config).await,

        Commands::Season(args) => {
            info!(tmdb_id = args.tmdb_id, season = args.season, "Opening season");
            cli::cmd_season(&config, args).await
        }

        Commands::Progress {
            tmdb_id,
            season,
            episode,
            watched_ms,
            total_ms,
        } => cli::cmd_progress(&config, tmdb_id, season, episode, watched_ms, total_ms).await,

        Commands::Download {
            tmdb_id,
            season,
            episode,
        } => cli::cmd_download(&config, tmdb_id, season, episode).await,

        Commands::RemoveOffline {
            tmdb_id,
            season,
            episode,
        } => cli::cmd_remove_offline(&config, tmdb_id, season, episode).await,
    }
}
