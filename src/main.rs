mod cli;
mod commands;
mod config;
mod episode;
mod error;
mod feed;
mod loader;
mod models;
mod normalize;
mod xml;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, ConfigAction};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = config::AppConfig::load()?;

    match &cli.command {
        Command::Build {
            input,
            output,
            base_url,
        } => {
            commands::build::run(
                input.as_deref(),
                output.as_deref(),
                base_url.as_deref(),
                &config,
            )
            .await?;
        }
        Command::List { input } => {
            commands::list::run(input.as_deref(), &config).await?;
        }
        Command::Config { action } => match action {
            Some(ConfigAction::Path) => {
                println!("{}", config::AppConfig::config_path()?.display());
            }
            Some(ConfigAction::Set { key, value }) => {
                commands::config_set::run(key, value)?;
            }
            Some(ConfigAction::Show) | None => {
                let content = toml::to_string_pretty(&config)?;
                println!("{content}");
            }
        },
    }

    Ok(())
}
