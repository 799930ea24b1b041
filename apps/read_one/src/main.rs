use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;
use wiki_integration::WikipediaClient;

mod commands;
mod config;
mod console;
mod game;
mod screen;

use config::{load_settings, CONFIG_FILE};
use game::Game;

#[derive(Parser, Debug)]
#[command(name = "read-one", about = "Two players, two random articles, one liar.")]
struct Args {
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,
    /// Wikipedia language code, e.g. `en` or `de`.
    #[arg(long)]
    language: Option<String>,
    #[arg(long)]
    min_content_length: Option<u64>,
    /// Base URL of an API mirror serving `/w/api.php`.
    #[arg(long)]
    api_base_url: Option<String>,
    #[arg(long)]
    player_one: Option<String>,
    #[arg(long)]
    player_two: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = load_settings(&args.config);
    if let Some(language) = args.language {
        settings.language = language;
    }
    if let Some(min_content_length) = args.min_content_length {
        settings.min_content_length = min_content_length;
    }
    if let Some(api_base_url) = args.api_base_url {
        settings.api_base_url = Some(api_base_url);
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();

    let client = match &settings.api_base_url {
        Some(raw) => {
            let base = Url::parse(raw).with_context(|| format!("invalid api base url: {raw}"))?;
            WikipediaClient::with_base_url(base)
        }
        None => WikipediaClient::new(),
    };
    let client = Arc::new(client);
    info!(
        language = %settings.language,
        min_content_length = settings.min_content_length,
        "read-one: starting"
    );

    let preset = args.player_one.zip(args.player_two);
    Game::new(settings, client.clone(), client).run(preset).await
}
