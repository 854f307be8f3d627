mod cli;
mod output;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use toshokan_api::anilist::AniListClient;
use toshokan_core::config::AppConfig;
use toshokan_core::error::ToshokanError;
use toshokan_core::provider::{ProviderRegistry, ReleaseRequest, ToshoProvider};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "toshokan=debug".to_string()
        } else {
            "toshokan=info".to_string()
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "lookup failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<(), ToshokanError> {
    let config = AppConfig::load()?;

    let anilist = AniListClient::with_base_url(&config.endpoints.anilist);
    let media = anilist
        .get_media(cli.anilist_id)
        .await
        .map_err(|e| ToshokanError::Metadata(format!("anilist id {}: {e}", cli.anilist_id)))?;
    tracing::info!(
        media_id = media.id,
        title = media.preferred_title(),
        episode = ?cli.episode,
        "looking up releases"
    );

    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(ToshoProvider::from_config(&config)));

    let request = ReleaseRequest {
        media,
        episode: cli.episode,
    };
    let releases = registry
        .find_releases(&request, cli.quality(config.feed.quality()))
        .await?;

    if cli.json {
        let json = serde_json::to_string_pretty(&releases)
            .map_err(|e| ToshokanError::Provider(e.to_string()))?;
        println!("{json}");
    } else if releases.is_empty() {
        println!("No releases found.");
    } else {
        for release in &releases {
            println!("{}", output::release_line(release));
        }
    }
    Ok(())
}
