use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use serde::Serialize;

use amazonmusic::{Album, AlbumInfo, Client, Track};

mod config;
use config::Config;

/// Look up an Amazon Music album and export it, with its tracks, as JSON.
#[derive(Parser)]
#[command(group(
    clap::ArgGroup::new("input")
        .required(true)
        .args(["asin", "payload"])
))]
struct Args {
    /// The ASIN of the album to look up.
    asin: Option<String>,
    /// Build the album from a saved album payload (summary or detailed) instead.
    /// Summaries are looked up to fetch their tracks.
    #[arg(long)]
    payload: Option<PathBuf>,
    /// Where to write the JSON. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// The config file holding the session details.
    #[arg(long, default_value = Config::FILENAME)]
    config: PathBuf,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputAlbum<'a> {
    #[serde(flatten)]
    album: &'a AlbumInfo,
    released_at: Option<String>,
    tracks: Vec<Track>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("amazonmusic=info,amazonmusic_album=info")
            }),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(&args.config)?;
    let client = Arc::new(Client::new(config.session));

    let mut album = match (&args.asin, &args.payload) {
        (_, Some(payload)) => {
            let data = serde_json::from_str(
                &std::fs::read_to_string(payload)
                    .with_context(|| format!("Failed to read {}", payload.display()))?,
            )?;
            Album::from_json(client.clone(), data)
                .with_context(|| format!("Invalid album payload in {}", payload.display()))?
        }
        (Some(asin), None) => client
            .get_album(asin)
            .await
            .with_context(|| format!("Failed to look up album {asin}"))?,
        (None, None) => anyhow::bail!("Either an ASIN or --payload is required"),
    };

    let tracks = album
        .tracks()
        .await
        .with_context(|| format!("Failed to load tracks for album {}", album.id()))?;
    tracing::info!(
        "fetched {} ({} by {}) with {} tracks",
        album.id(),
        album.name(),
        album.artist(),
        tracks.len()
    );

    let output = OutputAlbum {
        album: album.info(),
        released_at: album.released_at().map(|date| date.to_rfc3339()),
        tracks,
    };
    let json = serde_json::to_string_pretty(&output)?;

    match &args.output {
        Some(output_path) => std::fs::write(output_path, json)
            .with_context(|| format!("Failed to write to {output_path:?}"))?,
        None => println!("{json}"),
    }

    Ok(())
}
