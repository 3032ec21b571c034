use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::AppConfig;
use crate::episode::{ByteSizer, FsSizer, build_episode};
use crate::error::{AppError, EpisodeError};
use crate::feed;
use crate::loader::{self, Loaded};
use crate::models::FeedEpisode;

/// What a build produced, for reporting.
pub struct BuildReport {
    pub episodes: Vec<FeedEpisode>,
    pub skipped: Vec<(String, EpisodeError)>,
    pub xml: Vec<u8>,
}

pub async fn run(
    input: Option<&Path>,
    output: Option<&Path>,
    base_url: Option<&str>,
    config: &AppConfig,
) -> Result<()> {
    let mut config = config.clone();
    if let Some(url) = base_url {
        config.media.base_url = url.to_string();
    }
    let input_dir = input.map(Path::to_path_buf).unwrap_or_else(|| config.input_dir());
    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.output_path());

    println!("Reading episodes from {}...", input_dir.display());
    let report = build_feed(&input_dir, &config, &FsSizer).await?;
    write_feed(&output_path, &report.xml).await?;

    println!();
    println!("  Feed: {}", output_path.display());
    println!("  Items: {}", report.episodes.len());
    if !report.skipped.is_empty() {
        println!("  Skipped: {}", report.skipped.len());
        for (file, err) in &report.skipped {
            println!("    {file}: {err}");
        }
    }
    println!();

    Ok(())
}

/// Load, build and render the feed. Episodes that fail are skipped.
pub async fn build_feed(
    input_dir: &Path,
    config: &AppConfig,
    sizer: &impl ByteSizer,
) -> Result<BuildReport> {
    let loaded = loader::load_episodes(
        input_dir,
        &config.media.extension,
        config.general.max_concurrent_reads,
    )
    .await?;

    let mut episodes = Vec::new();
    let mut skipped = Vec::new();
    for Loaded { file_name, episode } in loaded {
        let built = episode
            .and_then(|raw| build_episode(&raw, &config.show, &config.media, sizer));
        match built {
            Ok(episode) => {
                tracing::debug!(file = %file_name, guid = %episode.guid, "built episode");
                episodes.push(episode);
            }
            Err(e) => {
                tracing::warn!(file = %file_name, error = %e, "skipping episode");
                skipped.push((file_name, e));
            }
        }
    }

    let xml = feed::render_feed(&config.show, &episodes)?;
    Ok(BuildReport {
        episodes,
        skipped,
        xml,
    })
}

/// Write to a `.part` file first, then rename over the target.
pub async fn write_feed(path: &Path, xml: &[u8]) -> Result<(), AppError> {
    let write_error = |source| AppError::WriteOutput {
        path: path.to_path_buf(),
        source,
    };

    let tmp_path = part_path(path);
    tokio::fs::write(&tmp_path, xml).await.map_err(write_error)?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(write_error)?;
    tracing::debug!(path = %path.display(), bytes = xml.len(), "feed written");
    Ok(())
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}
