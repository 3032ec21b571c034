use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use futures_util::stream;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, EpisodeError, Result};
use crate::models::RawEpisode;

/// Metadata file as written by the downloader. Fields are checked after
/// deserializing so a missing field and a malformed one report differently.
#[derive(Debug, Deserialize)]
struct EpisodeFile {
    title: Option<Value>,
    description: Option<Value>,
    upload_date: Option<Value>,
    duration: Option<Value>,
    filesize: Option<Value>,
    tags: Option<Value>,
    #[serde(rename = "_filename")]
    filename: Option<String>,
}

/// The outcome of loading one metadata file.
pub struct Loaded {
    pub file_name: String,
    pub episode: std::result::Result<RawEpisode, EpisodeError>,
}

/// List `.json` files in `dir`, sorted by file name.
pub fn list_episode_files(dir: &Path) -> Result<Vec<String>> {
    let input_dir_error = |source| AppError::InputDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(input_dir_error)? {
        let entry = entry.map_err(input_dir_error)?;
        let name = entry.file_name().to_string_lossy().to_string();
        if is_metadata_file(&name) && entry.path().is_file() {
            files.push(name);
        }
    }
    files.sort();
    Ok(files)
}

/// Text after the last `.` is `json`. A bare `.json` counts.
fn is_metadata_file(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(_, ext)| ext == "json")
}

/// Read and parse every metadata file in `dir`, keeping sorted order.
pub async fn load_episodes(
    dir: &Path,
    media_extension: &str,
    max_concurrent: usize,
) -> Result<Vec<Loaded>> {
    let files = list_episode_files(dir)?;
    tracing::debug!(dir = %dir.display(), count = files.len(), "found episode files");

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  [{bar:30.cyan/dim}] {pos}/{len} Loading episodes...")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );

    let loaded = stream::iter(files)
        .map(|file_name| {
            let path = dir.join(&file_name);
            let pb = pb.clone();
            async move {
                let episode = match tokio::fs::read(&path).await {
                    Ok(bytes) => parse_episode(&file_name, &bytes, dir, media_extension),
                    Err(e) => Err(EpisodeError::Read(e)),
                };
                pb.inc(1);
                Loaded { file_name, episode }
            }
        })
        .buffered(max_concurrent.max(1))
        .collect::<Vec<_>>()
        .await;

    pb.finish_and_clear();
    Ok(loaded)
}

/// Parse one metadata file into a raw episode record.
pub fn parse_episode(
    file_name: &str,
    bytes: &[u8],
    dir: &Path,
    media_extension: &str,
) -> std::result::Result<RawEpisode, EpisodeError> {
    let file: EpisodeFile = serde_json::from_slice(bytes)?;

    let source_id = file
        .filename
        .as_deref()
        .and_then(|f| Path::new(f).file_name())
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_else(|| {
            let stem = file_name.strip_suffix(".json").unwrap_or(file_name);
            format!("{stem}.{media_extension}")
        });
    let media_path: PathBuf = dir.join(&source_id);

    Ok(RawEpisode {
        file_name: file_name.to_string(),
        media_path,
        source_id,
        title: required_string(file.title, "title")?,
        description: required_string(file.description, "description")?,
        upload_date: required_string(file.upload_date, "upload_date")?,
        duration: duration_seconds(file.duration)?,
        filesize: filesize(file.filesize)?,
        tags: file.tags.and_then(tags),
    })
}

fn required_string(
    value: Option<Value>,
    field: &'static str,
) -> std::result::Result<String, EpisodeError> {
    match value {
        Some(Value::String(s)) => Ok(s),
        _ => Err(EpisodeError::MissingField(field)),
    }
}

/// Whole seconds. Integral floats such as `3600.0` are accepted.
fn duration_seconds(value: Option<Value>) -> std::result::Result<i64, EpisodeError> {
    let number = match value {
        None | Some(Value::Null) => return Err(EpisodeError::MissingField("duration")),
        Some(Value::Number(n)) => n,
        Some(other) => {
            return Err(EpisodeError::InvalidDuration(format!(
                "{other} is not a number"
            )));
        }
    };

    if let Some(secs) = number.as_i64() {
        return Ok(secs);
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        _ => Err(EpisodeError::InvalidDuration(format!(
            "{number} is not a whole number of seconds"
        ))),
    }
}

/// `None` means the size has to be read from the media file.
fn filesize(value: Option<Value>) -> std::result::Result<Option<u64>, EpisodeError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or(EpisodeError::MissingField("filesize")),
        Some(_) => Err(EpisodeError::MissingField("filesize")),
    }
}

fn tags(value: Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect(),
        ),
        Value::Null => None,
        Value::String(s) => Some(vec![s]),
        other => Some(vec![other.to_string()]),
    }
}
