use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::Explicit;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub show: ChannelMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: String,
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_max_reads")]
    pub max_concurrent_reads: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Public location the media files are served from
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
    /// Media extension assumed when a metadata file names no media file
    #[serde(default = "default_extension")]
    pub extension: String,
}

/// Static channel-level feed metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMetadata {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_link")]
    pub link: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub copyright: String,
    #[serde(default = "default_title")]
    pub subtitle: String,
    #[serde(default = "default_author")]
    pub author: String,
    /// Used for both `itunes:summary` and `description`
    #[serde(default = "default_summary")]
    pub summary: String,
    #[serde(default)]
    pub owner: Owner,
    #[serde(default = "default_artwork_url")]
    pub artwork_url: String,
    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub explicit: Explicit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    #[serde(default = "default_owner_name")]
    pub name: String,
    #[serde(default = "default_owner_email")]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub text: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
}

fn default_input_dir() -> String {
    "episodes".to_string()
}
fn default_output_path() -> String {
    "feed.rss".to_string()
}
fn default_max_reads() -> usize {
    8
}
fn default_base_url() -> String {
    "http://cdn.brams.dev/wanshow/episodes".to_string()
}
fn default_mime_type() -> String {
    "audio/x-m4a".to_string()
}
fn default_extension() -> String {
    "m4a".to_string()
}
fn default_title() -> String {
    "The WAN Show Podcast".to_string()
}
fn default_link() -> String {
    "https://www.youtube.com/playlist?list=PLlr-m6aT0bkemifaU7ohKVJt3CAfr7nw8".to_string()
}
fn default_language() -> String {
    "en-us".to_string()
}
fn default_author() -> String {
    "Linus Tech Tips".to_string()
}
fn default_summary() -> String {
    "Every week Linus and Luke discuss the most current happenings in the technology universe."
        .to_string()
}
fn default_owner_name() -> String {
    "Linus Sebastian".to_string()
}
fn default_owner_email() -> String {
    "info@linusmediagroup.com".to_string()
}
fn default_artwork_url() -> String {
    "https://ssl-static.libsyn.com/p/assets/3/e/e/a/3eeaed49a6b57573/WAN-iTunes-Square.jpg"
        .to_string()
}
fn default_categories() -> Vec<Category> {
    vec![
        Category {
            text: "News".to_string(),
            subcategories: vec!["Tech News".to_string()],
        },
        Category {
            text: "Technology".to_string(),
            subcategories: Vec::new(),
        },
        Category {
            text: "Leisure".to_string(),
            subcategories: vec!["Video Games".to_string()],
        },
    ]
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_path: default_output_path(),
            max_concurrent_reads: default_max_reads(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            mime_type: default_mime_type(),
            extension: default_extension(),
        }
    }
}

impl Default for Owner {
    fn default() -> Self {
        Self {
            name: default_owner_name(),
            email: default_owner_email(),
        }
    }
}

impl Default for ChannelMetadata {
    fn default() -> Self {
        Self {
            title: default_title(),
            link: default_link(),
            language: default_language(),
            copyright: String::new(),
            subtitle: default_title(),
            author: default_author(),
            summary: default_summary(),
            owner: Owner::default(),
            artwork_url: default_artwork_url(),
            categories: default_categories(),
            explicit: Explicit::No,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config at {}", path.display()))?;
            let config: Self = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config at {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("podcast-feedgen").join("config.toml"))
    }

    pub fn input_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand(&self.general.input_dir))
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(shellexpand(&self.general.output_path))
    }
}

fn shellexpand(s: &str) -> String {
    if let Some(rest) = s.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest).to_string_lossy().to_string();
    }
    s.to_string()
}
