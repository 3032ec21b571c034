use std::path::Path;

use crate::config::{ChannelMetadata, MediaConfig};
use crate::error::EpisodeError;
use crate::models::{Explicit, FeedEpisode, RawEpisode};
use crate::normalize::{normalize_date, normalize_duration, normalize_summary};

/// Looks up the size in bytes of a media file.
pub trait ByteSizer {
    fn size_of(&self, path: &Path) -> std::io::Result<u64>;
}

/// Sizes files by reading their filesystem metadata.
pub struct FsSizer;

impl ByteSizer for FsSizer {
    fn size_of(&self, path: &Path) -> std::io::Result<u64> {
        Ok(std::fs::metadata(path)?.len())
    }
}

/// Build a feed-ready episode from a raw record and the show's constants.
pub fn build_episode(
    raw: &RawEpisode,
    show: &ChannelMetadata,
    media: &MediaConfig,
    sizer: &impl ByteSizer,
) -> Result<FeedEpisode, EpisodeError> {
    let pub_date = normalize_date(&raw.upload_date)?;
    let duration = normalize_duration(raw.duration)?;
    let enclosure_url = enclosure_url(&media.base_url, &raw.source_id);
    let content_length = content_length(raw, sizer)?;
    let guid = guid(&enclosure_url, content_length);

    Ok(FeedEpisode {
        file_name: raw.file_name.clone(),
        title: raw.title.clone(),
        author: show.author.clone(),
        subtitle: show.subtitle.clone(),
        summary_html: normalize_summary(&raw.description),
        image_url: show.artwork_url.clone(),
        explicit: Explicit::No,
        episode_url: enclosure_url.clone(),
        enclosure_url,
        content_length,
        mime_type: media.mime_type.clone(),
        guid,
        pub_date,
        duration,
    })
}

pub fn enclosure_url(base_url: &str, source_id: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(source_id)
    )
}

/// Prefer the recorded file size, falling back to the media file on disk.
fn content_length(raw: &RawEpisode, sizer: &impl ByteSizer) -> Result<u64, EpisodeError> {
    if let Some(size) = raw.filesize {
        return Ok(size);
    }
    tracing::debug!(path = %raw.media_path.display(), "filesize missing, reading from disk");
    sizer
        .size_of(&raw.media_path)
        .map_err(|source| EpisodeError::SizeLookup {
            path: raw.media_path.clone(),
            source,
        })
}

/// Identity is URL plus size: re-encoding an episode changes its guid.
pub fn guid(enclosure_url: &str, content_length: u64) -> String {
    format!("{enclosure_url}?{content_length}")
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::path::PathBuf;

    use super::*;

    struct FixedSizer {
        size: Option<u64>,
        calls: Cell<usize>,
    }

    impl FixedSizer {
        fn new(size: Option<u64>) -> Self {
            Self {
                size,
                calls: Cell::new(0),
            }
        }
    }

    impl ByteSizer for FixedSizer {
        fn size_of(&self, _path: &Path) -> std::io::Result<u64> {
            self.calls.set(self.calls.get() + 1);
            self.size
                .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::NotFound))
        }
    }

    fn raw() -> RawEpisode {
        RawEpisode {
            file_name: "ep1.json".into(),
            source_id: "ep1".into(),
            media_path: PathBuf::from("episodes/ep1"),
            title: "A & B < C".into(),
            description: "Line one\n\nLine two".into(),
            upload_date: "20230615".into(),
            duration: 3661,
            filesize: Some(12345),
            tags: None,
        }
    }

    fn media() -> MediaConfig {
        MediaConfig {
            base_url: "http://host".into(),
            ..MediaConfig::default()
        }
    }

    #[test]
    fn builds_all_fields() {
        let show = ChannelMetadata::default();
        let ep = build_episode(&raw(), &show, &media(), &FixedSizer::new(None)).unwrap();
        assert_eq!(ep.file_name, "ep1.json");
        assert_eq!(ep.title, "A & B < C");
        assert_eq!(ep.author, show.author);
        assert_eq!(ep.subtitle, show.subtitle);
        assert_eq!(ep.image_url, show.artwork_url);
        assert_eq!(ep.summary_html, "<p>Line one</p><p>Line two</p>");
        assert_eq!(ep.explicit, Explicit::No);
        assert_eq!(ep.enclosure_url, "http://host/ep1");
        assert_eq!(ep.episode_url, ep.enclosure_url);
        assert_eq!(ep.content_length, 12345);
        assert_eq!(ep.mime_type, "audio/x-m4a");
        assert_eq!(ep.pub_date, "Thu, 15 Jun 2023 00:00:00 +0000");
        assert_eq!(ep.duration, "01:01:01");
    }

    #[test]
    fn guid_is_url_and_size() {
        let show = ChannelMetadata::default();
        let sizer = FixedSizer::new(None);
        let first = build_episode(&raw(), &show, &media(), &sizer).unwrap();
        let second = build_episode(&raw(), &show, &media(), &sizer).unwrap();
        assert_eq!(first.guid, "http://host/ep1?12345");
        assert_eq!(first.guid, second.guid);
    }

    #[test]
    fn explicit_filesize_skips_lookup() {
        let sizer = FixedSizer::new(Some(1));
        let ep = build_episode(&raw(), &ChannelMetadata::default(), &media(), &sizer).unwrap();
        assert_eq!(ep.content_length, 12345);
        assert_eq!(sizer.calls.get(), 0);
    }

    #[test]
    fn missing_filesize_uses_lookup() {
        let mut raw = raw();
        raw.filesize = None;
        let sizer = FixedSizer::new(Some(999));
        let ep = build_episode(&raw, &ChannelMetadata::default(), &media(), &sizer).unwrap();
        assert_eq!(ep.content_length, 999);
        assert_eq!(ep.guid, "http://host/ep1?999");
        assert_eq!(sizer.calls.get(), 1);
    }

    #[test]
    fn failed_lookup_is_size_error() {
        let mut raw = raw();
        raw.filesize = None;
        let err = build_episode(
            &raw,
            &ChannelMetadata::default(),
            &media(),
            &FixedSizer::new(None),
        )
        .unwrap_err();
        assert!(
            matches!(err, EpisodeError::SizeLookup { ref path, .. } if path == Path::new("episodes/ep1"))
        );
    }

    #[test]
    fn malformed_date_fails() {
        let mut raw = raw();
        raw.upload_date = "2023".into();
        let err = build_episode(
            &raw,
            &ChannelMetadata::default(),
            &media(),
            &FixedSizer::new(None),
        )
        .unwrap_err();
        assert!(matches!(err, EpisodeError::MalformedDate(_)));
    }

    #[test]
    fn negative_duration_fails() {
        let mut raw = raw();
        raw.duration = -5;
        let err = build_episode(
            &raw,
            &ChannelMetadata::default(),
            &media(),
            &FixedSizer::new(None),
        )
        .unwrap_err();
        assert!(matches!(err, EpisodeError::InvalidDuration(_)));
    }

    #[test]
    fn enclosure_url_encodes_identifier() {
        assert_eq!(
            enclosure_url("http://cdn/eps/", "WAN Show #1.m4a"),
            "http://cdn/eps/WAN%20Show%20%231.m4a"
        );
        assert_eq!(enclosure_url("http://cdn/eps", "a.m4a"), "http://cdn/eps/a.m4a");
    }

    #[test]
    fn fs_sizer_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.m4a");
        std::fs::write(&path, b"12345").unwrap();
        assert_eq!(FsSizer.size_of(&path).unwrap(), 5);
        assert!(FsSizer.size_of(&dir.path().join("missing.m4a")).is_err());
    }
}
