use std::path::Path;

use anyhow::Result;

use crate::config::AppConfig;
use crate::episode::{FsSizer, build_episode};
use crate::loader;

pub async fn run(input: Option<&Path>, config: &AppConfig) -> Result<()> {
    let input_dir = input.map(Path::to_path_buf).unwrap_or_else(|| config.input_dir());
    let loaded = loader::load_episodes(
        &input_dir,
        &config.media.extension,
        config.general.max_concurrent_reads,
    )
    .await?;

    if loaded.is_empty() {
        println!("No episode metadata found in {}", input_dir.display());
        return Ok(());
    }

    println!();
    println!(
        "  {:<24} {:<40} {:<16} {:>9} {:>8}",
        "FILE", "TITLE", "DATE", "DURATION", "SIZE"
    );
    println!("  {}", "─".repeat(101));

    let mut failed = 0;
    for entry in &loaded {
        let built = match &entry.episode {
            Ok(raw) => build_episode(raw, &config.show, &config.media, &FsSizer)
                .map(|ep| (raw, ep))
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        match built {
            Ok((raw, ep)) => {
                // "Thu, 15 Jun 2023 00:00:00 +0000" -> "Thu, 15 Jun 2023"
                let date = ep.pub_date.trim_end_matches(" 00:00:00 +0000");
                println!(
                    "  {:<24} {:<40} {:<16} {:>9} {:>8}",
                    truncate(&entry.file_name, 24),
                    truncate(&ep.title, 40),
                    date,
                    ep.duration,
                    format_size(ep.content_length),
                );
                let keywords = raw.keywords();
                if !keywords.is_empty() {
                    println!("  {:<24} tags: {}", "", truncate(&keywords, 60));
                }
            }
            Err(reason) => {
                failed += 1;
                println!(
                    "  {:<24} [err] {reason}",
                    truncate(&entry.file_name, 24)
                );
            }
        }
    }

    println!();
    println!("  {} episode(s), {} with errors", loaded.len(), failed);
    println!();
    Ok(())
}

fn format_size(bytes: u64) -> String {
    const MB: u64 = 1024 * 1024;
    if bytes >= MB {
        format!("{:.1}M", bytes as f64 / MB as f64)
    } else {
        format!("{:.1}K", bytes as f64 / 1024.0)
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max - 3).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_size_units() {
        assert_eq!(format_size(512), "0.5K");
        assert_eq!(format_size(1024 * 1024), "1.0M");
        assert_eq!(format_size(150 * 1024 * 1024 + 512 * 1024), "150.5M");
    }

    #[test]
    fn truncate_short_string() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn truncate_exact_length() {
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn truncate_long_string() {
        assert_eq!(truncate("hello world!", 8), "hello...");
    }

    #[test]
    fn truncate_unicode() {
        let s = "你好世界測試文字串";
        let result = truncate(s, 6);
        assert_eq!(result, "你好世...");
    }
}
