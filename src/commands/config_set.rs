use anyhow::Result;

use crate::config::AppConfig;
use crate::error::AppError;

pub fn run(key: &str, value: &str) -> Result<()> {
    let mut config = AppConfig::load()?;
    apply(&mut config, key, value)?;
    config.save()?;
    println!("Set {key} = {value}");
    Ok(())
}

fn apply(config: &mut AppConfig, key: &str, value: &str) -> Result<(), AppError> {
    match key {
        "input_dir" => config.general.input_dir = value.to_string(),
        "output_path" => config.general.output_path = value.to_string(),
        "max_concurrent_reads" => {
            let v: usize = value
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid number: {value}")))?;
            if v == 0 {
                return Err(AppError::Config(
                    "max_concurrent_reads must be at least 1".to_string(),
                ));
            }
            config.general.max_concurrent_reads = v;
        }
        "base_url" => config.media.base_url = value.to_string(),
        "mime_type" => config.media.mime_type = value.to_string(),
        "extension" => config.media.extension = value.trim_start_matches('.').to_string(),
        "title" => config.show.title = value.to_string(),
        "link" => config.show.link = value.to_string(),
        "language" => config.show.language = value.to_string(),
        "copyright" => config.show.copyright = value.to_string(),
        "subtitle" => config.show.subtitle = value.to_string(),
        "author" => config.show.author = value.to_string(),
        "summary" => config.show.summary = value.to_string(),
        "owner_name" => config.show.owner.name = value.to_string(),
        "owner_email" => config.show.owner.email = value.to_string(),
        "artwork_url" => config.show.artwork_url = value.to_string(),
        _ => {
            return Err(AppError::Config(format!(
                "Unknown config key: {key}\n\nAvailable keys:\n  input_dir, output_path, max_concurrent_reads,\n  base_url, mime_type, extension,\n  title, link, language, copyright, subtitle, author, summary,\n  owner_name, owner_email, artwork_url"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_show_fields() {
        let mut config = AppConfig::default();
        apply(&mut config, "title", "My Show").unwrap();
        apply(&mut config, "owner_email", "me@example.com").unwrap();
        assert_eq!(config.show.title, "My Show");
        assert_eq!(config.show.owner.email, "me@example.com");
    }

    #[test]
    fn extension_drops_leading_dot() {
        let mut config = AppConfig::default();
        apply(&mut config, "extension", ".mp3").unwrap();
        assert_eq!(config.media.extension, "mp3");
    }

    #[test]
    fn rejects_invalid_number() {
        let mut config = AppConfig::default();
        assert!(apply(&mut config, "max_concurrent_reads", "many").is_err());
        assert!(apply(&mut config, "max_concurrent_reads", "0").is_err());
        apply(&mut config, "max_concurrent_reads", "4").unwrap();
        assert_eq!(config.general.max_concurrent_reads, 4);
    }

    #[test]
    fn rejects_unknown_key() {
        let mut config = AppConfig::default();
        let err = apply(&mut config, "colour", "blue").unwrap_err();
        assert!(err.to_string().contains("Unknown config key: colour"));
    }
}
