use chrono::{Datelike, NaiveDate};

use crate::error::EpisodeError;

/// Wrap each non-empty line of a description in `<p>` tags.
pub fn normalize_summary(description: &str) -> String {
    description
        .split('\n')
        .filter(|line| !line.is_empty())
        .map(|line| format!("<p>{line}</p>"))
        .collect()
}

/// Convert a `YYYYMMDD` upload date into an RFC 2822 style date at midnight UTC.
///
/// Only the first eight characters are read. Out-of-range months and days are
/// rejected rather than rolled over into the next month.
pub fn normalize_date(upload_date: &str) -> Result<String, EpisodeError> {
    let malformed = || EpisodeError::MalformedDate(upload_date.to_string());

    let digits = upload_date.get(..8).ok_or_else(malformed)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let year: i32 = digits[..4].parse().map_err(|_| malformed())?;
    let month: u32 = digits[4..6].parse().map_err(|_| malformed())?;
    let day: u32 = digits[6..8].parse().map_err(|_| malformed())?;
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(malformed)?;

    Ok(format!(
        "{}, {} {} {:04} 00:00:00 +0000",
        date.format("%a"),
        date.day(),
        date.format("%b"),
        date.year()
    ))
}

/// Format a duration in seconds as `HH:MM:SS`, `MM:SS` or `SS`.
pub fn normalize_duration(total: i64) -> Result<String, EpisodeError> {
    let total = u64::try_from(total)
        .map_err(|_| EpisodeError::InvalidDuration(format!("{total} is negative")))?;

    let seconds = total % 60;
    let minutes = (total / 60) % 60;
    let hours = total / 3600;

    let formatted = if hours > 0 {
        format!("{}:{}:{}", pad(hours), pad(minutes), pad(seconds))
    } else if minutes > 0 {
        format!("{}:{}", pad(minutes), pad(seconds))
    } else {
        pad(seconds)
    };
    Ok(formatted)
}

/// Zero-pad to at least two digits. Wider values are kept whole.
pub fn pad(n: u64) -> String {
    format!("{n:02}")
}
