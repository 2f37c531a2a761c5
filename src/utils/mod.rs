use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Timestamp text as stored in the database (UTC, second precision)
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Ensures that the directory for the given file path exists
///
/// This function extracts the directory part of a given file path
/// and creates it if it doesn't exist.
pub fn ensure_directory_exists(file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_datetime() {
        let dt = Utc.with_ymd_and_hms(2022, 1, 4, 9, 5, 7).unwrap();
        assert_eq!(format_datetime(dt), "2022-01-04 09:05:07");
    }

    #[test]
    fn test_bare_file_name_needs_no_directory() {
        assert!(ensure_directory_exists(Path::new("newsdb.sqlite")).is_ok());
    }
}
