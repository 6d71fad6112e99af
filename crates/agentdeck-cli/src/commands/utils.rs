use anyhow::{Result, anyhow};
use chrono::{DateTime, Local, Utc};

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

pub fn preview_text(input: &str, max_len: usize) -> String {
    if input.chars().count() <= max_len {
        return input.to_string();
    }

    let mut preview = input.chars().take(max_len).collect::<String>();
    preview.push('…');
    preview
}

/// Resolve `--content` / `--file` into the new content, if any.
pub fn load_content(file: Option<&str>, content: Option<String>) -> Result<Option<String>> {
    match (file, content) {
        (Some(_), Some(_)) => Err(anyhow!("Use either --file or --content, not both")),
        (Some(path), None) => std::fs::read_to_string(path)
            .map(Some)
            .map_err(|err| anyhow!("Failed to read {path}: {err}")),
        (None, value) => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_text_truncates_on_char_boundary() {
        assert_eq!(preview_text("short", 10), "short");
        assert_eq!(preview_text("héllo wörld", 5), "héllo…");
    }

    #[test]
    fn test_load_content_prefers_single_source() {
        assert_eq!(load_content(None, None).unwrap(), None);
        assert_eq!(
            load_content(None, Some("body".to_string())).unwrap(),
            Some("body".to_string())
        );
        assert!(load_content(Some("a.md"), Some("body".to_string())).is_err());
    }

    #[test]
    fn test_load_content_reads_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("skill.md");
        std::fs::write(&path, "# Skill").unwrap();
        let path = path.to_string_lossy().to_string();
        assert_eq!(
            load_content(Some(&path), None).unwrap(),
            Some("# Skill".to_string())
        );
    }
}
