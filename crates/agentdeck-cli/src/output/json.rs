use std::io::{self, Write};

use anyhow::Result;
use serde::Serialize;

/// Pretty-print `value` to stdout as one JSON document.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    write_json(&mut io::stdout().lock(), value)
}

pub fn write_json<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_json_is_pretty_and_newline_terminated() {
        let mut buffer = Vec::new();
        write_json(&mut buffer, &json!({ "deleted": true, "id": "r-1" })).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\n  \"id\": \"r-1\""));
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["deleted"], true);
    }
}
