pub mod json;
pub mod table;

use clap::ValueEnum;

/// How commands render their results on stdout.
///
/// Warnings and errors always go to stderr as text.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[value(rename_all = "lower")]
pub enum OutputFormat {
    /// Tables and success messages
    #[default]
    Text,
    /// Pretty-printed JSON, one document per command
    Json,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        self == OutputFormat::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(OutputFormat::from_str("JSON", true), Ok(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("text", false), Ok(OutputFormat::Text));
        assert!(OutputFormat::from_str("yaml", true).is_err());
    }
}
