//! Error types for analysis and migration operations

use std::fmt;

/// Errors that can occur while loading, converting or writing pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationError {
    /// HTML parsing failed
    ParseError(String),
    /// A page record is unusable (empty URL, empty markup, ...)
    InvalidInput(String),
    /// Reading or writing a file failed
    Io(String),
    /// JSON (de)serialization failed
    Json(String),
    /// A file required for the whole run is absent
    MissingFile(String),
    /// The rule table could not be loaded
    Config(String),
}

impl MigrationError {
    /// Get numeric error code, used as the process exit status
    pub fn code(&self) -> u32 {
        match self {
            MigrationError::ParseError(_) => 1,
            MigrationError::InvalidInput(_) => 2,
            MigrationError::Io(_) => 3,
            MigrationError::Json(_) => 4,
            MigrationError::MissingFile(_) => 5,
            MigrationError::Config(_) => 6,
        }
    }

    /// Whether the error should abort the whole run rather than a single page
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MigrationError::MissingFile(_) | MigrationError::Config(_)
        )
    }
}

impl fmt::Display for MigrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            MigrationError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            MigrationError::Io(msg) => write!(f, "I/O error: {}", msg),
            MigrationError::Json(msg) => write!(f, "JSON error: {}", msg),
            MigrationError::MissingFile(path) => write!(f, "Required file not found: {}", path),
            MigrationError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for MigrationError {}

impl From<std::io::Error> for MigrationError {
    fn from(err: std::io::Error) -> Self {
        MigrationError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MigrationError {
    fn from(err: serde_json::Error) -> Self {
        MigrationError::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            MigrationError::ParseError(String::new()),
            MigrationError::InvalidInput(String::new()),
            MigrationError::Io(String::new()),
            MigrationError::Json(String::new()),
            MigrationError::MissingFile(String::new()),
            MigrationError::Config(String::new()),
        ];
        let codes: HashSet<u32> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_only_run_level_errors_are_fatal() {
        assert!(MigrationError::MissingFile("plan.json".into()).is_fatal());
        assert!(MigrationError::Config("bad".into()).is_fatal());
        assert!(!MigrationError::Json("bad page".into()).is_fatal());
        assert!(!MigrationError::InvalidInput("empty url".into()).is_fatal());
    }

    #[test]
    fn test_display_includes_detail() {
        let err = MigrationError::MissingFile("./migration-plan.json".into());
        assert_eq!(
            err.to_string(),
            "Required file not found: ./migration-plan.json"
        );
    }

    #[test]
    fn test_from_serde_error() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: MigrationError = parse.unwrap_err().into();
        assert!(matches!(err, MigrationError::Json(_)));
    }
}
