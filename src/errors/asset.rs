//! Asset file error types

use thiserror::Error;

/// Errors raised while reading or writing asset and config files
#[derive(Error, Debug)]
pub enum AssetError {
    /// The file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file extension maps to no supported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl AssetError {
    /// Get error code for CLI output
    pub fn error_code(&self) -> &'static str {
        match self {
            AssetError::Io(_) => "IO_ERROR",
            AssetError::Json(_) | AssetError::Yaml(_) => "PARSE_ERROR",
            AssetError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format() {
        let err = AssetError::UnsupportedFormat("xml".to_string());
        assert_eq!(err.to_string(), "Unsupported format: xml");
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    }

    #[test]
    fn test_json_error_converts() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: AssetError = parse_err.into();
        assert_eq!(err.error_code(), "PARSE_ERROR");
    }
}
