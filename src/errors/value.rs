//! Tagged value error types

use thiserror::Error;

use crate::value::ValueKind;

/// Errors raised while encoding native values or decoding tagged values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    /// The native value's type has no tagged representation
    #[error("Unsupported value type: {0}")]
    UnsupportedValueType(String),

    /// A typed accessor was used on a value of another kind
    #[error("Expected a {expected} value, found {found}")]
    KindMismatch {
        /// Kind the caller asked for
        expected: ValueKind,
        /// Kind actually stored
        found: ValueKind,
    },
}

impl ValueError {
    /// Get error code for diagnostics and CLI output
    pub fn error_code(&self) -> &'static str {
        match self {
            ValueError::UnsupportedValueType(_) => "UNSUPPORTED_VALUE_TYPE",
            ValueError::KindMismatch { .. } => "KIND_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_value_type() {
        let err = ValueError::UnsupportedValueType("f64".to_string());
        assert_eq!(err.to_string(), "Unsupported value type: f64");
        assert_eq!(err.error_code(), "UNSUPPORTED_VALUE_TYPE");
    }

    #[test]
    fn test_kind_mismatch_message() {
        let err = ValueError::KindMismatch {
            expected: ValueKind::Int,
            found: ValueKind::String,
        };
        assert_eq!(err.to_string(), "Expected a Int value, found String");
    }
}
