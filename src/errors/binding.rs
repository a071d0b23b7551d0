//! Event binding error types
//!
//! Covers the method catalog, signature persistence and late-bound invocation.
//!
//! # Examples
//!
//! ```rust
//! use dialogue_graph::errors::BindingError;
//!
//! let err = BindingError::MethodNotFound {
//!     signature: "Door/Open()".to_string(),
//!     target: "#4".to_string(),
//! };
//! assert!(err.is_not_found());
//! ```

use thiserror::Error;

/// Errors raised while choosing, resolving or invoking an event method
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindingError {
    /// The method named by a signature or dropdown label does not exist on the target
    #[error("Method {signature} not found on target {target}")]
    MethodNotFound {
        /// Signature or method name that was looked up
        signature: String,
        /// Description of the object searched
        target: String,
    },

    /// The declaring type of a persisted signature is not registered
    #[error("Type '{0}' is not registered")]
    TypeNotFound(String),

    /// The persisted signature string could not be parsed
    #[error("Malformed method signature: '{0}'")]
    MalformedSignature(String),

    /// The binding has no target, or its target no longer exists
    #[error("Event target is missing")]
    TargetMissing,

    /// The target object has no component of the declaring type
    #[error("Object {object} has no component of type '{type_name}'")]
    ComponentMissing {
        /// Description of the object searched
        object: String,
        /// Type the component was expected to have
        type_name: String,
    },

    /// The live object refused the call
    #[error("Type '{type_name}' cannot invoke '{method}'")]
    NotInvokable {
        /// Type the call was dispatched to
        type_name: String,
        /// Method name
        method: String,
    },

    /// The argument does not match the method's parameter
    #[error("Method '{method}' expects {expected}, got {found}")]
    ParameterMismatch {
        /// Method name
        method: String,
        /// Expected parameter description
        expected: String,
        /// Supplied argument description
        found: String,
    },

    /// An event row operation was attempted before its prerequisite step
    #[error("Event row {row} is not ready: {state}")]
    RowNotReady {
        /// Row index inside the event node
        row: usize,
        /// Current state of the row
        state: String,
    },

    /// The row index is outside the event node
    #[error("Event row {0} does not exist")]
    RowOutOfRange(usize),
}

impl BindingError {
    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BindingError::MethodNotFound { .. }
                | BindingError::TypeNotFound(_)
                | BindingError::TargetMissing
                | BindingError::ComponentMissing { .. }
                | BindingError::RowOutOfRange(_)
        )
    }

    /// Get error code for diagnostics and CLI output
    pub fn error_code(&self) -> &'static str {
        match self {
            BindingError::MethodNotFound { .. }
            | BindingError::TypeNotFound(_)
            | BindingError::TargetMissing
            | BindingError::ComponentMissing { .. }
            | BindingError::RowOutOfRange(_) => "NOT_FOUND",
            BindingError::MalformedSignature(_) | BindingError::ParameterMismatch { .. } => {
                "VALIDATION_FAILED"
            }
            BindingError::NotInvokable { .. } => "OPERATION_FAILED",
            BindingError::RowNotReady { .. } => "INVALID_STATE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_not_found() {
        let err = BindingError::MethodNotFound {
            signature: "Door/Open()".to_string(),
            target: "#4".to_string(),
        };
        assert_eq!(err.to_string(), "Method Door/Open() not found on target #4");
        assert!(err.is_not_found());
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_row_not_ready_is_state_error() {
        let err = BindingError::RowNotReady {
            row: 2,
            state: "Empty".to_string(),
        };
        assert!(!err.is_not_found());
        assert_eq!(err.error_code(), "INVALID_STATE");
    }

    #[test]
    fn test_malformed_signature() {
        let err = BindingError::MalformedSignature("nonsense".to_string());
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
    }
}
