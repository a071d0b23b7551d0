//! Graph-related error types
//!
//! Structured errors for live graph edits and for rebuilding a live graph
//! from a persisted asset.
//!
//! # Examples
//!
//! ```rust
//! use dialogue_graph::errors::GraphError;
//!
//! let err = GraphError::InvalidEdge {
//!     index: 3,
//!     reason: "node index 9 out of range".to_string(),
//! };
//! assert!(err.is_client_error());
//! ```

use thiserror::Error;

use super::BindingError;

/// Graph-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// A persisted node type is not part of the closed node set
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    /// Node not found by identifier
    #[error("Node {0} not found")]
    NodeNotFound(String),

    /// Port not found by identifier
    #[error("Port {0} not found")]
    PortNotFound(String),

    /// The two ports cannot be joined by an edge
    #[error("Ports {from} and {to} are not compatible: {reason}")]
    IncompatiblePorts {
        /// Output side
        from: String,
        /// Input side
        to: String,
        /// Which compatibility rule failed
        reason: String,
    },

    /// Start and End nodes cannot be removed
    #[error("Node {0} cannot be deleted")]
    NotDeletable(String),

    /// A remove operation would drop below the node kind's minimum
    #[error("{kind} node keeps at least {minimum} {what}")]
    MinimumPorts {
        /// Node kind name
        kind: String,
        /// Minimum count
        minimum: usize,
        /// What is being counted
        what: String,
    },

    /// The operation is only valid on another kind of node
    #[error("Node {node} is a {found} node, expected {expected}")]
    WrongNodeKind {
        /// Node identifier
        node: String,
        /// Kind required by the operation
        expected: String,
        /// Actual kind
        found: String,
    },

    /// An edge record does not address a valid node/port pair
    #[error("Invalid edge record {index}: {reason}")]
    InvalidEdge {
        /// Position of the record in the asset's edge list
        index: usize,
        /// What was out of range
        reason: String,
    },

    /// Event row configuration failed
    #[error(transparent)]
    Binding(#[from] BindingError),
}

impl GraphError {
    /// Check if this is a client error caused by bad input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GraphError::UnknownNodeType(_)
                | GraphError::IncompatiblePorts { .. }
                | GraphError::NotDeletable(_)
                | GraphError::MinimumPorts { .. }
                | GraphError::WrongNodeKind { .. }
                | GraphError::InvalidEdge { .. }
        )
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        match self {
            GraphError::NodeNotFound(_) | GraphError::PortNotFound(_) => true,
            GraphError::Binding(inner) => inner.is_not_found(),
            _ => false,
        }
    }

    /// Get error code for diagnostics and CLI output
    pub fn error_code(&self) -> &'static str {
        match self {
            GraphError::UnknownNodeType(_) => "UNKNOWN_NODE_TYPE",
            GraphError::NodeNotFound(_) | GraphError::PortNotFound(_) => "NOT_FOUND",
            GraphError::IncompatiblePorts { .. }
            | GraphError::WrongNodeKind { .. }
            | GraphError::InvalidEdge { .. } => "VALIDATION_FAILED",
            GraphError::NotDeletable(_) | GraphError::MinimumPorts { .. } => "CONSTRAINT_VIOLATION",
            GraphError::Binding(inner) => inner.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_node_type() {
        let err = GraphError::UnknownNodeType("Cutscene".to_string());
        assert_eq!(err.to_string(), "Unknown node type: Cutscene");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_minimum_ports_message() {
        let err = GraphError::MinimumPorts {
            kind: "Choice".to_string(),
            minimum: 2,
            what: "choices".to_string(),
        };
        assert_eq!(err.to_string(), "Choice node keeps at least 2 choices");
        assert_eq!(err.error_code(), "CONSTRAINT_VIOLATION");
    }

    #[test]
    fn test_node_not_found() {
        let err = GraphError::NodeNotFound("n7".to_string());
        assert!(err.is_not_found());
        assert!(!err.is_client_error());
    }
}
