//! Structured diagnostics for failures the editor recovers from.
//!
//! Loading an asset never aborts on a stale method signature, a destroyed
//! object or a value of the wrong kind; the affected row or field becomes
//! inert and the problem is recorded here so callers can surface it.

use std::fmt;

use serde::Serialize;
use tracing::warn;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, strum::Display)]
pub enum DiagnosticKind {
    /// A persisted signature no longer resolves against its object
    MethodNotFound,
    /// A persisted object reference points at nothing
    DanglingObject,
    /// A node value does not have the kind its schema requires
    ValueMismatch,
    /// A stored event parameter does not fit the resolved method
    ParameterRejected,
    /// A persisted final event differs from the binding rebuilt on load
    StaleBinding,
    /// A node record was dropped while rebuilding the graph
    DiscardedNode,
    /// An edge record was dropped while rebuilding the graph
    DiscardedEdge,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Index of the node record concerned
    pub node: Option<usize>,
    /// Event row inside that node
    pub row: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn node(kind: DiagnosticKind, node: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            node: Some(node),
            row: None,
            message: message.into(),
        }
    }

    pub fn row(kind: DiagnosticKind, node: usize, row: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            node: Some(node),
            row: Some(row),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.kind)?;
        if let Some(node) = self.node {
            write!(f, " node {}", node)?;
        }
        if let Some(row) = self.row {
            write!(f, " row {}", row)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Everything recovered from while loading an asset
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadReport {
    /// Record a diagnostic and log it.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }
}
