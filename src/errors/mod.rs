//! Domain-specific error types for dialogue-graph
//!
//! # Error Categories
//!
//! - **ValueError**: tagged value construction and typed decoding
//! - **BindingError**: method catalog lookups, signature resolution and event invocation
//! - **GraphError**: live graph edits and asset reconstruction
//! - **AssetError**: reading and writing asset files
//!
//! Reflection-style failures (a signature that no longer resolves, a dangling
//! object reference) are recovered by the editor and reported as diagnostics
//! instead; see [`crate::diagnostics`].
//!
//! # Examples
//!
//! ```rust
//! use dialogue_graph::errors::{BindingError, GraphError};
//!
//! let err = BindingError::TypeNotFound("Door".to_string());
//! assert!(err.is_not_found());
//!
//! let err = GraphError::UnknownNodeType("Cutscene".to_string());
//! assert_eq!(err.error_code(), "UNKNOWN_NODE_TYPE");
//! ```

pub mod asset;
pub mod binding;
pub mod graph;
pub mod value;

pub use asset::AssetError;
pub use binding::BindingError;
pub use graph::GraphError;
pub use value::ValueError;

/// Result type alias for tagged value operations
pub type ValueResult<T> = Result<T, ValueError>;

/// Result type alias for binding operations
pub type BindingResult<T> = Result<T, BindingError>;

/// Result type alias for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Result type alias for asset file operations
pub type AssetResult<T> = Result<T, AssetError>;
