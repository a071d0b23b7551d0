//! Graph model, event bindings and asset serialization for a node-based
//! branching dialogue editor.
//!
//! The persisted [`asset::GraphAsset`] is the durable form of a conversation.
//! [`serialization::load`] turns it into a live [`editor::EditorGraph`] that
//! an editor front end mutates, and [`serialization::save`] collapses it back.
//! Event nodes call into host objects through [`binding::EventBinding`]s,
//! resolved against a closed [`object::TypeRegistry`].

pub mod asset;
pub mod binding;
pub mod common;
pub mod config;
pub mod diagnostics;
pub mod editor;
pub mod errors;
pub mod export;
pub mod object;
pub mod serialization;
pub mod value;
