//! One configurable row of an Event node.
//!
//! A row walks through `Empty -> ObjectAssigned -> MethodChosen -> Bound`.
//! Each step requires the previous one, and assigning a different object
//! throws away every later choice.

use serde::Serialize;
use tracing::debug;

use crate::binding::{
    catalog_labels, choose_by_label, enumerate_candidates, persist_signature, EventBinding,
    MethodCatalogEntry, ResolvedMethod, NO_FUNCTION,
};
use crate::errors::{BindingError, BindingResult};
use crate::object::{ObjectHost, ObjectId, TypeRegistry};
use crate::value::TaggedValue;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, strum::Display)]
pub enum RowState {
    Empty,
    ObjectAssigned,
    MethodChosen,
    Bound,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EventRow {
    index: usize,
    object: Option<ObjectId>,
    catalog: Vec<MethodCatalogEntry>,
    chosen: Option<ResolvedMethod>,
    parameter: TaggedValue,
    binding: Option<EventBinding>,
    /// Signature read from an asset that did not resolve; written back on save
    unresolved: Option<String>,
}

impl EventRow {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> RowState {
        match (&self.object, &self.chosen, &self.binding) {
            (None, _, _) => RowState::Empty,
            (Some(_), None, _) => RowState::ObjectAssigned,
            (Some(_), Some(_), None) => RowState::MethodChosen,
            (Some(_), Some(_), Some(_)) => RowState::Bound,
        }
    }

    pub fn object(&self) -> Option<ObjectId> {
        self.object
    }

    pub fn catalog(&self) -> &[MethodCatalogEntry] {
        &self.catalog
    }

    pub fn chosen(&self) -> Option<&ResolvedMethod> {
        self.chosen.as_ref()
    }

    pub fn parameter(&self) -> &TaggedValue {
        &self.parameter
    }

    pub fn binding(&self) -> Option<&EventBinding> {
        self.binding.as_ref()
    }

    /// Dropdown entries for the assigned object.
    pub fn labels(&self) -> Vec<String> {
        catalog_labels(&self.catalog)
    }

    /// Signature to persist: the chosen method, else whatever failed to resolve on load.
    pub fn signature(&self) -> Option<String> {
        self.chosen
            .as_ref()
            .map(persist_signature)
            .or_else(|| self.unresolved.clone())
    }

    /// Assign (or clear) the row's object and repopulate the method catalog.
    pub fn assign_object(
        &mut self,
        object: Option<ObjectId>,
        host: &dyn ObjectHost,
        registry: &TypeRegistry,
    ) {
        self.reset_method();
        self.unresolved = None;
        self.object = object;
        self.catalog = object
            .map(|id| enumerate_candidates(host, registry, id))
            .unwrap_or_default();
        debug!(
            "Row {} assigned {:?} with {} catalog entries",
            self.index,
            object,
            self.catalog.len()
        );
    }

    /// Choose a method by dropdown label; [`NO_FUNCTION`] clears the choice.
    pub fn choose(&mut self, label: &str) -> BindingResult<()> {
        if self.object.is_none() {
            return Err(self.not_ready());
        }
        if label == NO_FUNCTION {
            self.reset_method();
            return Ok(());
        }
        let resolved = choose_by_label(&self.catalog, label)?;
        self.apply_resolved(resolved);
        Ok(())
    }

    /// Adopt a method resolved elsewhere, e.g. from a persisted signature.
    pub fn apply_resolved(&mut self, resolved: ResolvedMethod) {
        self.reset_method();
        self.unresolved = None;
        if resolved.param().is_none() {
            self.binding = Some(EventBinding::from_resolved(&resolved, TaggedValue::None));
        }
        self.chosen = Some(resolved);
    }

    /// Set the argument for the chosen method and finalize the binding.
    pub fn set_parameter(&mut self, value: TaggedValue) -> BindingResult<()> {
        let Some(resolved) = &self.chosen else {
            return Err(self.not_ready());
        };
        match resolved.param() {
            Some(param) if param.accepts(&value) => {}
            expected => {
                return Err(BindingError::ParameterMismatch {
                    method: resolved.method.label(),
                    expected: expected
                        .map(|p| p.to_string())
                        .unwrap_or_else(|| "no argument".to_string()),
                    found: value.kind().to_string(),
                })
            }
        }

        self.binding = Some(EventBinding::from_resolved(resolved, value.clone()));
        self.parameter = value;
        Ok(())
    }

    pub(crate) fn reindex(&mut self, index: usize) {
        self.index = index;
    }

    /// Keep a signature that could not be resolved so the next save preserves it.
    pub(crate) fn keep_unresolved(&mut self, signature: &str) {
        self.unresolved = Some(signature.to_string());
    }

    fn reset_method(&mut self) {
        self.chosen = None;
        self.parameter = TaggedValue::None;
        self.binding = None;
    }

    fn not_ready(&self) -> BindingError {
        BindingError::RowNotReady {
            row: self.index,
            state: self.state().to_string(),
        }
    }
}
