//! Host object model: weak object handles, attached components and the
//! collaborator interface event bindings are resolved against.
//!
//! The editor never holds live callables. It stores [`ObjectId`]s, asks an
//! [`ObjectHost`] what type an object has and which components are attached
//! to it, and dispatches calls by method name.

pub mod registry;

use std::any::Any;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{BindingError, BindingResult};
use crate::value::TaggedValue;

pub use registry::{
    Describe, MethodDescriptor, ParamType, ReturnType, TypeDescriptor, TypeRegistry,
    GAME_OBJECT_TYPE,
};

/// Weak reference to a host object. The object may have been destroyed.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A behaviour attached to a scene object that event nodes can call into.
pub trait Component: Any {
    /// Registered type tag of this component
    fn type_name(&self) -> &str;

    /// Dispatch a call by method name.
    fn invoke(&mut self, method: &str, arg: Option<&TaggedValue>) -> BindingResult<()>;

    fn as_any(&self) -> &dyn Any;
}

/// Object-model collaborator supplied by the host environment.
pub trait ObjectHost {
    /// Type tag of a live object, `None` once it has been destroyed.
    fn type_of(&self, id: ObjectId) -> Option<&str>;

    /// Human readable name used in diagnostics.
    fn display_name(&self, id: ObjectId) -> String;

    /// Components attached to a scene object, in attachment order.
    fn components_of(&self, id: ObjectId) -> Vec<ObjectId>;

    /// Scene object a component is attached to; a scene object owns itself.
    fn owner_of(&self, id: ObjectId) -> Option<ObjectId>;

    /// Call `method` on the object with an optional argument.
    fn invoke(
        &mut self,
        id: ObjectId,
        method: &str,
        arg: Option<&TaggedValue>,
    ) -> BindingResult<()>;

    fn exists(&self, id: ObjectId) -> bool {
        self.type_of(id).is_some()
    }

    /// The object itself or the sibling component whose type is `type_name`.
    fn component_of_type(&self, id: ObjectId, type_name: &str) -> Option<ObjectId> {
        let owner = self.owner_of(id)?;
        if self.type_of(owner) == Some(type_name) {
            return Some(owner);
        }
        self.components_of(owner)
            .into_iter()
            .find(|c| self.type_of(*c) == Some(type_name))
    }
}

/// Built-in scene object state
#[derive(Clone, Debug, PartialEq)]
pub struct GameObject {
    pub name: String,
    pub active: bool,
    pub components: Vec<ObjectId>,
}

impl GameObject {
    fn invoke(&mut self, method: &str, arg: Option<&TaggedValue>) -> BindingResult<()> {
        match (method, arg) {
            ("SetActive", Some(TaggedValue::Bool(active))) => {
                self.active = *active;
                Ok(())
            }
            ("SetName", Some(TaggedValue::String(name))) => {
                self.name = name.clone();
                Ok(())
            }
            ("SetActive", found) | ("SetName", found) => Err(BindingError::ParameterMismatch {
                method: method.to_string(),
                expected: if method == "SetActive" { "Boolean" } else { "String" }.to_string(),
                found: found
                    .map(|v| v.kind().to_string())
                    .unwrap_or_else(|| "no argument".to_string()),
            }),
            _ => Err(BindingError::NotInvokable {
                type_name: GAME_OBJECT_TYPE.to_string(),
                method: method.to_string(),
            }),
        }
    }
}

enum Entry {
    Object(GameObject),
    Component {
        owner: ObjectId,
        component: Box<dyn Component>,
    },
}

/// In-memory arena of scene objects and their components.
pub struct ObjectWorld {
    entries: IndexMap<ObjectId, Entry>,
    next_id: u64,
}

impl Default for ObjectWorld {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
            next_id: 1,
        }
    }
}

impl ObjectWorld {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create an empty, active scene object.
    pub fn spawn(&mut self, name: &str) -> ObjectId {
        let id = self.allocate();
        debug!("Spawned object {} ({})", id, name);
        self.entries.insert(
            id,
            Entry::Object(GameObject {
                name: name.to_string(),
                active: true,
                components: Vec::new(),
            }),
        );
        id
    }

    /// Attach a component to a scene object and return the component's own id.
    pub fn attach(
        &mut self,
        object: ObjectId,
        component: Box<dyn Component>,
    ) -> BindingResult<ObjectId> {
        if !matches!(self.entries.get(&object), Some(Entry::Object(_))) {
            return Err(BindingError::TargetMissing);
        }
        let id = self.allocate();
        debug!(
            "Attached {} as {} to object {}",
            component.type_name(),
            id,
            object
        );
        self.entries.insert(
            id,
            Entry::Component {
                owner: object,
                component,
            },
        );
        if let Some(Entry::Object(go)) = self.entries.get_mut(&object) {
            go.components.push(id);
        }
        Ok(id)
    }

    /// Destroy an object and everything attached to it. Existing ids dangle.
    pub fn destroy(&mut self, id: ObjectId) {
        match self.entries.shift_remove(&id) {
            Some(Entry::Object(go)) => {
                for component in go.components {
                    self.entries.shift_remove(&component);
                }
            }
            Some(Entry::Component { owner, .. }) => {
                if let Some(Entry::Object(go)) = self.entries.get_mut(&owner) {
                    go.components.retain(|c| *c != id);
                }
            }
            None => warn!("Destroy of unknown object {}", id),
        }
    }

    pub fn game_object(&self, id: ObjectId) -> Option<&GameObject> {
        match self.entries.get(&id) {
            Some(Entry::Object(go)) => Some(go),
            _ => None,
        }
    }

    /// Borrow a component as its concrete type.
    pub fn component<T: Component>(&self, id: ObjectId) -> Option<&T> {
        match self.entries.get(&id) {
            Some(Entry::Component { component, .. }) => component.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ObjectHost for ObjectWorld {
    fn type_of(&self, id: ObjectId) -> Option<&str> {
        match self.entries.get(&id)? {
            Entry::Object(_) => Some(GAME_OBJECT_TYPE),
            Entry::Component { component, .. } => Some(component.type_name()),
        }
    }

    fn display_name(&self, id: ObjectId) -> String {
        match self.entries.get(&id) {
            Some(Entry::Object(go)) => format!("{} ({})", go.name, id),
            Some(Entry::Component { owner, component }) => {
                let owner_name = self
                    .game_object(*owner)
                    .map(|go| go.name.as_str())
                    .unwrap_or("?");
                format!("{}.{} ({})", owner_name, component.type_name(), id)
            }
            None => format!("missing object {}", id),
        }
    }

    fn components_of(&self, id: ObjectId) -> Vec<ObjectId> {
        self.game_object(id)
            .map(|go| go.components.clone())
            .unwrap_or_default()
    }

    fn owner_of(&self, id: ObjectId) -> Option<ObjectId> {
        match self.entries.get(&id)? {
            Entry::Object(_) => Some(id),
            Entry::Component { owner, .. } => Some(*owner),
        }
    }

    fn invoke(
        &mut self,
        id: ObjectId,
        method: &str,
        arg: Option<&TaggedValue>,
    ) -> BindingResult<()> {
        match self.entries.get_mut(&id) {
            Some(Entry::Object(go)) => go.invoke(method, arg),
            Some(Entry::Component { component, .. }) => component.invoke(method, arg),
            None => Err(BindingError::TargetMissing),
        }
    }
}
