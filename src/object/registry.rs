//! Closed registry of bindable object types.
//!
//! Every type that event nodes may call into registers a [`TypeDescriptor`]
//! listing the methods it declares. The method catalog filters these
//! descriptors with the eligibility predicate, and persisted signatures are
//! resolved by looking the declaring type up here by name.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::value::{TaggedValue, ValueKind};

/// Type tag of the built-in scene object type.
pub const GAME_OBJECT_TYPE: &str = "GameObject";

/// Parameter type of a declared method
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamType {
    Int,
    Float,
    Bool,
    String,
    /// Reference to an object of the named registered type
    Object(String),
    /// Any other host type; never serializable
    Other(String),
}

impl ParamType {
    /// Primitive, string or object-reference parameters can be stored in a tagged value.
    pub fn is_serializable(&self) -> bool {
        !matches!(self, ParamType::Other(_))
    }

    /// The tagged value kind an argument for this parameter must have.
    pub fn value_kind(&self) -> Option<ValueKind> {
        match self {
            ParamType::Int => Some(ValueKind::Int),
            ParamType::Float => Some(ValueKind::Float),
            ParamType::Bool => Some(ValueKind::Bool),
            ParamType::String => Some(ValueKind::String),
            ParamType::Object(_) => Some(ValueKind::Object),
            ParamType::Other(_) => None,
        }
    }

    pub fn accepts(&self, value: &TaggedValue) -> bool {
        self.value_kind() == Some(value.kind())
    }

    /// Name used inside persisted signatures.
    pub fn name(&self) -> &str {
        match self {
            ParamType::Int => "Int32",
            ParamType::Float => "Single",
            ParamType::Bool => "Boolean",
            ParamType::String => "String",
            ParamType::Object(name) | ParamType::Other(name) => name,
        }
    }

    /// Inverse of [`ParamType::name`]; unknown names are treated as object types.
    pub fn from_name(name: &str) -> ParamType {
        match name {
            "Int32" => ParamType::Int,
            "Single" => ParamType::Float,
            "Boolean" => ParamType::Bool,
            "String" => ParamType::String,
            other => ParamType::Object(other.to_string()),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Return type of a declared method
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnType {
    Void,
    Value(String),
}

/// One method declared by a registered type
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub declaring_type: String,
    pub name: String,
    pub params: Vec<ParamType>,
    pub returns: ReturnType,
    /// Property accessors and other compiler-generated methods
    pub special: bool,
    /// Declared on a base type rather than on `declaring_type` itself
    pub inherited: bool,
}

impl MethodDescriptor {
    /// A public `void` method taking the given parameters.
    pub fn action(declaring_type: &str, name: &str, params: Vec<ParamType>) -> Self {
        Self {
            declaring_type: declaring_type.to_string(),
            name: name.to_string(),
            params,
            returns: ReturnType::Void,
            special: false,
            inherited: false,
        }
    }

    pub fn returning(mut self, type_name: &str) -> Self {
        self.returns = ReturnType::Value(type_name.to_string());
        self
    }

    pub fn special(mut self) -> Self {
        self.special = true;
        self
    }

    pub fn inherited(mut self) -> Self {
        self.inherited = true;
        self
    }

    /// The single parameter of an eligible method, if it takes one.
    pub fn param(&self) -> Option<&ParamType> {
        self.params.first()
    }

    /// Whether event nodes may call this method.
    ///
    /// Declared directly on the type, not a special name, returns nothing,
    /// and takes zero parameters or one serializable parameter.
    pub fn is_eligible(&self) -> bool {
        if self.special || self.inherited {
            return false;
        }
        if self.returns != ReturnType::Void {
            return false;
        }
        match self.params.as_slice() {
            [] => true,
            [param] => param.is_serializable(),
            _ => false,
        }
    }

    /// Dropdown label, `"<Type>/<Method>(<Params>)"`.
    pub fn label(&self) -> String {
        let params: Vec<&str> = self.params.iter().map(|p| p.name()).collect();
        format!("{}/{}({})", self.declaring_type, self.name, params.join(", "))
    }
}

/// Everything the registry knows about one bindable type
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: String,
    pub methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            methods: Vec::new(),
        }
    }

    /// Add a method declared by this type.
    pub fn method(mut self, name: &str, params: Vec<ParamType>) -> Self {
        self.methods
            .push(MethodDescriptor::action(&self.name, name, params));
        self
    }

    /// Add a fully specified descriptor.
    pub fn with(mut self, descriptor: MethodDescriptor) -> Self {
        self.methods.push(descriptor);
        self
    }

    pub fn eligible_methods(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods.iter().filter(|m| m.is_eligible())
    }
}

/// Types that describe themselves to the registry
pub trait Describe {
    fn describe() -> TypeDescriptor;
}

/// Registered types keyed by type tag, in registration order
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    types: IndexMap<String, TypeDescriptor>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        let mut registry = Self {
            types: IndexMap::new(),
        };
        registry.insert(game_object_descriptor());
        registry
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Describe>(&mut self) -> &mut Self {
        self.insert(T::describe());
        self
    }

    /// Register or replace a descriptor.
    pub fn insert(&mut self, descriptor: TypeDescriptor) {
        debug!(
            "Registering type {} with {} methods",
            descriptor.name,
            descriptor.methods.len()
        );
        self.types.insert(descriptor.name.clone(), descriptor);
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeDescriptor> {
        self.types.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

/// Methods every scene object exposes.
fn game_object_descriptor() -> TypeDescriptor {
    TypeDescriptor::new(GAME_OBJECT_TYPE)
        .method("SetActive", vec![ParamType::Bool])
        .method("SetName", vec![ParamType::String])
        .with(MethodDescriptor::action(GAME_OBJECT_TYPE, "get_name", vec![]).special())
        .with(
            MethodDescriptor::action(GAME_OBJECT_TYPE, "GetComponentCount", vec![])
                .returning("Int32"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eligibility_predicate() {
        let t = "Door";
        assert!(MethodDescriptor::action(t, "Open", vec![]).is_eligible());
        assert!(MethodDescriptor::action(t, "Lock", vec![ParamType::Int]).is_eligible());
        assert!(
            MethodDescriptor::action(t, "Link", vec![ParamType::Object("Door".into())])
                .is_eligible()
        );

        assert!(!MethodDescriptor::action(t, "Move", vec![ParamType::Float, ParamType::Float])
            .is_eligible());
        assert!(
            !MethodDescriptor::action(t, "Place", vec![ParamType::Other("Vector3".into())])
                .is_eligible()
        );
        assert!(!MethodDescriptor::action(t, "IsOpen", vec![])
            .returning("Boolean")
            .is_eligible());
        assert!(!MethodDescriptor::action(t, "set_open", vec![ParamType::Bool])
            .special()
            .is_eligible());
        assert!(!MethodDescriptor::action(t, "ToString", vec![])
            .inherited()
            .is_eligible());
    }

    #[test]
    fn labels_list_parameter_names() {
        let m = MethodDescriptor::action("Door", "Lock", vec![ParamType::Int]);
        assert_eq!(m.label(), "Door/Lock(Int32)");
        let m = MethodDescriptor::action("Door", "Open", vec![]);
        assert_eq!(m.label(), "Door/Open()");
    }

    #[test]
    fn param_names_round_trip() {
        for param in [
            ParamType::Int,
            ParamType::Float,
            ParamType::Bool,
            ParamType::String,
            ParamType::Object("AudioClip".to_string()),
        ] {
            assert_eq!(ParamType::from_name(param.name()), param);
        }
    }

    #[test]
    fn param_accepts_matching_kind_only() {
        assert!(ParamType::Int.accepts(&TaggedValue::Int(1)));
        assert!(!ParamType::Int.accepts(&TaggedValue::Float(1.0)));
        assert!(ParamType::Object("Door".into()).accepts(&TaggedValue::Object(None)));
    }

    #[test]
    fn default_registry_knows_game_object() {
        let registry = TypeRegistry::new();
        let descriptor = registry.get(GAME_OBJECT_TYPE).unwrap();
        let eligible: Vec<&str> = descriptor
            .eligible_methods()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(eligible, vec!["SetActive", "SetName"]);
    }
}
