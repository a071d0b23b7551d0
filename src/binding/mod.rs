//! Event bindings: persisted "call method M on target T with argument V".
//!
//! A binding never holds a live callable. Invoking it looks the method up
//! again on the target's current type through the [`TypeRegistry`], so a
//! binding written to disk keeps working across reloads as long as the type
//! still declares a method of that name.

pub mod catalog;
pub mod signature;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{BindingError, BindingResult};
use crate::object::{MethodDescriptor, ObjectHost, ObjectId, TypeRegistry};
use crate::value::TaggedValue;

pub use catalog::{
    catalog_labels, choose_by_label, choose_method, enumerate_candidates, persist_signature,
    resolve_signature, MethodCatalogEntry, ResolvedMethod, NO_FUNCTION,
};
pub use signature::MethodSignature;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventBinding {
    pub target: Option<ObjectId>,
    pub method_name: String,
    pub parameter: TaggedValue,
}

impl EventBinding {
    pub fn new(target: Option<ObjectId>, method_name: &str, parameter: TaggedValue) -> Self {
        Self {
            target,
            method_name: method_name.to_string(),
            parameter,
        }
    }

    pub fn from_resolved(resolved: &ResolvedMethod, parameter: TaggedValue) -> Self {
        Self::new(Some(resolved.target), &resolved.method.name, parameter)
    }

    /// A binding without target or method does nothing when invoked.
    pub fn is_inert(&self) -> bool {
        self.target.is_none() || self.method_name.is_empty()
    }

    /// Invoke the bound method, reporting why it could not be called.
    ///
    /// Returns `Ok(false)` for inert bindings, `Ok(true)` once the call went through.
    pub fn try_invoke(
        &self,
        host: &mut dyn ObjectHost,
        registry: &TypeRegistry,
    ) -> BindingResult<bool> {
        let Some(target) = self.target.filter(|_| !self.method_name.is_empty()) else {
            debug!("Skipping inert event binding");
            return Ok(false);
        };

        let method = self.resolve(&*host, registry, target)?.clone();
        let arg = match method.param() {
            None => None,
            Some(param) if param.accepts(&self.parameter) => Some(&self.parameter),
            Some(param) => {
                return Err(BindingError::ParameterMismatch {
                    method: method.label(),
                    expected: param.to_string(),
                    found: self.parameter.kind().to_string(),
                })
            }
        };

        host.invoke(target, &method.name, arg)?;
        debug!("Invoked {} on {}", method.label(), target);
        Ok(true)
    }

    /// Invoke the bound method; failures are logged and the call becomes a no-op.
    pub fn invoke(&self, host: &mut dyn ObjectHost, registry: &TypeRegistry) -> bool {
        if self.is_inert() {
            warn!("Event target or method name is empty");
            return false;
        }
        match self.try_invoke(host, registry) {
            Ok(invoked) => invoked,
            Err(err) => {
                warn!("Event {} not invoked: {}", self.method_name, err);
                false
            }
        }
    }

    /// Find the method on the target's live type, preferring an overload that
    /// takes the stored parameter.
    fn resolve<'r>(
        &self,
        host: &dyn ObjectHost,
        registry: &'r TypeRegistry,
        target: ObjectId,
    ) -> BindingResult<&'r MethodDescriptor> {
        let type_name = host.type_of(target).ok_or(BindingError::TargetMissing)?;
        let descriptor = registry
            .get(type_name)
            .ok_or_else(|| BindingError::TypeNotFound(type_name.to_string()))?;

        let mut named = descriptor
            .eligible_methods()
            .filter(|m| m.name == self.method_name)
            .peekable();
        let first = named.peek().copied();

        named
            .find(|m| match m.param() {
                Some(param) => param.accepts(&self.parameter),
                None => self.parameter.is_none(),
            })
            .or(first)
            .ok_or_else(|| BindingError::MethodNotFound {
                signature: self.method_name.clone(),
                target: host.display_name(target),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use super::*;
    use crate::object::{Component, Describe, ObjectWorld, ParamType, TypeDescriptor};

    #[derive(Default)]
    struct Counter {
        calls: Vec<Option<i32>>,
    }

    impl Describe for Counter {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::new("Counter")
                .method("Foo", vec![ParamType::Int])
                .method("Reset", vec![])
        }
    }

    impl Component for Counter {
        fn type_name(&self) -> &str {
            "Counter"
        }

        fn invoke(&mut self, method: &str, arg: Option<&TaggedValue>) -> BindingResult<()> {
            match method {
                "Foo" => self.calls.push(arg.and_then(TaggedValue::as_int)),
                "Reset" => self.calls.clear(),
                _ => {
                    return Err(BindingError::NotInvokable {
                        type_name: "Counter".to_string(),
                        method: method.to_string(),
                    })
                }
            }
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn setup() -> (ObjectWorld, TypeRegistry, ObjectId) {
        let mut registry = TypeRegistry::new();
        registry.register::<Counter>();
        let mut world = ObjectWorld::new();
        let npc = world.spawn("Npc");
        let counter = world.attach(npc, Box::new(Counter::default())).unwrap();
        (world, registry, counter)
    }

    #[test]
    fn invoke_calls_with_decoded_parameter() {
        let (mut world, registry, counter) = setup();
        let binding = EventBinding::new(Some(counter), "Foo", TaggedValue::Int(5));

        assert_eq!(binding.try_invoke(&mut world, &registry), Ok(true));
        assert_eq!(world.component::<Counter>(counter).unwrap().calls, vec![Some(5)]);
    }

    #[test]
    fn nullary_method_ignores_parameter() {
        let (mut world, registry, counter) = setup();
        EventBinding::new(Some(counter), "Foo", TaggedValue::Int(1)).invoke(&mut world, &registry);
        assert!(EventBinding::new(Some(counter), "Reset", TaggedValue::None)
            .invoke(&mut world, &registry));
        assert!(world.component::<Counter>(counter).unwrap().calls.is_empty());
    }

    #[test]
    fn inert_bindings_are_no_ops() {
        let (mut world, registry, counter) = setup();
        assert!(EventBinding::default().is_inert());
        assert_eq!(EventBinding::default().try_invoke(&mut world, &registry), Ok(false));
        assert!(!EventBinding::new(Some(counter), "", TaggedValue::None).invoke(&mut world, &registry));
    }

    #[test]
    fn failures_are_reported_by_try_invoke_and_swallowed_by_invoke() {
        let (mut world, registry, counter) = setup();

        let missing_method = EventBinding::new(Some(counter), "Explode", TaggedValue::None);
        assert!(matches!(
            missing_method.try_invoke(&mut world, &registry),
            Err(BindingError::MethodNotFound { .. })
        ));
        assert!(!missing_method.invoke(&mut world, &registry));

        let wrong_arg = EventBinding::new(Some(counter), "Foo", TaggedValue::from("five"));
        assert!(matches!(
            wrong_arg.try_invoke(&mut world, &registry),
            Err(BindingError::ParameterMismatch { .. })
        ));

        let dangling = EventBinding::new(Some(ObjectId(404)), "Foo", TaggedValue::Int(1));
        assert_eq!(
            dangling.try_invoke(&mut world, &registry),
            Err(BindingError::TargetMissing)
        );
        assert!(world.component::<Counter>(counter).unwrap().calls.is_empty());
    }

    #[test]
    fn binding_serializes_with_weak_target() {
        let binding = EventBinding::new(Some(ObjectId(3)), "Foo", TaggedValue::Int(2));
        let json = serde_json::to_value(&binding).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "target": 3,
                "method_name": "Foo",
                "parameter": {"type": "Int", "value": 2}
            })
        );
    }
}
