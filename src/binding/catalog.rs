//! Method catalog: which methods an event row may call on an assigned object,
//! and how a chosen method survives a save/reload cycle as a string.

use serde::Serialize;
use tracing::{debug, warn};

use super::signature::MethodSignature;
use crate::errors::{BindingError, BindingResult};
use crate::object::{MethodDescriptor, ObjectHost, ObjectId, ParamType, TypeRegistry};

/// Dropdown sentinel meaning "no method chosen".
pub const NO_FUNCTION: &str = "No Function";

/// Eligible methods of one object or attached component
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MethodCatalogEntry {
    pub owner: ObjectId,
    pub type_name: String,
    pub candidates: Vec<MethodDescriptor>,
}

impl MethodCatalogEntry {
    pub fn labels(&self) -> impl Iterator<Item = String> + '_ {
        self.candidates.iter().map(MethodDescriptor::label)
    }
}

/// A method bound to the live object that will receive the call
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedMethod {
    pub target: ObjectId,
    pub method: MethodDescriptor,
}

impl ResolvedMethod {
    pub fn param(&self) -> Option<&ParamType> {
        self.method.param()
    }

    pub fn signature(&self) -> MethodSignature {
        MethodSignature::new(
            &self.method.declaring_type,
            &self.method.name,
            self.param().map(ParamType::name),
        )
    }
}

/// List eligible methods on `object` and on every component attached to it.
///
/// Entries come in host order: the scene object first, then its components.
/// Types that are not registered, or that declare no eligible method, are
/// left out.
pub fn enumerate_candidates(
    host: &dyn ObjectHost,
    registry: &TypeRegistry,
    object: ObjectId,
) -> Vec<MethodCatalogEntry> {
    let Some(owner) = host.owner_of(object) else {
        warn!("Cannot list methods of missing object {}", object);
        return Vec::new();
    };

    std::iter::once(owner)
        .chain(host.components_of(owner))
        .filter_map(|id| {
            let type_name = host.type_of(id)?;
            let Some(descriptor) = registry.get(type_name) else {
                debug!("Skipping unregistered type {} on {}", type_name, id);
                return None;
            };
            let candidates: Vec<MethodDescriptor> =
                descriptor.eligible_methods().cloned().collect();
            (!candidates.is_empty()).then(|| MethodCatalogEntry {
                owner: id,
                type_name: type_name.to_string(),
                candidates,
            })
        })
        .collect()
}

/// Dropdown population: the [`NO_FUNCTION`] sentinel followed by every candidate label.
pub fn catalog_labels(entries: &[MethodCatalogEntry]) -> Vec<String> {
    std::iter::once(NO_FUNCTION.to_string())
        .chain(entries.iter().flat_map(MethodCatalogEntry::labels))
        .collect()
}

/// Pick a candidate of `entry` by method name.
pub fn choose_method(entry: &MethodCatalogEntry, method_name: &str) -> BindingResult<ResolvedMethod> {
    entry
        .candidates
        .iter()
        .find(|m| m.name == method_name)
        .map(|method| ResolvedMethod {
            target: entry.owner,
            method: method.clone(),
        })
        .ok_or_else(|| BindingError::MethodNotFound {
            signature: method_name.to_string(),
            target: format!("{} ({})", entry.type_name, entry.owner),
        })
}

/// Pick a candidate from a full catalog by dropdown label or signature.
pub fn choose_by_label(entries: &[MethodCatalogEntry], label: &str) -> BindingResult<ResolvedMethod> {
    let sig: MethodSignature = label.parse()?;
    let not_found = || BindingError::MethodNotFound {
        signature: label.to_string(),
        target: "catalog".to_string(),
    };

    let entry = entries
        .iter()
        .find(|e| e.type_name == sig.short_type_name())
        .ok_or_else(not_found)?;
    let method = find_method(entry.candidates.iter(), &sig).ok_or_else(not_found)?;

    Ok(ResolvedMethod {
        target: entry.owner,
        method: method.clone(),
    })
}

/// Encode a chosen method as its persisted signature string.
pub fn persist_signature(resolved: &ResolvedMethod) -> String {
    resolved.signature().to_string()
}

/// Re-resolve a persisted signature against `target`.
///
/// The declaring type is looked up in the registry by name, its eligible
/// methods are matched by name (and parameter type when the signature names
/// one), and the call target becomes `target`'s component of that type.
pub fn resolve_signature(
    signature: &str,
    target: ObjectId,
    host: &dyn ObjectHost,
    registry: &TypeRegistry,
) -> BindingResult<ResolvedMethod> {
    let sig: MethodSignature = signature.parse()?;
    let type_name = sig.short_type_name();

    let descriptor = registry
        .get(type_name)
        .ok_or_else(|| BindingError::TypeNotFound(type_name.to_string()))?;

    let method = find_method(descriptor.eligible_methods(), &sig).ok_or_else(|| {
        BindingError::MethodNotFound {
            signature: signature.to_string(),
            target: type_name.to_string(),
        }
    })?;

    if !host.exists(target) {
        return Err(BindingError::TargetMissing);
    }
    let component = host
        .component_of_type(target, type_name)
        .ok_or_else(|| BindingError::ComponentMissing {
            object: host.display_name(target),
            type_name: type_name.to_string(),
        })?;

    debug!("Resolved {} on {}", signature, host.display_name(component));
    Ok(ResolvedMethod {
        target: component,
        method: method.clone(),
    })
}

fn find_method<'a>(
    mut candidates: impl Iterator<Item = &'a MethodDescriptor>,
    sig: &MethodSignature,
) -> Option<&'a MethodDescriptor> {
    candidates.find(|m| {
        m.name == sig.method
            && match (&sig.param, m.param()) {
                (None, None) => true,
                (Some(wanted), Some(param)) => param.name() == wanted,
                _ => false,
            }
    })
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use super::*;
    use crate::object::{Component, Describe, ObjectWorld, TypeDescriptor, GAME_OBJECT_TYPE};
    use crate::value::TaggedValue;

    struct Door;

    impl Describe for Door {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::new("Door")
                .method("Open", vec![])
                .method("Lock", vec![ParamType::Int])
                .method("Slide", vec![ParamType::Float, ParamType::Float])
                .with(MethodDescriptor::action("Door", "IsOpen", vec![]).returning("Boolean"))
        }
    }

    impl Component for Door {
        fn type_name(&self) -> &str {
            "Door"
        }

        fn invoke(&mut self, _method: &str, _arg: Option<&TaggedValue>) -> BindingResult<()> {
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct Marker;

    impl Component for Marker {
        fn type_name(&self) -> &str {
            "Marker"
        }

        fn invoke(&mut self, _method: &str, _arg: Option<&TaggedValue>) -> BindingResult<()> {
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn setup() -> (ObjectWorld, TypeRegistry, ObjectId, ObjectId) {
        let mut registry = TypeRegistry::new();
        registry.register::<Door>();
        let mut world = ObjectWorld::new();
        let house = world.spawn("House");
        let door = world.attach(house, Box::new(Door)).unwrap();
        world.attach(house, Box::new(Marker)).unwrap();
        (world, registry, house, door)
    }

    #[test]
    fn enumerates_object_and_components() {
        let (world, registry, house, door) = setup();
        let entries = enumerate_candidates(&world, &registry, house);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].owner, house);
        assert_eq!(entries[0].type_name, GAME_OBJECT_TYPE);
        assert_eq!(entries[1].owner, door);

        let door_methods: Vec<&str> = entries[1].candidates.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(door_methods, vec!["Open", "Lock"]);

        assert_eq!(
            catalog_labels(&entries),
            vec![
                "No Function",
                "GameObject/SetActive(Boolean)",
                "GameObject/SetName(String)",
                "Door/Open()",
                "Door/Lock(Int32)",
            ]
        );
    }

    #[test]
    fn enumerating_a_component_lists_its_owner() {
        let (world, registry, house, door) = setup();
        let entries = enumerate_candidates(&world, &registry, door);
        assert_eq!(entries[0].owner, house);
    }

    #[test]
    fn missing_object_has_no_candidates() {
        let (world, registry, _, _) = setup();
        assert!(enumerate_candidates(&world, &registry, ObjectId(404)).is_empty());
    }

    #[test]
    fn choose_method_by_name() {
        let (world, registry, house, door) = setup();
        let entries = enumerate_candidates(&world, &registry, house);

        let resolved = choose_method(&entries[1], "Lock").unwrap();
        assert_eq!(resolved.target, door);
        assert_eq!(resolved.param(), Some(&ParamType::Int));

        let err = choose_method(&entries[1], "Slide").unwrap_err();
        assert!(matches!(err, BindingError::MethodNotFound { .. }));
    }

    #[test]
    fn choose_by_label_uses_declaring_type() {
        let (world, registry, house, door) = setup();
        let entries = enumerate_candidates(&world, &registry, house);

        let resolved = choose_by_label(&entries, "Door/Open()").unwrap();
        assert_eq!(resolved.target, door);
        let resolved = choose_by_label(&entries, "GameObject/SetActive(Boolean)").unwrap();
        assert_eq!(resolved.target, house);
        assert!(choose_by_label(&entries, "Door/Open(Int32)").is_err());
    }

    #[test]
    fn signature_round_trip() {
        let (world, registry, house, door) = setup();
        let entries = enumerate_candidates(&world, &registry, house);
        let resolved = choose_method(&entries[1], "Lock").unwrap();

        let signature = persist_signature(&resolved);
        assert_eq!(signature, "Door/Lock(Int32)");

        let again = resolve_signature(&signature, house, &world, &registry).unwrap();
        assert_eq!(again, resolved);
        assert_eq!(again.target, door);
    }

    #[test]
    fn resolve_reports_each_failure() {
        let (world, registry, house, _) = setup();

        assert_eq!(
            resolve_signature("Window/Open()", house, &world, &registry),
            Err(BindingError::TypeNotFound("Window".to_string()))
        );
        assert!(matches!(
            resolve_signature("Door/Close()", house, &world, &registry),
            Err(BindingError::MethodNotFound { .. })
        ));
        assert!(matches!(
            resolve_signature("Door/Slide(Single)", house, &world, &registry),
            Err(BindingError::MethodNotFound { .. })
        ));
        assert_eq!(
            resolve_signature("Door/Open()", ObjectId(404), &world, &registry),
            Err(BindingError::TargetMissing)
        );
        assert!(matches!(
            resolve_signature("nonsense", house, &world, &registry),
            Err(BindingError::MalformedSignature(_))
        ));
    }

    #[test]
    fn resolve_requires_component_on_target() {
        let (mut world, registry, _, _) = setup();
        let shed = world.spawn("Shed");
        assert!(matches!(
            resolve_signature("Door/Open()", shed, &world, &registry),
            Err(BindingError::ComponentMissing { .. })
        ));
    }
}
