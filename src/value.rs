//! Tagged values: the portable payload format for node configuration.
//!
//! A [`TaggedValue`] holds exactly one of a closed set of primitive, string,
//! object-reference or array payloads. Node records and event bindings store
//! their heterogeneous settings as sequences of tagged values so the asset
//! format never needs an open "any" field.
//!
//! ```rust
//! use dialogue_graph::value::{TaggedValue, ValueKind};
//!
//! let value = TaggedValue::encode(&vec!["Yes".to_string(), "No".to_string()]);
//! assert_eq!(value.kind(), ValueKind::StringArray);
//! assert_eq!(value.decode::<Vec<String>>(), Some(vec!["Yes".to_string(), "No".to_string()]));
//!
//! // Types outside the supported set collapse to `None` on the lenient path...
//! assert_eq!(TaggedValue::encode(&3.5f64).kind(), ValueKind::None);
//! // ...and are rejected on the strict one.
//! assert!(TaggedValue::try_encode(&3.5f64).is_err());
//! ```

use std::any::{type_name, Any};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{ValueError, ValueResult};
use crate::object::ObjectId;

/// Discriminant of a [`TaggedValue`]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum ValueKind {
    None,
    Int,
    Float,
    String,
    Bool,
    Object,
    IntArray,
    FloatArray,
    StringArray,
    BoolArray,
    ObjectArray,
}

/// A discriminated union over the payload types the asset format can store.
///
/// Object references are weak: an [`ObjectId`] may outlive the object it
/// names, so every object slot is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum TaggedValue {
    #[default]
    None,
    Int(i32),
    Float(f32),
    String(String),
    Bool(bool),
    Object(Option<ObjectId>),
    IntArray(Vec<i32>),
    FloatArray(Vec<f32>),
    StringArray(Vec<String>),
    BoolArray(Vec<bool>),
    ObjectArray(Vec<Option<ObjectId>>),
}

impl TaggedValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            TaggedValue::None => ValueKind::None,
            TaggedValue::Int(_) => ValueKind::Int,
            TaggedValue::Float(_) => ValueKind::Float,
            TaggedValue::String(_) => ValueKind::String,
            TaggedValue::Bool(_) => ValueKind::Bool,
            TaggedValue::Object(_) => ValueKind::Object,
            TaggedValue::IntArray(_) => ValueKind::IntArray,
            TaggedValue::FloatArray(_) => ValueKind::FloatArray,
            TaggedValue::StringArray(_) => ValueKind::StringArray,
            TaggedValue::BoolArray(_) => ValueKind::BoolArray,
            TaggedValue::ObjectArray(_) => ValueKind::ObjectArray,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, TaggedValue::None)
    }

    /// Encode a native value by inspecting its runtime type.
    ///
    /// Unsupported types produce [`TaggedValue::None`] and a warning. Use
    /// [`TaggedValue::try_encode`] where dropping data must be an error.
    pub fn encode<T: Any>(value: &T) -> TaggedValue {
        match Self::try_encode(value) {
            Ok(tagged) => tagged,
            Err(err) => {
                warn!("Dropping value: {}", err);
                TaggedValue::None
            }
        }
    }

    /// Encode a native value, failing for types outside the supported set.
    pub fn try_encode<T: Any>(value: &T) -> ValueResult<TaggedValue> {
        let any = value as &dyn Any;

        if let Some(v) = any.downcast_ref::<i32>() {
            return Ok(TaggedValue::Int(*v));
        }
        if let Some(v) = any.downcast_ref::<f32>() {
            return Ok(TaggedValue::Float(*v));
        }
        if let Some(v) = any.downcast_ref::<String>() {
            return Ok(TaggedValue::String(v.clone()));
        }
        if let Some(v) = any.downcast_ref::<bool>() {
            return Ok(TaggedValue::Bool(*v));
        }
        if let Some(v) = any.downcast_ref::<ObjectId>() {
            return Ok(TaggedValue::Object(Some(*v)));
        }
        if let Some(v) = any.downcast_ref::<Option<ObjectId>>() {
            return Ok(TaggedValue::Object(*v));
        }
        if let Some(v) = any.downcast_ref::<Vec<i32>>() {
            return Ok(TaggedValue::IntArray(v.clone()));
        }
        if let Some(v) = any.downcast_ref::<Vec<f32>>() {
            return Ok(TaggedValue::FloatArray(v.clone()));
        }
        if let Some(v) = any.downcast_ref::<Vec<String>>() {
            return Ok(TaggedValue::StringArray(v.clone()));
        }
        if let Some(v) = any.downcast_ref::<Vec<bool>>() {
            return Ok(TaggedValue::BoolArray(v.clone()));
        }
        if let Some(v) = any.downcast_ref::<Vec<ObjectId>>() {
            return Ok(TaggedValue::ObjectArray(v.iter().copied().map(Some).collect()));
        }
        if let Some(v) = any.downcast_ref::<Vec<Option<ObjectId>>>() {
            return Ok(TaggedValue::ObjectArray(v.clone()));
        }
        if let Some(v) = any.downcast_ref::<TaggedValue>() {
            return Ok(v.clone());
        }

        Err(ValueError::UnsupportedValueType(type_name::<T>().to_string()))
    }

    /// Return the payload as `T`, or `None` when the kind does not match.
    pub fn decode<T: FromTaggedValue>(&self) -> Option<T> {
        T::from_tagged(self)
    }

    /// Like [`TaggedValue::decode`] but reports the mismatching kinds.
    pub fn try_decode<T: FromTaggedValue>(&self) -> ValueResult<T> {
        T::from_tagged(self).ok_or(ValueError::KindMismatch {
            expected: T::KIND,
            found: self.kind(),
        })
    }

    /// Argument to pass to a method call: `None` means "call without arguments".
    pub fn as_argument(&self) -> Option<&TaggedValue> {
        if self.is_none() {
            None
        } else {
            Some(self)
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        self.decode()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TaggedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_string_array(&self) -> Option<&[String]> {
        match self {
            TaggedValue::StringArray(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            TaggedValue::Object(id) => *id,
            _ => None,
        }
    }
}

impl fmt::Display for TaggedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn object(id: &Option<ObjectId>) -> String {
            id.map(|id| id.to_string()).unwrap_or_else(|| "null".to_string())
        }

        match self {
            TaggedValue::None => write!(f, "none"),
            TaggedValue::Int(v) => write!(f, "{}", v),
            TaggedValue::Float(v) => write!(f, "{}", v),
            TaggedValue::String(v) => write!(f, "{:?}", v),
            TaggedValue::Bool(v) => write!(f, "{}", v),
            TaggedValue::Object(v) => write!(f, "{}", object(v)),
            TaggedValue::IntArray(v) => write!(f, "{:?}", v),
            TaggedValue::FloatArray(v) => write!(f, "{:?}", v),
            TaggedValue::StringArray(v) => write!(f, "{:?}", v),
            TaggedValue::BoolArray(v) => write!(f, "{:?}", v),
            TaggedValue::ObjectArray(v) => {
                let items: Vec<String> = v.iter().map(object).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

/// Native types a [`TaggedValue`] can be decoded into
pub trait FromTaggedValue: Sized {
    /// Kind that decodes into `Self`
    const KIND: ValueKind;

    fn from_tagged(value: &TaggedValue) -> Option<Self>;
}

macro_rules! impl_from_tagged {
    ($ty:ty, $variant:ident) => {
        impl FromTaggedValue for $ty {
            const KIND: ValueKind = ValueKind::$variant;

            fn from_tagged(value: &TaggedValue) -> Option<Self> {
                match value {
                    TaggedValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }

        impl From<$ty> for TaggedValue {
            fn from(value: $ty) -> Self {
                TaggedValue::$variant(value)
            }
        }
    };
}

impl_from_tagged!(i32, Int);
impl_from_tagged!(f32, Float);
impl_from_tagged!(String, String);
impl_from_tagged!(bool, Bool);
impl_from_tagged!(Option<ObjectId>, Object);
impl_from_tagged!(Vec<i32>, IntArray);
impl_from_tagged!(Vec<f32>, FloatArray);
impl_from_tagged!(Vec<String>, StringArray);
impl_from_tagged!(Vec<bool>, BoolArray);
impl_from_tagged!(Vec<Option<ObjectId>>, ObjectArray);

impl FromTaggedValue for ObjectId {
    const KIND: ValueKind = ValueKind::Object;

    fn from_tagged(value: &TaggedValue) -> Option<Self> {
        value.as_object()
    }
}

/// Every slot must hold a live reference; a `None` slot fails the decode.
impl FromTaggedValue for Vec<ObjectId> {
    const KIND: ValueKind = ValueKind::ObjectArray;

    fn from_tagged(value: &TaggedValue) -> Option<Self> {
        match value {
            TaggedValue::ObjectArray(ids) => ids.iter().copied().collect(),
            _ => None,
        }
    }
}

impl From<ObjectId> for TaggedValue {
    fn from(value: ObjectId) -> Self {
        TaggedValue::Object(Some(value))
    }
}

impl From<&str> for TaggedValue {
    fn from(value: &str) -> Self {
        TaggedValue::String(value.to_string())
    }
}
