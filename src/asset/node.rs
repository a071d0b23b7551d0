use serde::{Deserialize, Serialize};

use super::position::Position;
use crate::binding::EventBinding;
use crate::errors::GraphError;
use crate::value::TaggedValue;

// Dialogue node types
#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(try_from = "String", into = "String")]
pub enum NodeType {
    Start,
    End,
    Dialogue,
    Choice,
    Event,
}

impl NodeType {
    /// Start and End anchor every graph and cannot be removed by the author.
    pub fn is_deletable(self) -> bool {
        !matches!(self, NodeType::Start | NodeType::End)
    }
}

impl TryFrom<String> for NodeType {
    type Error = GraphError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse().map_err(|_| GraphError::UnknownNodeType(value))
    }
}

impl From<NodeType> for String {
    fn from(node_type: NodeType) -> Self {
        node_type.to_string()
    }
}

/// A persisted node.
///
/// `id` is the node's position in the owning asset's node list at save time;
/// it is recomputed on every save and is not a stable identity.
///
/// `values` follows a fixed schema per node type:
///
/// ```text
/// Start     []
/// End       [Int(input port count)]
/// Dialogue  [String(text)]
/// Choice    [StringArray(choice texts)]
/// Event     [Int(row count), ObjectArray(row objects), StringArray(row signatures)]
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: usize,
    pub node_type: NodeType,
    pub position: Position,
    #[serde(default)]
    pub values: Vec<TaggedValue>,
    // Event nodes only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event_parameters: Vec<TaggedValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub final_events: Vec<EventBinding>,
}

impl NodeRecord {
    pub fn new(id: usize, node_type: NodeType, position: Position, values: Vec<TaggedValue>) -> Self {
        Self {
            id,
            node_type,
            position,
            values,
            event_parameters: Vec::new(),
            final_events: Vec::new(),
        }
    }

    pub fn value(&self, index: usize) -> &TaggedValue {
        static NONE: TaggedValue = TaggedValue::None;
        self.values.get(index).unwrap_or(&NONE)
    }
}

/// A persisted connection from an output port to an input port.
///
/// Nodes and ports are addressed by position: `from_node`/`to_node` index the
/// asset's node list, the port indices index each node's output and input
/// port lists in declared order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from_node: usize,
    pub out_port_index: usize,
    pub to_node: usize,
    pub in_port_index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn node_type_serializes_by_name() {
        assert_eq!(serde_json::to_value(NodeType::Choice).unwrap(), json!("Choice"));
        let parsed: NodeType = serde_json::from_value(json!("Event")).unwrap();
        assert_eq!(parsed, NodeType::Event);
    }

    #[test]
    fn unknown_node_type_is_rejected() {
        let err = serde_json::from_value::<NodeType>(json!("Cutscene")).unwrap_err();
        assert!(err.to_string().contains("Unknown node type: Cutscene"));
    }

    #[test]
    fn only_start_and_end_are_pinned() {
        assert!(!NodeType::Start.is_deletable());
        assert!(!NodeType::End.is_deletable());
        assert!(NodeType::Dialogue.is_deletable());
    }

    #[test]
    fn missing_event_fields_default_to_empty() {
        let record: NodeRecord = serde_json::from_value(json!({
            "id": 0,
            "node_type": "Dialogue",
            "position": {"x": 1.0, "y": 2.0},
            "values": [{"type": "String", "value": "Hi"}]
        }))
        .unwrap();
        assert!(record.event_parameters.is_empty());
        assert!(record.final_events.is_empty());
        assert_eq!(record.value(0).as_str(), Some("Hi"));
        assert!(record.value(5).is_none());
    }
}
