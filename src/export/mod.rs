//! Render a dialogue asset as a diagram.

pub mod to_dot;
pub mod to_mermaid;

use serde::Serialize;

use crate::asset::{GraphAsset, NodeRecord, NodeType};

/// Supported diagram formats
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    clap::ValueEnum,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    Dot,
    Mermaid,
}

impl ExportFormat {
    pub fn render(self, asset: &GraphAsset) -> Result<String, handlebars::RenderError> {
        match self {
            ExportFormat::Dot => to_dot::render(asset),
            ExportFormat::Mermaid => to_mermaid::render(asset),
        }
    }
}

/// Shared rendering used by the template-based exporters
pub mod renderer {
    use serde_json::{json, Value};

    use super::{DiagramEdge, DiagramNode};
    use crate::asset::GraphAsset;

    pub fn render_template(
        asset: &GraphAsset,
        template: &str,
    ) -> Result<String, handlebars::RenderError> {
        let handlebars = crate::common::get_handlebars();
        handlebars.render_template(template, &create_standard_context(asset))
    }

    pub fn create_standard_context(asset: &GraphAsset) -> Value {
        json!({
            "nodes": DiagramNode::from_asset(asset),
            "edges": DiagramEdge::from_asset(asset),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiagramNode {
    pub id: String,
    pub node_type: NodeType,
    pub label: String,
}

impl DiagramNode {
    pub fn from_asset(asset: &GraphAsset) -> Vec<DiagramNode> {
        asset
            .nodes
            .iter()
            .enumerate()
            .map(|(index, record)| DiagramNode {
                id: node_key(index),
                node_type: record.node_type,
                label: node_label(record),
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiagramEdge {
    pub source: String,
    pub target: String,
    pub label: Option<String>,
}

impl DiagramEdge {
    /// Edges leaving a Choice node carry the text of their choice.
    pub fn from_asset(asset: &GraphAsset) -> Vec<DiagramEdge> {
        asset
            .edges
            .iter()
            .map(|edge| DiagramEdge {
                source: node_key(edge.from_node),
                target: node_key(edge.to_node),
                label: asset
                    .nodes
                    .get(edge.from_node)
                    .filter(|n| n.node_type == NodeType::Choice)
                    .and_then(|n| n.value(0).as_string_array())
                    .and_then(|texts| texts.get(edge.out_port_index).cloned()),
            })
            .collect()
    }
}

fn node_key(index: usize) -> String {
    format!("node_{}", index)
}

fn node_label(record: &NodeRecord) -> String {
    match record.node_type {
        NodeType::Dialogue => record.value(0).as_str().unwrap_or_default().to_string(),
        NodeType::Event => {
            let signatures: Vec<&String> = record
                .value(2)
                .as_string_array()
                .map(|s| s.iter().filter(|s| !s.is_empty()).collect())
                .unwrap_or_default();
            if signatures.is_empty() {
                "Event".to_string()
            } else {
                format!(
                    "Event: {}",
                    signatures
                        .iter()
                        .map(|s| s.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{EdgeRecord, Position};
    use crate::value::TaggedValue;

    pub(crate) fn sample() -> GraphAsset {
        let at = Position::default();
        GraphAsset {
            nodes: vec![
                NodeRecord::new(0, NodeType::Start, at, vec![]),
                NodeRecord::new(
                    1,
                    NodeType::Choice,
                    at,
                    vec![TaggedValue::StringArray(vec!["Yes".into(), "No".into()])],
                ),
                NodeRecord::new(
                    2,
                    NodeType::Event,
                    at,
                    vec![
                        TaggedValue::Int(2),
                        TaggedValue::ObjectArray(vec![None, None]),
                        TaggedValue::StringArray(vec!["Door/Open()".into(), String::new()]),
                    ],
                ),
                NodeRecord::new(3, NodeType::Dialogue, at, vec!["Say \"bye\"".into()]),
                NodeRecord::new(4, NodeType::End, at, vec![TaggedValue::Int(1)]),
            ],
            edges: vec![
                EdgeRecord {
                    from_node: 0,
                    out_port_index: 0,
                    to_node: 1,
                    in_port_index: 0,
                },
                EdgeRecord {
                    from_node: 1,
                    out_port_index: 1,
                    to_node: 2,
                    in_port_index: 0,
                },
            ],
        }
    }

    #[test]
    fn labels_follow_node_type() {
        let labels: Vec<_> = DiagramNode::from_asset(&sample())
            .into_iter()
            .map(|n| n.label)
            .collect();
        assert_eq!(
            labels,
            vec!["Start", "Choice", "Event: Door/Open()", "Say \"bye\"", "End"]
        );
    }

    #[test]
    fn choice_edges_are_labelled() {
        let edges = DiagramEdge::from_asset(&sample());
        assert_eq!(edges[0].label, None);
        assert_eq!(edges[1].label.as_deref(), Some("No"));
        assert_eq!(edges[1].source, "node_1");
    }

    #[test]
    fn format_names() {
        assert_eq!(ExportFormat::Mermaid.to_string(), "mermaid");
        assert_eq!("dot".parse::<ExportFormat>().unwrap(), ExportFormat::Dot);
    }
}
