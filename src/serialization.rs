//! Conversion between the live [`EditorGraph`] and the persisted [`GraphAsset`].
//!
//! Saving walks nodes in creation order and ports in declared order, turning
//! stable ids into the positional indices the asset format uses. Loading
//! builds a fresh graph from those indices; nothing is shared between the
//! graph that was saved and the one that comes back.
//!
//! Load is lenient about stale data (object references, method signatures,
//! value kinds) and records each recovery in a [`LoadReport`]. Malformed
//! structure, such as an edge pointing past the node list, fails the load.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::asset::{EdgeRecord, GraphAsset, NodeRecord, NodeType, Position};
use crate::binding::{resolve_signature, EventBinding};
use crate::config::LayoutConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind, LoadReport};
use crate::editor::{Direction, EditorGraph, EditorNode, NodeId, NodeKind, PortId};
use crate::errors::{GraphError, GraphResult};
use crate::object::{ObjectHost, ObjectId, TypeRegistry};
use crate::value::{FromTaggedValue, TaggedValue};

/// Upper bound on End inputs and Event rows taken from a bare count.
pub const MAX_DECLARED_ROWS: usize = 256;

/// Placement of the Start/End pair synthesized for a blank asset
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LoadOptions {
    pub viewport_center: Position,
    pub start_offset: Position,
    pub end_offset: Position,
}

impl Default for LoadOptions {
    fn default() -> Self {
        (&LayoutConfig::default()).into()
    }
}

impl From<&LayoutConfig> for LoadOptions {
    fn from(layout: &LayoutConfig) -> Self {
        Self {
            viewport_center: layout.viewport_center,
            start_offset: layout.start_offset,
            end_offset: layout.end_offset,
        }
    }
}

impl LoadOptions {
    pub fn start_position(&self) -> Position {
        self.viewport_center + self.start_offset
    }

    pub fn end_position(&self) -> Position {
        self.viewport_center + self.end_offset
    }
}

/// Collapse the live graph into an asset.
pub fn save(graph: &EditorGraph) -> GraphAsset {
    let index_of: HashMap<NodeId, usize> = graph
        .nodes()
        .enumerate()
        .map(|(index, node)| (node.id, index))
        .collect();

    let nodes: Vec<NodeRecord> = graph
        .nodes()
        .enumerate()
        .map(|(index, node)| save_node(index, node))
        .collect();

    let edges: Vec<EdgeRecord> = graph
        .edges()
        .filter_map(|edge| {
            let (from_node, out_port_index) =
                port_address(graph, &index_of, edge.output, Direction::Output)?;
            let (to_node, in_port_index) =
                port_address(graph, &index_of, edge.input, Direction::Input)?;
            Some(EdgeRecord {
                from_node,
                out_port_index,
                to_node,
                in_port_index,
            })
        })
        .collect();

    info!("Saved graph: Nodes: {}, Edges: {}", nodes.len(), edges.len());
    GraphAsset { nodes, edges }
}

fn save_node(index: usize, node: &EditorNode) -> NodeRecord {
    let mut record = NodeRecord::new(index, node.node_type(), node.position, Vec::new());
    match &node.kind {
        NodeKind::Start { .. } => {}
        NodeKind::End { inputs } => {
            record.values.push(TaggedValue::Int(count(inputs.len())));
        }
        NodeKind::Dialogue { text, .. } => {
            record.values.push(TaggedValue::String(text.clone()));
        }
        NodeKind::Choice { choices, .. } => {
            record.values.push(TaggedValue::StringArray(
                choices.iter().map(|c| c.text.clone()).collect(),
            ));
        }
        NodeKind::Event { rows, .. } => {
            record.values = vec![
                TaggedValue::Int(count(rows.len())),
                TaggedValue::ObjectArray(rows.iter().map(|r| r.object()).collect()),
                TaggedValue::StringArray(
                    rows.iter()
                        .map(|r| r.signature().unwrap_or_default())
                        .collect(),
                ),
            ];
            record.event_parameters = rows.iter().map(|r| r.parameter().clone()).collect();
            record.final_events = rows
                .iter()
                .map(|r| r.binding().cloned().unwrap_or_default())
                .collect();
        }
    }
    record
}

fn count(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

/// Node index and port index of a live port.
fn port_address(
    graph: &EditorGraph,
    index_of: &HashMap<NodeId, usize>,
    port: PortId,
    direction: Direction,
) -> Option<(usize, usize)> {
    let node = graph.port(port)?.node;
    let port_index = graph.node(node)?.ports(direction).iter().position(|p| *p == port)?;
    Some((*index_of.get(&node)?, port_index))
}

/// Rebuild a live graph from an asset.
///
/// An asset with fewer than two nodes is treated as new: the result holds a
/// Start and an End node at the configured offsets and nothing else.
pub fn load(
    asset: &GraphAsset,
    host: &dyn ObjectHost,
    registry: &TypeRegistry,
    options: &LoadOptions,
) -> GraphResult<(EditorGraph, LoadReport)> {
    let mut graph = EditorGraph::new();
    let mut report = LoadReport::default();

    if asset.is_blank() {
        for (index, record) in asset.nodes.iter().enumerate() {
            report.push(Diagnostic::node(
                DiagnosticKind::DiscardedNode,
                index,
                format!("{} node ignored in a blank asset", record.node_type),
            ));
        }
        for edge in &asset.edges {
            report.push(Diagnostic::node(
                DiagnosticKind::DiscardedEdge,
                edge.from_node,
                "edge ignored in a blank asset",
            ));
        }
        graph.add_start(options.start_position());
        graph.add_end(options.end_position(), 1);
        info!("Bootstrapped blank asset");
        return Ok((graph, report));
    }

    let ids: Vec<NodeId> = asset
        .nodes
        .iter()
        .enumerate()
        .map(|(index, record)| load_node(&mut graph, index, record, host, registry, &mut report))
        .collect::<GraphResult<_>>()?;

    for (index, edge) in asset.edges.iter().enumerate() {
        load_edge(&mut graph, &ids, index, edge, &mut report)?;
    }

    info!(
        "Loaded {} with {} diagnostics",
        graph.stats(),
        report.diagnostics.len()
    );
    Ok((graph, report))
}

fn load_node(
    graph: &mut EditorGraph,
    index: usize,
    record: &NodeRecord,
    host: &dyn ObjectHost,
    registry: &TypeRegistry,
    report: &mut LoadReport,
) -> GraphResult<NodeId> {
    let position = record.position;
    let id = match record.node_type {
        NodeType::Start => graph.add_start(position),
        NodeType::End => {
            let inputs = value_at::<i32>(record, 0, index, report).unwrap_or(1);
            let inputs = capped_count(usize::try_from(inputs).unwrap_or(0), index, record, report);
            graph.add_end(position, inputs)
        }
        NodeType::Dialogue => {
            let text = value_at::<String>(record, 0, index, report).unwrap_or_default();
            graph.add_dialogue(position, &text)
        }
        NodeType::Choice => {
            let texts = value_at::<Vec<String>>(record, 0, index, report).unwrap_or_default();
            graph.add_choice(position, &texts)
        }
        NodeType::Event => {
            let id = load_event(graph, index, record, host, registry, report)?;
            debug!("Event node {} restored, continuing with the next record", index);
            id
        }
    };
    Ok(id)
}

fn load_event(
    graph: &mut EditorGraph,
    index: usize,
    record: &NodeRecord,
    host: &dyn ObjectHost,
    registry: &TypeRegistry,
    report: &mut LoadReport,
) -> GraphResult<NodeId> {
    let objects = value_at::<Vec<Option<ObjectId>>>(record, 1, index, report).unwrap_or_default();
    let signatures = value_at::<Vec<String>>(record, 2, index, report).unwrap_or_default();
    let listed = objects.len().max(signatures.len());
    let declared = value_at::<i32>(record, 0, index, report).and_then(|n| usize::try_from(n).ok());
    let rows = match declared {
        Some(declared) if listed == 0 => capped_count(declared, index, record, report),
        Some(declared) if declared != listed => {
            report.push(Diagnostic::node(
                DiagnosticKind::ValueMismatch,
                index,
                format!("row count {} but {} rows listed", declared, listed),
            ));
            listed
        }
        _ => listed,
    };

    let id = graph.add_event(record.position, rows);
    for row_index in 0..rows.max(1) {
        let object = objects.get(row_index).copied().flatten();
        let signature = signatures
            .get(row_index)
            .map(String::as_str)
            .filter(|s| !s.is_empty());
        let parameter = record
            .event_parameters
            .get(row_index)
            .cloned()
            .unwrap_or_default();

        let row = graph.row_mut(id, row_index)?;
        let Some(object) = object else {
            if let Some(signature) = signature {
                row.keep_unresolved(signature);
            }
            continue;
        };

        row.assign_object(Some(object), host, registry);
        if !host.exists(object) {
            report.push(Diagnostic::row(
                DiagnosticKind::DanglingObject,
                index,
                row_index,
                format!("object {} no longer exists", object),
            ));
            if let Some(signature) = signature {
                row.keep_unresolved(signature);
            }
            continue;
        }

        let Some(signature) = signature else {
            continue;
        };
        match resolve_signature(signature, object, host, registry) {
            Ok(resolved) => {
                let takes_argument = resolved.param().is_some();
                row.apply_resolved(resolved);
                if takes_argument && !parameter.is_none() {
                    if let Err(err) = row.set_parameter(parameter) {
                        report.push(Diagnostic::row(
                            DiagnosticKind::ParameterRejected,
                            index,
                            row_index,
                            err.to_string(),
                        ));
                    }
                }
            }
            Err(err) => {
                row.keep_unresolved(signature);
                report.push(Diagnostic::row(
                    DiagnosticKind::MethodNotFound,
                    index,
                    row_index,
                    err.to_string(),
                ));
            }
        }
    }

    report_stale_final_events(graph, id, index, record, report);
    Ok(id)
}

/// Rows whose persisted binding differs from the one rebuilt on load.
///
/// Rows that already carry a diagnostic are skipped; the earlier entry
/// explains why the binding changed.
fn report_stale_final_events(
    graph: &EditorGraph,
    id: NodeId,
    index: usize,
    record: &NodeRecord,
    report: &mut LoadReport,
) {
    let Some(rows) = graph.node(id).and_then(EditorNode::event_rows) else {
        return;
    };
    for (row_index, (persisted, row)) in record.final_events.iter().zip(rows).enumerate() {
        let rebuilt = row.binding().cloned().unwrap_or_default();
        let explained = report
            .diagnostics
            .iter()
            .any(|d| d.node == Some(index) && d.row == Some(row_index));
        if *persisted != rebuilt && !explained {
            report.push(Diagnostic::row(
                DiagnosticKind::StaleBinding,
                index,
                row_index,
                format!("stored final event replaced by {}", describe_binding(&rebuilt)),
            ));
        }
    }
}

fn describe_binding(binding: &EventBinding) -> String {
    if binding.method_name.is_empty() {
        "an empty binding".to_string()
    } else {
        format!("{}({})", binding.method_name, binding.parameter)
    }
}

/// Row and port counts with nothing else in the record backing them.
fn capped_count(count: usize, index: usize, record: &NodeRecord, report: &mut LoadReport) -> usize {
    if count <= MAX_DECLARED_ROWS {
        return count;
    }
    report.push(Diagnostic::node(
        DiagnosticKind::ValueMismatch,
        index,
        format!(
            "{} declares {} rows, capped at {}",
            record.node_type, count, MAX_DECLARED_ROWS
        ),
    ));
    MAX_DECLARED_ROWS
}

fn load_edge(
    graph: &mut EditorGraph,
    ids: &[NodeId],
    index: usize,
    edge: &EdgeRecord,
    report: &mut LoadReport,
) -> GraphResult<()> {
    let invalid = |reason: String| GraphError::InvalidEdge { index, reason };

    let port_at = |node_index: usize, port_index: usize, direction: Direction| -> GraphResult<PortId> {
        let node = ids
            .get(node_index)
            .ok_or_else(|| invalid(format!("node index {} out of range", node_index)))?;
        let ports = graph.ports(*node, direction)?;
        ports.get(port_index).copied().ok_or_else(|| {
            invalid(format!(
                "{:?} port index {} out of range on node {}",
                direction, port_index, node_index
            ))
        })
    };
    let output = port_at(edge.from_node, edge.out_port_index, Direction::Output)?;
    let input = port_at(edge.to_node, edge.in_port_index, Direction::Input)?;

    if graph.edges().any(|e| e.output == output && e.input == input) {
        report.push(Diagnostic::node(
            DiagnosticKind::DiscardedEdge,
            edge.from_node,
            format!("edge {} duplicates an earlier edge", index),
        ));
        return Ok(());
    }

    let replaced = graph
        .edges()
        .filter(|e| e.output == output && e.input != input)
        .count();
    if replaced > 0 {
        report.push(Diagnostic::node(
            DiagnosticKind::DiscardedEdge,
            edge.from_node,
            format!("edge {} replaces an earlier edge from the same output", index),
        ));
    }

    graph
        .connect(output, input)
        .map_err(|err| invalid(err.to_string()))?;
    Ok(())
}

/// Decode `values[index]`. Absent and `None` values are treated as unset.
fn value_at<T: FromTaggedValue>(
    record: &NodeRecord,
    value_index: usize,
    node_index: usize,
    report: &mut LoadReport,
) -> Option<T> {
    let value = record.value(value_index);
    if value.is_none() {
        return None;
    }
    match value.try_decode::<T>() {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            report.push(Diagnostic::node(
                DiagnosticKind::ValueMismatch,
                node_index,
                format!("{} value {}: {}", record.node_type, value_index, err),
            ));
            None
        }
    }
}
