//! The live, editable dialogue graph.
//!
//! Nodes, ports and edges live in insertion-ordered maps keyed by ids that
//! are allocated once and never reused. Positional indices exist only in the
//! persisted form and are computed by [`crate::serialization::save`].
//!
//! Invariants kept by every edit:
//! - an End node has at least one input port
//! - a Choice node has at least two rows, one output port per row
//! - an Event node has at least one row
//! - every edge joins an output port to an input port of a different node

pub mod event_row;
pub mod node;
pub mod port;

pub use event_row::{EventRow, RowState};
pub use node::{ChoiceRow, EditorNode, NodeKind};
pub use port::{Capacity, Direction, Edge, EdgeId, NodeId, Port, PortId};

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::asset::{NodeType, Position};
use crate::errors::{BindingError, GraphError, GraphResult};
use crate::object::{ObjectHost, ObjectId, TypeRegistry};
use crate::value::TaggedValue;

const MIN_END_INPUTS: usize = 1;
const MIN_CHOICES: usize = 2;
const MIN_EVENT_ROWS: usize = 1;

#[derive(Clone, Debug, Default)]
pub struct EditorGraph {
    nodes: IndexMap<NodeId, EditorNode>,
    ports: IndexMap<PortId, Port>,
    edges: IndexMap<EdgeId, Edge>,
    next_id: u64,
}

impl EditorGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // Node creation

    pub fn add_start(&mut self, position: Position) -> NodeId {
        self.insert_node(position, |graph, id| NodeKind::Start {
            output: graph.new_port(id, Direction::Output, "Out"),
        })
    }

    /// End node with `inputs` input ports, at least one.
    pub fn add_end(&mut self, position: Position, inputs: usize) -> NodeId {
        self.insert_node(position, |graph, id| NodeKind::End {
            inputs: (0..inputs.max(MIN_END_INPUTS))
                .map(|_| graph.new_port(id, Direction::Input, "In"))
                .collect(),
        })
    }

    pub fn add_dialogue(&mut self, position: Position, text: &str) -> NodeId {
        self.insert_node(position, |graph, id| NodeKind::Dialogue {
            input: graph.new_port(id, Direction::Input, "In"),
            output: graph.new_port(id, Direction::Output, "Out"),
            text: text.to_string(),
        })
    }

    /// Choice node with one row per text; padded with default options up to two rows.
    pub fn add_choice<S: AsRef<str>>(&mut self, position: Position, texts: &[S]) -> NodeId {
        let mut texts: Vec<String> = texts.iter().map(|t| t.as_ref().to_string()).collect();
        while texts.len() < MIN_CHOICES {
            texts.push(format!("Option {}", texts.len()));
        }

        self.insert_node(position, |graph, id| NodeKind::Choice {
            input: graph.new_port(id, Direction::Input, "In"),
            choices: texts
                .into_iter()
                .map(|text| ChoiceRow {
                    text,
                    port: graph.new_port(id, Direction::Output, ""),
                })
                .collect(),
        })
    }

    /// Event node with `rows` empty rows, at least one.
    pub fn add_event(&mut self, position: Position, rows: usize) -> NodeId {
        self.insert_node(position, |graph, id| NodeKind::Event {
            input: graph.new_port(id, Direction::Input, "In"),
            output: graph.new_port(id, Direction::Output, "Out"),
            rows: (0..rows.max(MIN_EVENT_ROWS)).map(EventRow::new).collect(),
        })
    }

    /// Remove a node with all its ports and edges. Start and End stay.
    pub fn remove_node(&mut self, id: NodeId) -> GraphResult<()> {
        let node = self.node_or_err(id)?;
        if !node.node_type().is_deletable() {
            return Err(GraphError::NotDeletable(id.to_string()));
        }
        for port in node.all_ports() {
            self.remove_port(port);
        }
        self.nodes.shift_remove(&id);
        info!("Removed node {}", id);
        Ok(())
    }

    pub fn set_position(&mut self, id: NodeId, position: Position) -> GraphResult<()> {
        self.node_mut(id)?.position = position;
        Ok(())
    }

    // Lookups

    pub fn node(&self, id: NodeId) -> Option<&EditorNode> {
        self.nodes.get(&id)
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &EditorNode> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn port(&self, id: PortId) -> Option<&Port> {
        self.ports.get(&id)
    }

    pub fn ports(&self, node: NodeId, direction: Direction) -> GraphResult<Vec<PortId>> {
        Ok(self.node_or_err(node)?.ports(direction))
    }

    /// Edges in connection order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges_of(&self, port: PortId) -> Vec<EdgeId> {
        self.edges
            .values()
            .filter(|e| e.touches(port))
            .map(|e| e.id)
            .collect()
    }

    pub fn stats(&self) -> String {
        format!("Nodes: {}, Edges: {}", self.nodes.len(), self.edges.len())
    }

    // Edges

    /// Every port an edge starting at `start` may be dropped on.
    pub fn compatible_ports(&self, start: PortId) -> Vec<PortId> {
        let Some(start) = self.ports.get(&start) else {
            return Vec::new();
        };
        self.ports
            .values()
            .filter(|p| p.node != start.node && p.direction == start.direction.opposite())
            .map(|p| p.id)
            .collect()
    }

    /// Join an output port to an input port.
    ///
    /// A single-capacity port that is already connected loses its old edge.
    /// Connecting an already joined pair returns the existing edge.
    pub fn connect(&mut self, output: PortId, input: PortId) -> GraphResult<EdgeId> {
        let from = self.port_or_err(output)?;
        let to = self.port_or_err(input)?;

        let incompatible = |reason: &str| GraphError::IncompatiblePorts {
            from: output.to_string(),
            to: input.to_string(),
            reason: reason.to_string(),
        };
        if from.node == to.node {
            return Err(incompatible("ports belong to the same node"));
        }
        if from.direction != Direction::Output || to.direction != Direction::Input {
            return Err(incompatible("edges run from an output to an input"));
        }

        if let Some(existing) = self
            .edges
            .values()
            .find(|e| e.output == output && e.input == input)
        {
            return Ok(existing.id);
        }

        for port in [from, to] {
            if port.capacity == Capacity::Single {
                for edge in self.edges_of(port.id) {
                    debug!("Replacing edge {} on single port {}", edge, port.id);
                    self.edges.shift_remove(&edge);
                }
            }
        }

        let id = EdgeId(self.allocate());
        self.edges.insert(id, Edge { id, output, input });
        debug!("Connected {} -> {} as {}", output, input, id);
        Ok(id)
    }

    pub fn disconnect(&mut self, edge: EdgeId) -> Option<Edge> {
        self.edges.shift_remove(&edge)
    }

    /// Drop every edge touching `port`; returns how many were removed.
    pub fn disconnect_all(&mut self, port: PortId) -> usize {
        let before = self.edges.len();
        self.edges.retain(|_, e| !e.touches(port));
        before - self.edges.len()
    }

    // End rows

    pub fn add_input(&mut self, node: NodeId) -> GraphResult<PortId> {
        self.expect_kind(node, NodeType::End)?;
        let port = self.new_port(node, Direction::Input, "In");
        if let NodeKind::End { inputs } = &mut self.node_mut(node)?.kind {
            inputs.push(port);
        }
        Ok(port)
    }

    /// Remove the last input port of an End node.
    pub fn remove_input(&mut self, node: NodeId) -> GraphResult<()> {
        self.expect_kind(node, NodeType::End)?;
        let removed = match &mut self.node_mut(node)?.kind {
            NodeKind::End { inputs } if inputs.len() > MIN_END_INPUTS => inputs.pop(),
            _ => None,
        };
        let port = removed.ok_or_else(|| minimum(NodeType::End, MIN_END_INPUTS, "input"))?;
        self.remove_port(port);
        Ok(())
    }

    // Choice rows

    pub fn add_choice_option(&mut self, node: NodeId, text: &str) -> GraphResult<PortId> {
        self.expect_kind(node, NodeType::Choice)?;
        let port = self.new_port(node, Direction::Output, "");
        if let NodeKind::Choice { choices, .. } = &mut self.node_mut(node)?.kind {
            choices.push(ChoiceRow {
                text: text.to_string(),
                port,
            });
        }
        Ok(port)
    }

    /// Remove a choice row and disconnect its output port.
    pub fn remove_choice_option(&mut self, node: NodeId, index: usize) -> GraphResult<()> {
        self.expect_kind(node, NodeType::Choice)?;
        let choices = self.choices_mut(node)?;
        if choices.len() <= MIN_CHOICES {
            return Err(minimum(NodeType::Choice, MIN_CHOICES, "choices"));
        }
        if index >= choices.len() {
            return Err(BindingError::RowOutOfRange(index).into());
        }
        let row = choices.remove(index);
        self.remove_port(row.port);
        Ok(())
    }

    pub fn set_choice_text(&mut self, node: NodeId, index: usize, text: &str) -> GraphResult<()> {
        self.expect_kind(node, NodeType::Choice)?;
        let row = self
            .choices_mut(node)?
            .get_mut(index)
            .ok_or(BindingError::RowOutOfRange(index))?;
        row.text = text.to_string();
        Ok(())
    }

    // Dialogue

    pub fn set_dialogue_text(&mut self, node: NodeId, value: &str) -> GraphResult<()> {
        self.expect_kind(node, NodeType::Dialogue)?;
        if let NodeKind::Dialogue { text, .. } = &mut self.node_mut(node)?.kind {
            *text = value.to_string();
        }
        Ok(())
    }

    // Event rows

    /// Append an empty row; returns its index.
    pub fn add_event_row(&mut self, node: NodeId) -> GraphResult<usize> {
        let rows = self.rows_mut(node)?;
        rows.push(EventRow::new(rows.len()));
        Ok(rows.len() - 1)
    }

    pub fn remove_event_row(&mut self, node: NodeId, index: usize) -> GraphResult<()> {
        let rows = self.rows_mut(node)?;
        if rows.len() <= MIN_EVENT_ROWS {
            return Err(minimum(NodeType::Event, MIN_EVENT_ROWS, "row"));
        }
        if index >= rows.len() {
            return Err(BindingError::RowOutOfRange(index).into());
        }
        rows.remove(index);
        for (i, row) in rows.iter_mut().enumerate() {
            row.reindex(i);
        }
        Ok(())
    }

    pub fn event_row(&self, node: NodeId, index: usize) -> GraphResult<&EventRow> {
        let rows = self
            .node_or_err(node)?
            .event_rows()
            .ok_or_else(|| self.wrong_kind(node, NodeType::Event))?;
        rows.get(index)
            .ok_or_else(|| BindingError::RowOutOfRange(index).into())
    }

    pub fn assign_object(
        &mut self,
        node: NodeId,
        index: usize,
        object: Option<ObjectId>,
        host: &dyn ObjectHost,
        registry: &TypeRegistry,
    ) -> GraphResult<()> {
        self.row_mut(node, index)?
            .assign_object(object, host, registry);
        Ok(())
    }

    /// Choose a method for a row by dropdown label.
    pub fn choose_method(&mut self, node: NodeId, index: usize, label: &str) -> GraphResult<()> {
        Ok(self.row_mut(node, index)?.choose(label)?)
    }

    pub fn set_parameter(
        &mut self,
        node: NodeId,
        index: usize,
        value: TaggedValue,
    ) -> GraphResult<()> {
        Ok(self.row_mut(node, index)?.set_parameter(value)?)
    }

    /// Invoke every finalized binding of an Event node; returns how many calls went through.
    pub fn fire_event_node(
        &self,
        node: NodeId,
        host: &mut dyn ObjectHost,
        registry: &TypeRegistry,
    ) -> GraphResult<usize> {
        let rows = self
            .node_or_err(node)?
            .event_rows()
            .ok_or_else(|| self.wrong_kind(node, NodeType::Event))?;
        let fired = rows
            .iter()
            .filter_map(EventRow::binding)
            .filter(|binding| binding.invoke(host, registry))
            .count();
        info!("Fired {} of {} event rows on {}", fired, rows.len(), node);
        Ok(fired)
    }

    pub(crate) fn row_mut(&mut self, node: NodeId, index: usize) -> GraphResult<&mut EventRow> {
        self.rows_mut(node)?
            .get_mut(index)
            .ok_or_else(|| BindingError::RowOutOfRange(index).into())
    }

    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn insert_node(
        &mut self,
        position: Position,
        build: impl FnOnce(&mut Self, NodeId) -> NodeKind,
    ) -> NodeId {
        let id = NodeId(self.allocate());
        let kind = build(self, id);
        let node = EditorNode { id, position, kind };
        debug!("Added {} node {}", node.node_type(), id);
        self.nodes.insert(id, node);
        id
    }

    fn new_port(&mut self, node: NodeId, direction: Direction, name: &str) -> PortId {
        let id = PortId(self.allocate());
        let capacity = match direction {
            Direction::Input => Capacity::Multi,
            Direction::Output => Capacity::Single,
        };
        self.ports.insert(
            id,
            Port {
                id,
                node,
                direction,
                capacity,
                name: name.to_string(),
            },
        );
        id
    }

    fn remove_port(&mut self, port: PortId) {
        let dropped = self.disconnect_all(port);
        if dropped > 0 {
            debug!("Dropped {} edges of removed port {}", dropped, port);
        }
        self.ports.shift_remove(&port);
    }

    fn node_or_err(&self, id: NodeId) -> GraphResult<&EditorNode> {
        self.nodes
            .get(&id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))
    }

    fn node_mut(&mut self, id: NodeId) -> GraphResult<&mut EditorNode> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))
    }

    fn port_or_err(&self, id: PortId) -> GraphResult<Port> {
        self.ports
            .get(&id)
            .cloned()
            .ok_or_else(|| GraphError::PortNotFound(id.to_string()))
    }

    fn expect_kind(&self, id: NodeId, expected: NodeType) -> GraphResult<()> {
        if self.node_or_err(id)?.node_type() == expected {
            Ok(())
        } else {
            Err(self.wrong_kind(id, expected))
        }
    }

    fn wrong_kind(&self, id: NodeId, expected: NodeType) -> GraphError {
        GraphError::WrongNodeKind {
            node: id.to_string(),
            expected: expected.to_string(),
            found: self
                .nodes
                .get(&id)
                .map(|n| n.node_type().to_string())
                .unwrap_or_default(),
        }
    }

    fn choices_mut(&mut self, node: NodeId) -> GraphResult<&mut Vec<ChoiceRow>> {
        let error = self.wrong_kind(node, NodeType::Choice);
        match &mut self.node_mut(node)?.kind {
            NodeKind::Choice { choices, .. } => Ok(choices),
            _ => Err(error),
        }
    }

    fn rows_mut(&mut self, node: NodeId) -> GraphResult<&mut Vec<EventRow>> {
        let error = self.wrong_kind(node, NodeType::Event);
        match &mut self.node_mut(node)?.kind {
            NodeKind::Event { rows, .. } => Ok(rows),
            _ => Err(error),
        }
    }
}

fn minimum(kind: NodeType, minimum: usize, what: &str) -> GraphError {
    GraphError::MinimumPorts {
        kind: kind.to_string(),
        minimum,
        what: what.to_string(),
    }
}
