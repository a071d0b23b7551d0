use serde::Serialize;

use super::event_row::EventRow;
use super::port::{Direction, NodeId, PortId};
use crate::asset::{NodeType, Position};

/// One option of a Choice node and the output port it leads through
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChoiceRow {
    pub text: String,
    pub port: PortId,
}

/// Per-kind editable state and the ports the node owns, in declared order
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    Start {
        output: PortId,
    },
    End {
        inputs: Vec<PortId>,
    },
    Dialogue {
        input: PortId,
        output: PortId,
        text: String,
    },
    Choice {
        input: PortId,
        choices: Vec<ChoiceRow>,
    },
    Event {
        input: PortId,
        output: PortId,
        rows: Vec<EventRow>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EditorNode {
    pub id: NodeId,
    pub position: Position,
    pub kind: NodeKind,
}

impl EditorNode {
    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Start { .. } => NodeType::Start,
            NodeKind::End { .. } => NodeType::End,
            NodeKind::Dialogue { .. } => NodeType::Dialogue,
            NodeKind::Choice { .. } => NodeType::Choice,
            NodeKind::Event { .. } => NodeType::Event,
        }
    }

    /// Ports facing `direction`. Choice outputs follow row order.
    pub fn ports(&self, direction: Direction) -> Vec<PortId> {
        match (&self.kind, direction) {
            (NodeKind::Start { .. }, Direction::Input) => vec![],
            (NodeKind::Start { output }, Direction::Output) => vec![*output],
            (NodeKind::End { inputs }, Direction::Input) => inputs.clone(),
            (NodeKind::End { .. }, Direction::Output) => vec![],
            (NodeKind::Dialogue { input, .. }, Direction::Input)
            | (NodeKind::Choice { input, .. }, Direction::Input)
            | (NodeKind::Event { input, .. }, Direction::Input) => vec![*input],
            (NodeKind::Dialogue { output, .. }, Direction::Output)
            | (NodeKind::Event { output, .. }, Direction::Output) => vec![*output],
            (NodeKind::Choice { choices, .. }, Direction::Output) => {
                choices.iter().map(|c| c.port).collect()
            }
        }
    }

    /// Every port of the node, inputs first.
    pub fn all_ports(&self) -> Vec<PortId> {
        let mut ports = self.ports(Direction::Input);
        ports.extend(self.ports(Direction::Output));
        ports
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Dialogue { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn choices(&self) -> Option<&[ChoiceRow]> {
        match &self.kind {
            NodeKind::Choice { choices, .. } => Some(choices),
            _ => None,
        }
    }

    pub fn event_rows(&self) -> Option<&[EventRow]> {
        match &self.kind {
            NodeKind::Event { rows, .. } => Some(rows),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_outputs_follow_row_order() {
        let node = EditorNode {
            id: NodeId(1),
            position: Position::default(),
            kind: NodeKind::Choice {
                input: PortId(2),
                choices: vec![
                    ChoiceRow {
                        text: "A".to_string(),
                        port: PortId(5),
                    },
                    ChoiceRow {
                        text: "B".to_string(),
                        port: PortId(3),
                    },
                ],
            },
        };
        assert_eq!(node.node_type(), NodeType::Choice);
        assert_eq!(node.ports(Direction::Output), vec![PortId(5), PortId(3)]);
        assert_eq!(node.all_ports(), vec![PortId(2), PortId(5), PortId(3)]);
        assert_eq!(node.text(), None);
    }

    #[test]
    fn start_has_no_inputs() {
        let node = EditorNode {
            id: NodeId(1),
            position: Position::default(),
            kind: NodeKind::Start { output: PortId(2) },
        };
        assert!(node.ports(Direction::Input).is_empty());
        assert_eq!(node.ports(Direction::Output), vec![PortId(2)]);
    }
}
