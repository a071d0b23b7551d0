use std::fmt;

use serde::Serialize;

macro_rules! stable_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub(crate) u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

stable_id!(NodeId, "n");
stable_id!(PortId, "p");
stable_id!(EdgeId, "e");

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Input => Direction::Output,
            Direction::Output => Direction::Input,
        }
    }
}

/// How many edges may attach to a port
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Capacity {
    Single,
    Multi,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Port {
    pub id: PortId,
    pub node: NodeId,
    pub direction: Direction,
    pub capacity: Capacity,
    pub name: String,
}

/// A live connection from an output port to an input port
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub id: EdgeId,
    pub output: PortId,
    pub input: PortId,
}

impl Edge {
    pub fn touches(&self, port: PortId) -> bool {
        self.output == port || self.input == port
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_with_prefix() {
        assert_eq!(NodeId(3).to_string(), "n3");
        assert_eq!(PortId(4).to_string(), "p4");
        assert_eq!(EdgeId(5).to_string(), "e5");
    }

    #[test]
    fn edge_touches_both_ends() {
        let edge = Edge {
            id: EdgeId(1),
            output: PortId(2),
            input: PortId(3),
        };
        assert!(edge.touches(PortId(2)));
        assert!(edge.touches(PortId(3)));
        assert!(!edge.touches(PortId(4)));
        assert_eq!(Direction::Input.opposite(), Direction::Output);
    }
}
