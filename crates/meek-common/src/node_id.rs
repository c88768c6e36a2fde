//! Stable arena indices.
//!
//! The parser's AST, the type table, and the symbol table are all
//! append-only arenas indexed by a small `u32` id rather than owned by
//! pointers or `Rc`s. `NodeId` specifically indexes AST nodes and is
//! shared across crates (the symbol table stores the declaring node of
//! each symbol) to avoid a dependency cycle between `meek-parser` and
//! `meek-symbols`.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const DUMMY: NodeId = NodeId(u32::MAX);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<usize> for NodeId {
    fn from(value: usize) -> Self {
        NodeId(value as u32)
    }
}
