//! The AST arena: an append-only `Vec<Node>` addressed by [`NodeId`].
//! Mirrors the append-only discipline `meek_types::TypeTable` and
//! `meek_symbols::ScopeArena` already use in this workspace — nodes are
//! never freed, only decorated in place by later passes.

use crate::ast::{Node, NodeKind};
use meek_common::{NodeId, Span};

#[derive(Debug, Default)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    pub fn new() -> Self {
        Ast { nodes: Vec::new() }
    }

    pub fn alloc(&mut self, span: Span, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { id, span, kind });
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Merge `span` into node `id`'s recorded span (property 1 in
    /// `spec.md` §8: a node's span contains the union of its children's
    /// spans).
    pub fn widen_span(&mut self, id: NodeId, span: Span) {
        let node = self.get_mut(id);
        node.span = node.span.merge(span);
    }

    /// Canonicalize every node's stored `TypeId` fields through
    /// `types`, once `TypeTable::try_resolve_all_types` has finished.
    /// Must run before the resolve pass, which compares `TypeId`s
    /// directly.
    pub fn canonicalize_types(&mut self, types: &meek_types::TypeTable) {
        for node in self.nodes.iter_mut() {
            node.canonicalize_types(types);
        }
    }

    pub fn span_of(&self, id: NodeId) -> Span {
        self.get(id).span
    }
}
