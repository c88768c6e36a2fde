//! Symbol table entries and the key that addresses them.

use crate::scope::ScopeId;
use meek_common::NodeId;

/// A symbol table key: a lexeme plus the scope it was declared in.
/// Two identically-named symbols in different scopes are distinct
/// entries; shadowing is just two entries with the same `name` and
/// different `scope`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScopedIdentifier {
    pub name: String,
    pub scope: ScopeId,
}

impl ScopedIdentifier {
    pub fn new(name: impl Into<String>, scope: ScopeId) -> Self {
        ScopedIdentifier {
            name: name.into(),
            scope,
        }
    }
}

/// What a name in scope refers to.
///
/// `Nil` is a deliberate negative entry: the resolve pass inserts it for
/// a name it looked up and confirmed does not exist in an enclosing
/// scope either, so repeat lookups of the same dead name short-circuit
/// instead of re-walking the whole scope chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SymbolInfo {
    Var { decl: NodeId },
    Func { defn: NodeId },
    Struct { defn: NodeId },
    Nil,
}

impl SymbolInfo {
    pub fn is_var(&self) -> bool {
        matches!(self, SymbolInfo::Var { .. })
    }

    pub fn is_func(&self) -> bool {
        matches!(self, SymbolInfo::Func { .. })
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, SymbolInfo::Struct { .. })
    }

    pub fn decl_node(&self) -> Option<NodeId> {
        match *self {
            SymbolInfo::Var { decl } => Some(decl),
            SymbolInfo::Func { defn } => Some(defn),
            SymbolInfo::Struct { defn } => Some(defn),
            SymbolInfo::Nil => None,
        }
    }
}
