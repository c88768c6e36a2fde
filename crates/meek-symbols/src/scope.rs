//! Lexical scopes.
//!
//! Scopes are created in the order the parser enters them, so `ScopeId`s
//! are already in topological order of lexical enclosure: a child scope
//! always has a strictly greater id than its parent.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScopeId(u32);

impl ScopeId {
    pub const GLOBAL: ScopeId = ScopeId(0);
}

impl std::fmt::Display for ScopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}

/// What a scope was opened for. Mostly informational today; `Loop` is
/// consulted by the resolve pass when checking `break`/`continue`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScopeKind {
    Global,
    Function,
    Block,
    Loop,
    Struct,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scope {
    pub id: ScopeId,
    pub parent: Option<ScopeId>,
    pub kind: ScopeKind,
}

/// Owns the scope arena. Scopes are never removed once created: a scope
/// that has gone out of lexical extent is simply never looked up again,
/// but it stays addressable by id for as long as the compilation lives.
#[derive(Debug, Default)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    pub fn new() -> Self {
        let mut arena = ScopeArena { scopes: Vec::new() };
        let global = arena.push(None, ScopeKind::Global);
        debug_assert_eq!(global, ScopeId::GLOBAL);
        arena
    }

    fn push(&mut self, parent: Option<ScopeId>, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope { id, parent, kind });
        id
    }

    /// Open a new child scope of `parent`.
    pub fn enter(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        debug_assert!(parent.0 < self.scopes.len() as u32);
        self.push(Some(parent), kind)
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub fn parent_of(&self, id: ScopeId) -> Option<ScopeId> {
        self.get(id).parent
    }

    pub fn kind_of(&self, id: ScopeId) -> ScopeKind {
        self.get(id).kind
    }

    /// Is `id` itself, or any of its ancestors, a loop scope, without
    /// crossing into an enclosing function? The breakable-construct
    /// counter `spec.md` §4.4 describes resets at function entry — a
    /// `break`/`continue` lexically inside a function literal or
    /// definition nested in a loop must not see the outer loop
    /// (`spec.md` §8's "breakable counter is 0 inside a plain function
    /// body"). Reaching a `Function` or `Global` scope without having
    /// found a `Loop` ends the walk.
    pub fn is_within_loop(&self, mut id: ScopeId) -> bool {
        loop {
            match self.kind_of(id) {
                ScopeKind::Loop => return true,
                ScopeKind::Function | ScopeKind::Global => return false,
                _ => {}
            }
            match self.parent_of(id) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    /// Iterate `id` and each of its ancestors, innermost first.
    pub fn chain(&self, id: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        let mut next = Some(id);
        std::iter::from_fn(move || {
            let current = next?;
            next = self.parent_of(current);
            Some(current)
        })
    }
}
