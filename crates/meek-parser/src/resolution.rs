//! The sum type a `Symbol` expression's identity can be in at any point
//! between parsing and the end of the resolve pass, replacing the
//! source's sentinel `TYPID_UnresolvedHasCandidates` with an explicit
//! variant (`SPEC_FULL.md` §9 / `spec.md` §9 design notes).

use meek_common::NodeId;

/// One definition a raw identifier could refer to, before a call site
/// (or the absence of ambiguity) settles it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Candidate {
    Var(NodeId),
    Func(NodeId),
}

impl Candidate {
    pub fn decl_node(self) -> NodeId {
        match self {
            Candidate::Var(id) | Candidate::Func(id) => id,
        }
    }

    pub fn is_func(self) -> bool {
        matches!(self, Candidate::Func(_))
    }
}

/// What a `Symbol` expression node currently refers to. `Candidates`
/// entries are ordered by scope distance: overloads/variables declared
/// in scopes closer to the reference precede those declared farther out
/// (`spec.md` §4.4's "ordered by the scope distance at which each
/// definition would shadow others").
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SymbolResolution {
    /// Not yet looked up (only true before the resolve pass visits this
    /// node).
    Unresolved,
    /// Exactly one candidate: classified immediately as `Var` or `Func`.
    Resolved(Candidate),
    /// More than one candidate; disambiguation deferred to a surrounding
    /// call context.
    Candidates(Vec<Candidate>),
    /// No definition found in any enclosing scope.
    NotFound,
}

impl Default for SymbolResolution {
    fn default() -> Self {
        SymbolResolution::Unresolved
    }
}
