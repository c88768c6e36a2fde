//! Named-type references that cannot be resolved immediately because
//! they mention a struct that may be declared later in the same file
//! (Meek, like the original `clylang`, does not require forward
//! declarations).

use crate::id::TypeId;
use meek_symbols::ScopeId;

#[derive(Clone, Debug)]
pub enum PendingTypeExpr {
    /// A component that was already interned at parse time (a built-in
    /// base type keyword, or any subtree with no forward-referenced
    /// name in it). Wrapping it here lets a composite expression (an
    /// array of a pending struct, a function signature mixing resolved
    /// and unresolved parts) carry eager and lazy components uniformly.
    Resolved(TypeId),
    /// A bare identifier in type position naming a struct looked up in
    /// `scope`, possibly forward-declared later in the same file.
    Named { name: String, scope: ScopeId },
    Pointer(Box<PendingTypeExpr>),
    Array {
        element: Box<PendingTypeExpr>,
        size: i64,
        span: meek_common::Span,
    },
    Function {
        params: Vec<PendingTypeExpr>,
        ret: Box<PendingTypeExpr>,
    },
}

pub(crate) struct PendingEntry {
    pub slot: TypeId,
    pub expr: PendingTypeExpr,
    pub span: meek_common::Span,
}
