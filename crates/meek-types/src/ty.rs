//! `Type` — the structural shape a [`TypeId`] resolves to.

use crate::base::BaseType;
use crate::id::TypeId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// A function's implicit return type when no `-> T` clause is given.
    Void,
    Base(BaseType),
    Pointer(TypeId),
    /// A fixed-size array, e.g. `int[10]`. `size` is always > 0; negative
    /// and zero sizes are rejected before a pending entry is registered
    /// (`SPEC_FULL.md` §4.4).
    Array { element: TypeId, size: u32 },
    Function { params: Vec<TypeId>, ret: TypeId },
    /// A user-defined struct. Structs are nominal: two declarations with
    /// identical fields are still distinct types, so this variant is
    /// never structurally interned — each declaration gets its own,
    /// freshly allocated `TypeId`.
    Struct {
        name: String,
        fields: Vec<(String, TypeId)>,
    },

    /// A declaration has no recorded type yet (e.g. a `var` whose
    /// initializer hasn't been typed). Distinct from a pending named-type
    /// reference, which always resolves to something concrete or to
    /// `TypeError`.
    Unresolved,
    /// A symbol expression that names an overloaded function before
    /// call-site disambiguation has picked one candidate.
    UnresolvedHasCandidates,
    /// A type error already reported once; consuming code should not
    /// report it again (propagates silently, like `BubbleError` for AST
    /// nodes).
    Error,
    /// The type-level counterpart of a `BubbleErr` AST node: a value that
    /// came from an already-failed subexpression.
    BubbleError,
}

impl Type {
    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error | Type::BubbleError)
    }

    pub fn as_base(&self) -> Option<BaseType> {
        match self {
            Type::Base(b) => Some(*b),
            _ => None,
        }
    }
}
