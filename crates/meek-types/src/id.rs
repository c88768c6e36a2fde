//! `TypeId` and the small set of reserved ids every `TypeTable` seeds on
//! construction, before any user code is parsed.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const VOID: TypeId = TypeId(0);
    /// Alias target for the `int` keyword — same id as `s32`.
    pub const INT: TypeId = TypeId(1);
    /// Alias target for the `float` keyword — same id as `f32`.
    pub const FLOAT: TypeId = TypeId(2);
    pub const BOOL: TypeId = TypeId(3);
    pub const STRING: TypeId = TypeId(4);
    pub const UNRESOLVED: TypeId = TypeId(5);
    pub const UNRESOLVED_HAS_CANDIDATES: TypeId = TypeId(6);
    pub const TYPE_ERROR: TypeId = TypeId(7);
    pub const BUBBLE_ERROR: TypeId = TypeId(8);

    /// Number of reserved slots seeded before any interned or pending
    /// type is allocated.
    pub(crate) const RESERVED_COUNT: u32 = 9;

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_error(self) -> bool {
        self == TypeId::TYPE_ERROR || self == TypeId::BUBBLE_ERROR
    }
}

impl std::fmt::Display for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "type#{}", self.0)
    }
}
