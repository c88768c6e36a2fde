//! The interned type table: structural deduplication for anonymous
//! types, nominal allocation for struct types, and the fixed-point
//! resolver for named type references that may forward-reference a
//! struct declared later in the same file (`spec.md` §3, §4.3).

pub mod base;
pub mod id;
pub mod pending;
pub mod table;
pub mod ty;

pub use base::BaseType;
pub use id::TypeId;
pub use pending::PendingTypeExpr;
pub use table::TypeTable;
pub use ty::Type;

/// The emitter's target address width in bytes (`SPEC_FULL.md` §4.5:
/// "a pointer-sized load immediate is aliased to the 32- or 64-bit
/// variant based on the target pointer width"). This implementation
/// targets 64-bit addresses throughout.
pub const POINTER_SIZE_BYTES: u32 = 8;
