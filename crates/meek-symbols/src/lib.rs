//! Scope and symbol tracking shared by the parser (which seeds
//! declarations as it parses) and the resolve pass (which looks names
//! back up and runs overload resolution).

pub mod scope;
pub mod symbol;
pub mod table;

pub use scope::{Scope, ScopeArena, ScopeId, ScopeKind};
pub use symbol::{ScopedIdentifier, SymbolInfo};
pub use table::SymbolTable;

#[cfg(test)]
#[path = "tests/table.rs"]
mod tests;
