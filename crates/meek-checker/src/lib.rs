//! The resolve pass: the tree-walking second half of semantic analysis
//! (`spec.md` §4.4). Runs after the parser has produced an AST and
//! [`meek_types::TypeTable::try_resolve_all_types`] has settled every
//! named-type reference. Decorates each expression with an evaluated
//! type, resolves symbol references (including function overloads by
//! candidate classification), and enforces the statement-level
//! constraints the parser couldn't check on the fly: l-value targets,
//! assignment and return type agreement, and duplicate-declaration
//! audits for struct fields and function overload sets.
//!
//! Resolve errors never abort the walk (`spec.md` §7): an offending
//! node is decorated with `TypeId::TYPE_ERROR` and the walk continues,
//! so downstream expressions typed in terms of it evaluate to
//! `TypeId::BUBBLE_ERROR` instead of re-reporting the same failure.

mod call_checker;
mod context;
mod expr;
mod stmt;

pub use context::Checker;

use meek_common::{Diagnostic, NodeId};
use meek_parser::Ast;
use meek_symbols::{ScopeArena, SymbolTable};
use meek_types::TypeTable;

/// Run the resolve pass over a fully parsed program and return every
/// diagnostic it raised. `ast` and `types` are mutated in place:
/// expression nodes get their `evalTypeId` (and, for `Symbol` nodes,
/// their final `SymbolResolution`) filled in, and pending candidate
/// types collapse to concrete ones as call sites disambiguate them.
pub fn check_program(
    ast: &mut Ast,
    root: NodeId,
    symbols: &SymbolTable,
    scopes: &ScopeArena,
    types: &mut TypeTable,
) -> Vec<Diagnostic> {
    let mut checker = Checker::new(ast, symbols, scopes, types);
    checker.run(root);
    checker.into_diagnostics()
}
