//! The recursive-descent parser: turns a token stream into the AST
//! arena, seeding scopes and symbols as it goes and leaving named-type
//! references that forward-reference a struct as pending entries for
//! `meek_types::TypeTable::try_resolve_all_types` (`spec.md` §4.1, §4.3).

pub mod arena;
pub mod ast;
mod parser;
pub mod resolution;

pub use arena::Ast;
pub use ast::{
    AssignOp, BinOp, FieldDecl, LiteralValue, Node, NodeCategory, NodeKind, ParamDecl, UnOp,
};
pub use parser::{ParseOutcome, Parser, StmtMode};
pub use resolution::{Candidate, SymbolResolution};

#[cfg(test)]
#[path = "tests/parser.rs"]
mod tests;
