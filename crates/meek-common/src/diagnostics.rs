//! Diagnostics - structured compiler messages.
//!
//! Every diagnostic the compiler can emit (scan, parse, unresolved-type,
//! resolve) is represented as a [`Diagnostic`] value rather than just a
//! user-facing error AST node, so the CLI can render them uniformly and
//! tests can assert on stable codes instead of matching rendered text.

use crate::span::{LineIndex, Span};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Message,
}

/// Stable numeric diagnostic codes, grouped by the phase that reports
/// them. New codes are appended; existing codes are never renumbered
/// once shipped.
pub mod codes {
    // Scan errors (1000s), mirroring `meek_scanner::ScanErrorKind`.
    pub const SCAN_INVALID_CHARACTER: u32 = 1001;
    pub const SCAN_FLOAT_MULTIPLE_DECIMALS: u32 = 1002;
    pub const SCAN_INT_OUT_OF_RANGE: u32 = 1003;
    pub const SCAN_FLOAT_OUT_OF_RANGE: u32 = 1004;
    pub const SCAN_MULTILINE_STRING: u32 = 1005;
    pub const SCAN_UNTERMINATED_STRING: u32 = 1006;
    pub const SCAN_UNTERMINATED_BLOCK_COMMENT: u32 = 1007;

    // Parse errors (2000s).
    pub const PARSE_EXPECTED_TOKEN: u32 = 2001;
    pub const PARSE_UNEXPECTED_TOKEN: u32 = 2002;
    pub const PARSE_CHAINED_ASSIGN: u32 = 2003;
    pub const PARSE_INIT_UNNAMED_VAR: u32 = 2004;
    pub const PARSE_ILLEGAL_DO_STMT: u32 = 2005;
    pub const PARSE_ILLEGAL_TOP_LEVEL_STMT: u32 = 2006;
    pub const PARSE_INVOKE_FUNC_LITERAL: u32 = 2007;

    // Type-resolution errors (3000s).
    pub const TYPE_UNRESOLVED_IDENTIFIER: u32 = 3001;
    pub const TYPE_INVALID_ARRAY_SIZE: u32 = 3002;

    // Resolve-pass errors (4000s).
    pub const RESOLVE_UNRESOLVED_SYMBOL: u32 = 4001;
    pub const RESOLVE_AMBIGUOUS_CALL: u32 = 4002;
    pub const RESOLVE_NO_MATCHING_OVERLOAD: u32 = 4003;
    pub const RESOLVE_TYPE_MISMATCH_ASSIGN: u32 = 4004;
    pub const RESOLVE_TYPE_MISMATCH_BINOP: u32 = 4005;
    pub const RESOLVE_TYPE_MISMATCH_CALL: u32 = 4006;
    pub const RESOLVE_TYPE_MISMATCH_SUBSCRIPT: u32 = 4007;
    pub const RESOLVE_NOT_AN_LVALUE: u32 = 4008;
    pub const RESOLVE_NOT_A_POINTER: u32 = 4009;
    pub const RESOLVE_NOT_AN_ARRAY: u32 = 4010;
    pub const RESOLVE_BREAK_OUTSIDE_LOOP: u32 = 4011;
    pub const RESOLVE_CONTINUE_OUTSIDE_LOOP: u32 = 4012;
    pub const RESOLVE_DUPLICATE_DECLARATION: u32 = 4013;
    pub const RESOLVE_INVALID_RETURN_VALUE: u32 = 4014;
    pub const RESOLVE_CALL_VOID_RESULT: u32 = 4015;
    pub const RESOLVE_AMBIGUOUS_SYMBOL_USE: u32 = 4016;
    pub const RESOLVE_NOT_CALLABLE: u32 = 4017;
    pub const RESOLVE_NOT_A_STRUCT: u32 = 4018;
    pub const RESOLVE_UNKNOWN_FIELD: u32 = 4019;

    // Bytecode emission errors (5000s). These indicate a compiler bug,
    // not a user error — the resolve pass is expected to have already
    // rejected anything that would make codegen itself fail.
    pub const EMIT_INTERNAL_ERROR: u32 = 5001;
}

/// A single compiler diagnostic, ready to be rendered or compared in
/// tests by its stable `code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    pub fn error(code: u32, span: Span, message: impl Into<String>) -> Self {
        Diagnostic {
            category: DiagnosticCategory::Error,
            code,
            span,
            message: message.into(),
        }
    }

    /// Render as `"<file>:<line>:<col>: <message>"`, per the CLI contract.
    pub fn render(&self, file: &str, line_index: &LineIndex) -> String {
        let pos = line_index.line_col(self.span.start);
        format!("{}:{}:{}: {}", file, pos.line, pos.column, self.message)
    }
}

#[cfg(test)]
#[path = "tests/diagnostics.rs"]
mod tests;
