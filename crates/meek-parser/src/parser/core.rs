//! The `Parser` struct: owns the scanner and every arena the front end
//! fills in (AST, scopes, symbols, types), plus the shared helpers used
//! by every parsing function (`spec.md` §4.1): error-node construction
//! and bracket-aware panic-mode recovery.

use crate::arena::Ast;
use meek_common::{Diagnostic, NodeId, Span, codes};
use meek_scanner::{Scanner, TokenKind};
use meek_symbols::{ScopeArena, ScopeId, ScopeKind, SymbolTable};
use meek_types::TypeTable;
use rustc_hash::FxHashMap;

/// Which statement forms are legal at the current parse position
/// (`spec.md` §4.1).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StmtMode {
    /// Only struct/fn definitions and variable declarations are legal.
    TopLevel,
    /// Any statement form is legal.
    Stmt,
    /// After a bare `do`: only a single non-block, non-declaration
    /// statement is legal.
    DoStmt,
}

/// The result of [`Parser::parse_program`]: the root node plus whether
/// the parse was clean (no non-bubble error nodes recorded).
#[derive(Debug)]
pub struct ParseOutcome {
    pub root: NodeId,
    pub success: bool,
}

pub struct Parser<'src> {
    pub(crate) scanner: Scanner<'src>,
    pub(crate) text: &'src str,
    pub ast: Ast,
    pub symbols: SymbolTable,
    pub scopes: ScopeArena,
    pub types: TypeTable,
    pub diagnostics: Vec<Diagnostic>,
    pub(crate) scope_stack: Vec<ScopeId>,
    pub(crate) var_seq: FxHashMap<ScopeId, u32>,
}

impl<'src> Parser<'src> {
    pub fn new(text: &'src str) -> Self {
        let scopes = ScopeArena::new();
        let builtin_scope = ScopeId::GLOBAL;
        Parser {
            scanner: Scanner::new(text),
            text,
            ast: Ast::new(),
            symbols: SymbolTable::new(),
            scopes,
            types: TypeTable::new(),
            diagnostics: Vec::new(),
            scope_stack: vec![builtin_scope],
            var_seq: FxHashMap::default(),
        }
    }

    pub fn current_scope(&self) -> ScopeId {
        *self
            .scope_stack
            .last()
            .expect("scope stack always has at least the builtin scope")
    }

    pub(crate) fn push_scope(&mut self, kind: ScopeKind) -> ScopeId {
        let parent = self.current_scope();
        let id = self.scopes.enter(parent, kind);
        self.scope_stack.push(id);
        id
    }

    pub(crate) fn pop_scope(&mut self) {
        self.scope_stack.pop();
    }

    /// Frame-offset assignment order within a scope, recorded on each
    /// `VarDecl` node as its `varSeqId` (`spec.md` §4.4, consumed by the
    /// bytecode emitter's addressing model in §4.5).
    pub(crate) fn next_var_seq(&mut self, scope: ScopeId) -> u32 {
        let counter = self.var_seq.entry(scope).or_insert(0);
        let seq = *counter;
        *counter += 1;
        seq
    }

    // ---- Token helpers ----

    pub(crate) fn peek(&mut self) -> TokenKind {
        self.scanner.peek_token(0)
    }

    pub(crate) fn peek_at(&mut self, lookahead: usize) -> TokenKind {
        self.scanner.peek_token(lookahead)
    }

    pub(crate) fn consume(&mut self) -> meek_scanner::Token {
        self.scanner.consume_token()
    }

    pub(crate) fn try_consume(&mut self, kind: TokenKind) -> Option<meek_scanner::Token> {
        self.scanner.try_consume_token(kind)
    }

    /// `expect(kind)` — consume and return the token's span, or build an
    /// `ExpectedTokenErr` node (recording a diagnostic) carrying
    /// `partial` as its already-parsed children.
    pub(crate) fn expect(&mut self, kind: TokenKind, partial: Vec<NodeId>) -> Result<Span, NodeId> {
        if let Some(tok) = self.scanner.try_consume_token(kind) {
            return Ok(tok.span);
        }
        Err(self.error_expected(vec![kind], partial))
    }

    pub(crate) fn error_expected(&mut self, expected: Vec<TokenKind>, partial: Vec<NodeId>) -> NodeId {
        let found = self.peek();
        let mut span = self.scanner.peek_token_start_end();
        for p in &partial {
            span = span.merge(self.ast.span_of(*p));
        }
        self.diagnostics.push(Diagnostic::error(
            codes::PARSE_EXPECTED_TOKEN,
            span,
            format!("expected one of {expected:?}, found {found:?}"),
        ));
        self.ast.alloc(span, crate::ast::NodeKind::ExpectedTokenErr {
            expected,
            found,
            partial,
        })
    }

    pub(crate) fn error_unexpected(&mut self, partial: Vec<NodeId>) -> NodeId {
        let found = self.peek();
        let mut span = self.scanner.peek_token_start_end();
        for p in &partial {
            span = span.merge(self.ast.span_of(*p));
        }
        self.diagnostics.push(Diagnostic::error(
            codes::PARSE_UNEXPECTED_TOKEN,
            span,
            format!("unexpected token {found:?}"),
        ));
        self.ast
            .alloc(span, crate::ast::NodeKind::UnexpectedTokenErr { found, partial })
    }

    /// Wraps `inner` in a `BubbleErr`: propagates the failure upward
    /// without a new user-facing diagnostic (`spec.md` §3, §7).
    pub(crate) fn bubble(&mut self, inner: NodeId) -> NodeId {
        let span = self.ast.span_of(inner);
        self.ast.alloc(span, crate::ast::NodeKind::BubbleErr { inner })
    }

    /// If the next token is a scanner-reported `Error` token, consume it
    /// and build a `ScanErr` node. Called at primary-expression and
    /// statement-dispatch boundaries, the only points an error token can
    /// surface (`spec.md` §6, §7).
    pub(crate) fn try_consume_scan_error(&mut self) -> Option<NodeId> {
        if self.peek() != TokenKind::Error {
            return None;
        }
        let tok = self.consume();
        let meek_scanner::TokenPayload::ScanError(kind) = tok.payload else {
            unreachable!("Error-kind tokens always carry a ScanErrorKind payload")
        };
        self.diagnostics.push(Diagnostic::error(
            kind.diagnostic_code(),
            tok.span,
            "scan error",
        ));
        Some(self.ast.alloc(tok.span, crate::ast::NodeKind::ScanErr { kind }))
    }

    /// Bracket-aware panic-mode recovery (`spec.md` §4.1). Consumes
    /// tokens until a depth-zero member of `recovery_set` is seen (which
    /// is then also consumed, and the function reports success), a
    /// depth-zero `;` is seen (consumed; reports failure so the caller
    /// can decide whether to retry), or end-of-input is reached
    /// (reports failure without consuming).
    pub(crate) fn try_recover_from_panic(&mut self, recovery_set: &[TokenKind]) -> bool {
        let mut paren = 0u32;
        let mut brace = 0u32;
        let mut bracket = 0u32;
        loop {
            let kind = self.peek();
            if kind == TokenKind::Eof {
                return false;
            }
            let depth_zero = paren == 0 && brace == 0 && bracket == 0;
            if depth_zero && kind == TokenKind::Semicolon {
                self.consume();
                return false;
            }
            if depth_zero && recovery_set.contains(&kind) {
                self.consume();
                return true;
            }
            match kind {
                TokenKind::OpenParen => paren += 1,
                TokenKind::CloseParen => paren = paren.saturating_sub(1),
                TokenKind::OpenBrace => brace += 1,
                TokenKind::CloseBrace => brace = brace.saturating_sub(1),
                TokenKind::OpenBracket => bracket += 1,
                TokenKind::CloseBracket => bracket = bracket.saturating_sub(1),
                _ => {}
            }
            self.consume();
        }
    }
}
