//! Type-expression parsing (`spec.md` §4.1, §4.3) and the statement-level
//! type-vs-expression lookahead used to dispatch variable declarations.

use super::core::Parser;
use meek_common::NodeId;
use meek_scanner::TokenKind;
use meek_types::{BaseType, PendingTypeExpr};

impl<'src> Parser<'src> {
    /// Parse a full type and return its `TypeId`, interning it
    /// immediately when every component is already known, or registering
    /// a pending entry for the fixed-point resolver otherwise
    /// (`spec.md` §4.1's "type capture during parsing").
    pub(crate) fn parse_type(&mut self) -> meek_types::TypeId {
        let start = self.scanner.peek_token_start_end();
        let expr = self.parse_type_expr();
        if let Some(id) = self.types.try_intern_now(&expr, &self.symbols, &self.scopes) {
            id
        } else {
            self.types.register_pending(expr, start)
        }
    }

    /// Collect prefix modifiers (`^` pointer, `[expr]` array size) then a
    /// base (builtin keyword, struct-name identifier, or `fn` signature),
    /// and build a [`PendingTypeExpr`] tree with modifiers applied
    /// innermost-to-outermost.
    fn parse_type_expr(&mut self) -> PendingTypeExpr {
        match self.peek() {
            TokenKind::Caret => {
                self.consume();
                let inner = self.parse_type_expr();
                PendingTypeExpr::Pointer(Box::new(inner))
            }
            TokenKind::OpenBracket => {
                let open = self.scanner.peek_token_start_end();
                self.consume();
                let size_node = self.parse_expr();
                let size = self.const_eval_array_size(size_node);
                let close = self.expect(TokenKind::CloseBracket, vec![size_node]);
                let span = open.merge(match close {
                    Ok(s) => s,
                    Err(e) => self.ast.span_of(e),
                });
                let element = self.parse_type_expr();
                PendingTypeExpr::Array {
                    element: Box::new(element),
                    size,
                    span,
                }
            }
            TokenKind::Fn => self.parse_fn_type_expr(),
            TokenKind::Identifier => {
                let tok = self.consume();
                let name = tok.lexeme(self.text).to_string();
                let scope = self.current_scope();
                match self.types.try_intern_now(
                    &PendingTypeExpr::Named {
                        name: name.clone(),
                        scope,
                    },
                    &self.symbols,
                    &self.scopes,
                ) {
                    Some(id) => PendingTypeExpr::Resolved(id),
                    None => PendingTypeExpr::Named { name, scope },
                }
            }
            kind if kind.is_builtin_type_keyword() => {
                self.consume();
                let base = BaseType::from_token(kind).expect("checked above");
                PendingTypeExpr::Resolved(self.types.intern_base(base))
            }
            _ => {
                let _ = self.error_expected(
                    vec![TokenKind::Identifier, TokenKind::Fn, TokenKind::Caret, TokenKind::OpenBracket],
                    vec![],
                );
                PendingTypeExpr::Resolved(meek_types::TypeId::TYPE_ERROR)
            }
        }
    }

    fn parse_fn_type_expr(&mut self) -> PendingTypeExpr {
        self.consume(); // `fn`
        let _ = self.expect(TokenKind::OpenParen, vec![]);
        let mut params = Vec::new();
        if self.peek() != TokenKind::CloseParen {
            loop {
                params.push(self.parse_type_expr());
                if self.try_consume(TokenKind::Comma).is_some() {
                    continue;
                }
                break;
            }
        }
        let _ = self.expect(TokenKind::CloseParen, vec![]);
        let ret = if self.try_consume(TokenKind::Arrow).is_some() {
            self.parse_type_expr()
        } else {
            PendingTypeExpr::Resolved(meek_types::TypeId::VOID)
        };
        PendingTypeExpr::Function {
            params,
            ret: Box::new(ret),
        }
    }

    /// Array sizes are a restricted constant-expression grammar: an
    /// integer literal, optionally negated. Anything else is a type
    /// error caught here rather than deferred to the checker, since the
    /// resolver needs a concrete `i64` to structurally intern the array
    /// type (`spec.md` §4.1).
    fn const_eval_array_size(&mut self, size_node: NodeId) -> i64 {
        use crate::ast::{LiteralValue, NodeKind, UnOp};
        match &self.ast.get(size_node).kind {
            NodeKind::Literal { value: LiteralValue::Int(n), .. } => *n,
            NodeKind::Unop { op: UnOp::Neg, operand, .. } => {
                match &self.ast.get(*operand).kind {
                    NodeKind::Literal { value: LiteralValue::Int(n), .. } => -*n,
                    _ => -1,
                }
            }
            _ => -1,
        }
    }

    /// LL(2) dispatch: does the current position start a type (hence a
    /// variable declaration) or an expression statement? A plain
    /// identifier is ambiguous with an expr/assignment statement, so the
    /// rule is: a bare identifier only starts a type if immediately
    /// followed by a second identifier (`Foo bar` is a struct-typed
    /// declaration; `foo(...)`, `foo = 1`, `foo;` are not). `^` and `[`
    /// can only ever start a type (there is no prefix-bracket or
    /// standalone address-of-as-statement form in this grammar), and are
    /// resolved with a bounded structural scan past their modifiers
    /// rather than a literal two-token peek, since the modifier chain has
    /// unbounded length.
    pub(crate) fn at_type_start(&mut self) -> bool {
        let mut k = 0usize;
        loop {
            match self.peek_at(k) {
                TokenKind::Caret => {
                    k += 1;
                }
                TokenKind::OpenBracket => {
                    k += 1;
                    let mut depth = 1i32;
                    loop {
                        match self.peek_at(k) {
                            TokenKind::OpenBracket => depth += 1,
                            TokenKind::CloseBracket => {
                                depth -= 1;
                                if depth == 0 {
                                    k += 1;
                                    break;
                                }
                            }
                            TokenKind::Eof => return false,
                            _ => {}
                        }
                        k += 1;
                    }
                }
                _ => break,
            }
        }
        let had_modifier = k > 0;
        let base = self.peek_at(k);
        if base.is_builtin_type_keyword() {
            return true;
        }
        if base == TokenKind::Fn {
            if had_modifier {
                return true;
            }
            return self.fn_signature_leads_to_declaration(k);
        }
        if base == TokenKind::Identifier {
            return had_modifier || self.peek_at(k + 1) == TokenKind::Identifier;
        }
        had_modifier
    }

    /// After an unmodified `fn` at statement start, scan past the
    /// parenthesized parameter list and optional `-> ret` to see whether
    /// a declared name follows (`fn(int) -> int cb;`) rather than a
    /// function-literal body (`fn(int) -> int { ... }`), which would make
    /// this an expression statement instead.
    fn fn_signature_leads_to_declaration(&mut self, fn_index: usize) -> bool {
        let mut j = fn_index + 1;
        if self.peek_at(j) != TokenKind::OpenParen {
            return false;
        }
        j += 1;
        let mut depth = 1i32;
        loop {
            match self.peek_at(j) {
                TokenKind::OpenParen => depth += 1,
                TokenKind::CloseParen => {
                    depth -= 1;
                    if depth == 0 {
                        j += 1;
                        break;
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
            j += 1;
        }
        if self.peek_at(j) == TokenKind::Arrow {
            j += 1;
            // Skip one base-type token of the return type; return types
            // in this position are never themselves `fn`-signatures with
            // their own trailing name, so one token suffices.
            j += 1;
        }
        self.peek_at(j) == TokenKind::Identifier
    }
}
