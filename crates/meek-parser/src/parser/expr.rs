//! Expression parsing: a left-associative precedence cascade over the
//! operator levels `spec.md` §4.1 lists, then prefix unary operators and
//! postfix member-access/dereference/subscript/call chains.

use super::core::Parser;
use crate::ast::{BinOp, LiteralValue, NodeKind, UnOp};
use crate::resolution::SymbolResolution;
use meek_common::NodeId;
use meek_scanner::{TokenKind, TokenPayload};
use meek_types::TypeId;

impl<'src> Parser<'src> {
    pub fn parse_expr(&mut self) -> NodeId {
        self.parse_or()
    }

    fn parse_or(&mut self) -> NodeId {
        self.parse_left_assoc(Self::parse_and, &[(TokenKind::PipePipe, BinOp::Or)])
    }

    fn parse_and(&mut self) -> NodeId {
        self.parse_left_assoc(Self::parse_hash_or, &[(TokenKind::AmpAmp, BinOp::And)])
    }

    fn parse_hash_or(&mut self) -> NodeId {
        self.parse_left_assoc(Self::parse_hash_xor, &[(TokenKind::HashOr, BinOp::HashOr)])
    }

    fn parse_hash_xor(&mut self) -> NodeId {
        self.parse_left_assoc(Self::parse_hash_and, &[(TokenKind::HashXor, BinOp::HashXor)])
    }

    fn parse_hash_and(&mut self) -> NodeId {
        self.parse_left_assoc(Self::parse_equality, &[(TokenKind::HashAnd, BinOp::HashAnd)])
    }

    fn parse_equality(&mut self) -> NodeId {
        self.parse_left_assoc(
            Self::parse_comparison,
            &[
                (TokenKind::EqualEqual, BinOp::Eq),
                (TokenKind::BangEqual, BinOp::NotEq),
            ],
        )
    }

    fn parse_comparison(&mut self) -> NodeId {
        self.parse_left_assoc(
            Self::parse_additive,
            &[
                (TokenKind::Less, BinOp::Less),
                (TokenKind::LessEqual, BinOp::LessEq),
                (TokenKind::Greater, BinOp::Greater),
                (TokenKind::GreaterEqual, BinOp::GreaterEq),
            ],
        )
    }

    fn parse_additive(&mut self) -> NodeId {
        self.parse_left_assoc(
            Self::parse_multiplicative,
            &[(TokenKind::Plus, BinOp::Add), (TokenKind::Minus, BinOp::Sub)],
        )
    }

    fn parse_multiplicative(&mut self) -> NodeId {
        self.parse_left_assoc(
            Self::parse_unary,
            &[
                (TokenKind::Star, BinOp::Mul),
                (TokenKind::Slash, BinOp::Div),
                (TokenKind::Percent, BinOp::Rem),
            ],
        )
    }

    fn parse_left_assoc(
        &mut self,
        next: fn(&mut Self) -> NodeId,
        ops: &[(TokenKind, BinOp)],
    ) -> NodeId {
        let mut lhs = next(self);
        loop {
            let kind = self.peek();
            let Some(&(_, op)) = ops.iter().find(|(k, _)| *k == kind) else {
                break;
            };
            self.consume();
            let rhs = next(self);
            let span = self.ast.span_of(lhs).merge(self.ast.span_of(rhs));
            lhs = self.ast.alloc(
                span,
                NodeKind::Binop {
                    op,
                    lhs,
                    rhs,
                    eval_type: TypeId::UNRESOLVED,
                },
            );
        }
        lhs
    }

    fn parse_unary(&mut self) -> NodeId {
        let start = self.scanner.peek_token_start_end();
        let op = match self.peek() {
            TokenKind::Plus => UnOp::Plus,
            TokenKind::Minus => UnOp::Neg,
            TokenKind::Bang => UnOp::Not,
            TokenKind::Caret => UnOp::AddrOf,
            _ => return self.parse_postfix(),
        };
        self.consume();
        let operand = self.parse_unary();
        let span = start.merge(self.ast.span_of(operand));
        self.ast.alloc(
            span,
            NodeKind::Unop {
                op,
                operand,
                eval_type: TypeId::UNRESOLVED,
            },
        )
    }

    fn parse_postfix(&mut self) -> NodeId {
        let mut node = self.parse_primary();
        loop {
            match self.peek() {
                TokenKind::Dot => {
                    self.consume();
                    match self.try_consume(TokenKind::Identifier) {
                        Some(tok) => {
                            let member = tok.lexeme(self.text).to_string();
                            let span = self.ast.span_of(node).merge(tok.span);
                            node = self.ast.alloc(
                                span,
                                NodeKind::MemberAccess {
                                    base: node,
                                    member,
                                    eval_type: TypeId::UNRESOLVED,
                                },
                            );
                        }
                        None => {
                            node = self.error_expected(vec![TokenKind::Identifier], vec![node]);
                        }
                    }
                }
                TokenKind::Caret => {
                    let tok = self.consume();
                    let span = self.ast.span_of(node).merge(tok.span);
                    node = self.ast.alloc(
                        span,
                        NodeKind::Deref {
                            operand: node,
                            eval_type: TypeId::UNRESOLVED,
                        },
                    );
                }
                TokenKind::OpenBracket => {
                    self.consume();
                    let index = self.parse_expr();
                    let close = self.expect(TokenKind::CloseBracket, vec![node, index]);
                    let span = match close {
                        Ok(s) => self.ast.span_of(node).merge(s),
                        Err(e) => self.ast.span_of(node).merge(self.ast.span_of(e)),
                    };
                    node = self.ast.alloc(
                        span,
                        NodeKind::ArrayAccess {
                            array: node,
                            index,
                            eval_type: TypeId::UNRESOLVED,
                        },
                    );
                }
                TokenKind::OpenParen => {
                    let open_span = self.scanner.peek_token_start_end();
                    self.consume();
                    let args = self.parse_call_args(open_span);
                    let span = self.ast.span_of(node).merge(self.ast.span_of(args));
                    if matches!(self.ast.get(node).kind, NodeKind::FuncLiteral { .. }) {
                        self.diagnostics.push(meek_common::Diagnostic::error(
                            meek_common::codes::PARSE_INVOKE_FUNC_LITERAL,
                            span,
                            "a function literal cannot be invoked directly at its definition site",
                        ));
                        node = self.ast.alloc(
                            span,
                            NodeKind::InvokeFuncLiteralErr {
                                func_literal: node,
                                args,
                            },
                        );
                    } else {
                        node = self.ast.alloc(
                            span,
                            NodeKind::Call {
                                callee: node,
                                args,
                                eval_type: TypeId::UNRESOLVED,
                            },
                        );
                    }
                }
                _ => break,
            }
        }
        node
    }

    fn parse_call_args(&mut self, open_span: meek_common::Span) -> NodeId {
        let mut args = Vec::new();
        if self.peek() != TokenKind::CloseParen {
            loop {
                args.push(self.parse_expr());
                if self.try_consume(TokenKind::Comma).is_some() {
                    continue;
                }
                if self.peek() == TokenKind::CloseParen {
                    break;
                }
                let recovered = self.try_recover_from_panic(&[TokenKind::Comma, TokenKind::CloseParen]);
                if !recovered {
                    let span = open_span.merge(self.ast.span_of(*args.last().expect("just pushed")));
                    return self
                        .ast
                        .alloc(span, NodeKind::UnexpectedTokenErr { found: self.peek(), partial: args });
                }
                continue;
            }
        }
        match self.expect(TokenKind::CloseParen, args.clone()) {
            Ok(close_span) => self
                .ast
                .alloc(open_span.merge(close_span), NodeKind::ArgList { args }),
            Err(err_node) => err_node,
        }
    }

    fn parse_primary(&mut self) -> NodeId {
        if let Some(err) = self.try_consume_scan_error() {
            return err;
        }
        match self.peek() {
            TokenKind::IntLiteral | TokenKind::FloatLiteral | TokenKind::BoolLiteral | TokenKind::StringLiteral => {
                let tok = self.consume();
                let value = match tok.payload {
                    TokenPayload::Int(n) => LiteralValue::Int(n),
                    TokenPayload::Float(f) => LiteralValue::Float(f),
                    TokenPayload::Bool(b) => LiteralValue::Bool(b),
                    TokenPayload::Str(s) => LiteralValue::Str(s),
                    _ => unreachable!("literal tokens always carry a matching payload"),
                };
                self.ast.alloc(
                    tok.span,
                    NodeKind::Literal {
                        value,
                        eval_type: TypeId::UNRESOLVED,
                    },
                )
            }
            TokenKind::Identifier => {
                let tok = self.consume();
                let name = tok.lexeme(self.text).to_string();
                self.ast.alloc(
                    tok.span,
                    NodeKind::Symbol {
                        name,
                        eval_type: TypeId::UNRESOLVED,
                        resolution: SymbolResolution::Unresolved,
                    },
                )
            }
            TokenKind::OpenParen => {
                self.consume();
                let inner = self.parse_expr();
                match self.expect(TokenKind::CloseParen, vec![inner]) {
                    Ok(close_span) => {
                        self.ast.widen_span(inner, close_span);
                        inner
                    }
                    Err(err_node) => err_node,
                }
            }
            TokenKind::Fn => self.parse_func_literal(),
            _ => self.error_unexpected(vec![]),
        }
    }

    pub(crate) fn parse_func_literal(&mut self) -> NodeId {
        let start = self.scanner.peek_token_start_end();
        self.consume(); // `fn`
        let scope = self.push_scope(meek_symbols::ScopeKind::Function);
        let params = self.parse_param_list();
        let returns = self.parse_return_list();
        // The signature is fully known as soon as the header is parsed,
        // same as a named `fn` definition (`spec.md` §4.1, §4.4).
        let eval_type = self.function_type_from(params, returns);
        let body = self.parse_block(Some(scope));
        self.pop_scope();
        let span = start.merge(self.ast.span_of(body));
        self.ast.alloc(
            span,
            NodeKind::FuncLiteral {
                scope,
                params,
                returns,
                body,
                eval_type,
            },
        )
    }
}
