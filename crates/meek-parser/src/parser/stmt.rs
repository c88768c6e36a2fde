//! Statement parsing, struct/function definitions, and the
//! `parseProgram` entry point (`spec.md` §4.1, §4.4).

use super::core::{ParseOutcome, Parser, StmtMode};
use crate::ast::{AssignOp, FieldDecl, NodeKind, ParamDecl};
use meek_common::{Diagnostic, codes};
use meek_scanner::TokenKind;
use meek_symbols::{ScopeKind, SymbolInfo};
use meek_types::TypeId;

impl<'src> Parser<'src> {
    /// Pushes the `Global` scope (a child of the `Builtin` scope already
    /// active in a fresh `Parser`), then repeatedly parses top-level
    /// statements until end-of-input (`spec.md` §4.1).
    pub fn parse_program(&mut self) -> ParseOutcome {
        let scope = self.push_scope(ScopeKind::Global);
        let start = self.scanner.peek_token_start_end();
        let mut stmts = Vec::new();
        while self.peek() != TokenKind::Eof {
            let before = self.scanner.peek_token_start_end();
            stmts.push(self.parse_stmt(StmtMode::TopLevel));
            if self.scanner.peek_token_start_end() == before {
                // No production consumed a token; force progress so a
                // single malformed byte can't hang the parser.
                self.consume();
            }
        }
        let span = stmts
            .iter()
            .fold(start, |acc, id| acc.merge(self.ast.span_of(*id)));
        let root = self.ast.alloc(span, NodeKind::Program { stmts: stmts.clone(), scope });
        self.pop_scope();
        let success = !stmts
            .iter()
            .any(|id| self.ast.get(*id).kind.is_error() && !self.ast.get(*id).kind.is_bubble());
        ParseOutcome { root, success }
    }

    pub fn parse_stmt(&mut self, mode: StmtMode) -> meek_common::NodeId {
        if let Some(err) = self.try_consume_scan_error() {
            return err;
        }
        let node = match self.peek() {
            TokenKind::OpenBrace => {
                let scope = self.push_scope(ScopeKind::Block);
                let node = self.parse_block(Some(scope));
                debug_assert_eq!(self.current_scope(), scope);
                self.pop_scope();
                node
            }
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::Do => self.parse_do_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Break => self.parse_break_stmt(),
            TokenKind::Continue => self.parse_continue_stmt(),
            TokenKind::Struct => self.parse_struct_defn(),
            TokenKind::Fn if self.peek_at(1) == TokenKind::Identifier => self.parse_fn_defn(),
            _ if self.at_type_start() => self.parse_var_decl(),
            _ => self.parse_assign_or_expr_stmt(),
        };

        match mode {
            StmtMode::TopLevel => self.enforce_top_level(node),
            StmtMode::DoStmt => self.enforce_do_stmt(node),
            StmtMode::Stmt => node,
        }
    }

    fn enforce_top_level(&mut self, node: meek_common::NodeId) -> meek_common::NodeId {
        let legal = matches!(
            self.ast.get(node).kind,
            NodeKind::StructDefn { .. } | NodeKind::FuncDefn { .. } | NodeKind::VarDecl { .. }
        ) || self.ast.get(node).kind.is_error();
        if legal {
            return node;
        }
        let span = self.ast.span_of(node);
        self.diagnostics.push(Diagnostic::error(
            codes::PARSE_ILLEGAL_TOP_LEVEL_STMT,
            span,
            "only struct/fn definitions and variable declarations are legal at top level",
        ));
        self.ast.alloc(span, NodeKind::IllegalTopLevelStmtErr { inner: node })
    }

    fn enforce_do_stmt(&mut self, node: meek_common::NodeId) -> meek_common::NodeId {
        let illegal = matches!(
            self.ast.get(node).kind,
            NodeKind::Block { .. } | NodeKind::VarDecl { .. } | NodeKind::StructDefn { .. } | NodeKind::FuncDefn { .. }
        );
        if !illegal {
            return node;
        }
        let span = self.ast.span_of(node);
        self.diagnostics.push(Diagnostic::error(
            codes::PARSE_ILLEGAL_DO_STMT,
            span,
            "a bare `do` may only be followed by a single non-block, non-declaration statement",
        ));
        self.ast.alloc(span, NodeKind::IllegalDoStmtErr { inner: node })
    }

    /// Parses a `{ ... }` block. Every call site has already pushed the
    /// scope the block's contents execute under — a function/loop header
    /// scope shared with its body, or a fresh `Block` scope for a
    /// standalone `{ }` statement — and passes it through as `scope` so
    /// the resolve pass can recover it from the node alone. Re-pushing an
    /// already-active scope when visiting a function/loop body is
    /// harmless: the same id nets out after a balanced push/pop
    /// (`spec.md` §4.4).
    pub(crate) fn parse_block(&mut self, scope: Option<meek_symbols::ScopeId>) -> meek_common::NodeId {
        let open = self.expect(TokenKind::OpenBrace, vec![]);
        let own_scope = scope;
        let mut stmts = Vec::new();
        loop {
            match self.peek() {
                TokenKind::CloseBrace | TokenKind::Eof => break,
                _ => {
                    let before = self.scanner.peek_token_start_end();
                    stmts.push(self.parse_stmt(StmtMode::Stmt));
                    if self.scanner.peek_token_start_end() == before {
                        self.try_recover_from_panic(&[TokenKind::Semicolon, TokenKind::CloseBrace]);
                    }
                }
            }
        }
        let close = self.expect(TokenKind::CloseBrace, stmts.clone());
        let start = match open {
            Ok(s) => s,
            Err(e) => self.ast.span_of(e),
        };
        let end = match close {
            Ok(s) => s,
            Err(e) => self.ast.span_of(e),
        };
        let span = start.merge(end);
        self.ast.alloc(span, NodeKind::Block { stmts, scope: own_scope })
    }

    fn parse_if_stmt(&mut self) -> meek_common::NodeId {
        let start = self.scanner.peek_token_start_end();
        self.consume(); // `if`
        let cond = self.parse_expr();
        let then_branch = self.parse_stmt(StmtMode::Stmt);
        let else_branch = if self.try_consume(TokenKind::Else).is_some() {
            Some(self.parse_stmt(StmtMode::Stmt))
        } else {
            None
        };
        let mut span = start.merge(self.ast.span_of(then_branch));
        if let Some(e) = else_branch {
            span = span.merge(self.ast.span_of(e));
        }
        self.ast.alloc(
            span,
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            },
        )
    }

    fn parse_while_stmt(&mut self) -> meek_common::NodeId {
        let start = self.scanner.peek_token_start_end();
        self.consume(); // `while`
        let cond = self.parse_expr();
        let loop_scope = self.push_scope(ScopeKind::Loop);
        let body = self.parse_stmt(StmtMode::Stmt);
        self.pop_scope();
        let span = start.merge(self.ast.span_of(body));
        self.ast.alloc(span, NodeKind::While { cond, body, loop_scope })
    }

    /// `do <stmt>;` has no surface-level loop condition of its own in
    /// this grammar — `do` simply restricts what single statement may
    /// follow it, matching the `DoStmt` mode enforcement rather than
    /// introducing `do ... while`. It is not itself a breakable
    /// construct (`spec.md` §4.1/§4.5), so unlike `parse_while_stmt` it
    /// pushes no `ScopeKind::Loop` — only an enclosing `while` makes
    /// `break`/`continue` legal.
    fn parse_do_stmt(&mut self) -> meek_common::NodeId {
        self.consume(); // `do`
        self.parse_stmt(StmtMode::DoStmt)
    }

    fn parse_return_stmt(&mut self) -> meek_common::NodeId {
        let start = self.scanner.peek_token_start_end();
        self.consume(); // `return`
        let value = if self.peek() == TokenKind::Semicolon {
            None
        } else {
            Some(self.parse_expr())
        };
        let partial = value.map(|v| vec![v]).unwrap_or_default();
        let end = match self.expect(TokenKind::Semicolon, partial) {
            Ok(s) => s,
            Err(e) => self.ast.span_of(e),
        };
        self.ast.alloc(start.merge(end), NodeKind::Return { value })
    }

    fn parse_break_stmt(&mut self) -> meek_common::NodeId {
        let start = self.scanner.peek_token_start_end();
        self.consume(); // `break`
        if !self.scopes.is_within_loop(self.current_scope()) {
            self.diagnostics.push(Diagnostic::error(
                codes::RESOLVE_BREAK_OUTSIDE_LOOP,
                start,
                "`break` outside a loop",
            ));
        }
        let end = match self.expect(TokenKind::Semicolon, vec![]) {
            Ok(s) => s,
            Err(e) => self.ast.span_of(e),
        };
        self.ast.alloc(start.merge(end), NodeKind::Break)
    }

    fn parse_continue_stmt(&mut self) -> meek_common::NodeId {
        let start = self.scanner.peek_token_start_end();
        self.consume(); // `continue`
        if !self.scopes.is_within_loop(self.current_scope()) {
            self.diagnostics.push(Diagnostic::error(
                codes::RESOLVE_CONTINUE_OUTSIDE_LOOP,
                start,
                "`continue` outside a loop",
            ));
        }
        let end = match self.expect(TokenKind::Semicolon, vec![]) {
            Ok(s) => s,
            Err(e) => self.ast.span_of(e),
        };
        self.ast.alloc(start.merge(end), NodeKind::Continue)
    }

    fn parse_var_decl(&mut self) -> meek_common::NodeId {
        let start = self.scanner.peek_token_start_end();
        let ty = self.parse_type();
        let Some(name_tok) = self.try_consume(TokenKind::Identifier) else {
            let span = start.merge(self.scanner.peek_token_start_end());
            self.diagnostics.push(Diagnostic::error(
                codes::PARSE_INIT_UNNAMED_VAR,
                span,
                "variable declaration is missing a name",
            ));
            let err = self
                .ast
                .alloc(span, NodeKind::InitUnnamedVarErr { ty, partial: None });
            self.try_recover_from_panic(&[TokenKind::Semicolon]);
            return err;
        };
        let name = name_tok.lexeme(self.text).to_string();

        let init = if self.try_consume(TokenKind::Equal).is_some() {
            Some(self.parse_expr())
        } else {
            None
        };
        let partial = init.map(|n| vec![n]).unwrap_or_default();

        let scope = self.current_scope();
        let var_seq_id = self.next_var_seq(scope);

        let node_id = match self.expect(TokenKind::Semicolon, partial) {
            Ok(semi_span) => {
                let span = start.merge(semi_span);
                self.ast.alloc(
                    span,
                    NodeKind::VarDecl {
                        name: name.clone(),
                        ty,
                        init,
                        var_seq_id,
                    },
                )
            }
            Err(err_node) => {
                self.try_recover_from_panic(&[TokenKind::Semicolon]);
                let span = start.merge(self.ast.span_of(err_node));
                let inner = self.ast.alloc(
                    span,
                    NodeKind::VarDecl {
                        name: name.clone(),
                        ty,
                        init,
                        var_seq_id,
                    },
                );
                self.bubble(inner)
            }
        };

        let decl_span = self.ast.span_of(node_id);
        if let Err(diag) = self
            .symbols
            .declare(scope, &name, SymbolInfo::Var { decl: node_id }, decl_span)
        {
            self.diagnostics.push(diag);
        }
        node_id
    }

    fn parse_struct_defn(&mut self) -> meek_common::NodeId {
        let start = self.scanner.peek_token_start_end();
        self.consume(); // `struct`
        let outer_scope = self.current_scope();
        let Some(name_tok) = self.try_consume(TokenKind::Identifier) else {
            let err = self.error_expected(vec![TokenKind::Identifier], vec![]);
            self.try_recover_from_panic(&[TokenKind::Semicolon, TokenKind::CloseBrace]);
            return err;
        };
        let name = name_tok.lexeme(self.text).to_string();

        // Allocate the struct's nominal `TypeId` before its body is
        // parsed, so a self-referential field (`^Name next;`) resolves
        // once the fixed-point resolver retries it.
        let defined_type = self.types.declare_struct(name.clone(), outer_scope);

        let scope = self.push_scope(ScopeKind::Struct);
        let open = self.expect(TokenKind::OpenBrace, vec![]);
        let mut fields = Vec::new();
        loop {
            match self.peek() {
                TokenKind::CloseBrace | TokenKind::Eof => break,
                _ => {
                    let field_start = self.scanner.peek_token_start_end();
                    let field_ty = self.parse_type();
                    match self.try_consume(TokenKind::Identifier) {
                        Some(field_name_tok) => {
                            let field_name = field_name_tok.lexeme(self.text).to_string();
                            let semi = self.expect(TokenKind::Semicolon, vec![]);
                            let field_span = match semi {
                                Ok(s) => field_start.merge(s),
                                Err(e) => field_start.merge(self.ast.span_of(e)),
                            };
                            fields.push(FieldDecl {
                                name: field_name,
                                ty: field_ty,
                                span: field_span,
                            });
                        }
                        None => {
                            self.error_expected(vec![TokenKind::Identifier], vec![]);
                            self.try_recover_from_panic(&[TokenKind::Semicolon, TokenKind::CloseBrace]);
                        }
                    }
                }
            }
        }
        let close = self.expect(TokenKind::CloseBrace, vec![]);
        self.pop_scope();

        self.types.set_struct_fields(
            defined_type,
            fields.iter().map(|f| (f.name.clone(), f.ty)).collect(),
        );

        let span = start
            .merge(open.unwrap_or(start))
            .merge(close.unwrap_or(start));
        let node = self.ast.alloc(
            span,
            NodeKind::StructDefn {
                name: name.clone(),
                scope,
                fields,
                defined_type,
            },
        );
        if let Err(diag) = self
            .symbols
            .declare(outer_scope, &name, SymbolInfo::Struct { defn: node }, span)
        {
            self.diagnostics.push(diag);
        }
        node
    }

    fn parse_fn_defn(&mut self) -> meek_common::NodeId {
        let start = self.scanner.peek_token_start_end();
        self.consume(); // `fn`
        let outer_scope = self.current_scope();
        let name_tok = self
            .try_consume(TokenKind::Identifier)
            .expect("caller only dispatches here after confirming an Identifier follows `fn`");
        let name = name_tok.lexeme(self.text).to_string();

        let scope = self.push_scope(ScopeKind::Function);
        let params = self.parse_param_list();
        let returns = self.parse_return_list();
        let defined_type = self.function_type_from(params, returns);
        let body = self.parse_block(Some(scope));
        self.pop_scope();

        let span = start.merge(self.ast.span_of(body));
        let node = self.ast.alloc(
            span,
            NodeKind::FuncDefn {
                name: name.clone(),
                scope,
                params,
                returns,
                body,
                defined_type,
            },
        );
        if let Err(diag) = self
            .symbols
            .declare(outer_scope, &name, SymbolInfo::Func { defn: node }, span)
        {
            self.diagnostics.push(diag);
        }
        node
    }

    pub(super) fn function_type_from(&mut self, params: meek_common::NodeId, returns: meek_common::NodeId) -> TypeId {
        let param_types: Vec<TypeId> = match &self.ast.get(params).kind {
            NodeKind::ParamList { params } => params.iter().map(|p| p.ty).collect(),
            _ => Vec::new(),
        };
        let ret_type = match &self.ast.get(returns).kind {
            NodeKind::ReturnList { types } if types.len() == 1 => types[0].0,
            NodeKind::ReturnList { .. } => TypeId::VOID,
            _ => TypeId::VOID,
        };
        self.types.intern(meek_types::Type::Function {
            params: param_types,
            ret: ret_type,
        })
    }

    pub(crate) fn parse_param_list(&mut self) -> meek_common::NodeId {
        let start = self.scanner.peek_token_start_end();
        let open = self.expect(TokenKind::OpenParen, vec![]);
        let mut params = Vec::new();
        if self.peek() != TokenKind::CloseParen {
            loop {
                let p_start = self.scanner.peek_token_start_end();
                let ty = self.parse_type();
                match self.try_consume(TokenKind::Identifier) {
                    Some(tok) => {
                        let name = tok.lexeme(self.text).to_string();
                        let span = p_start.merge(tok.span);
                        let scope = self.current_scope();
                        params.push(ParamDecl { name: name.clone(), ty, span });
                        // A parameter is a declaration in the function's
                        // scope, visible for the whole body.
                        let node = self.ast.alloc(
                            span,
                            NodeKind::VarDecl {
                                name: name.clone(),
                                ty,
                                init: None,
                                var_seq_id: self.next_var_seq(scope),
                            },
                        );
                        if let Err(diag) = self.symbols.declare(scope, &name, SymbolInfo::Var { decl: node }, span) {
                            self.diagnostics.push(diag);
                        }
                    }
                    None => {
                        self.error_expected(vec![TokenKind::Identifier], vec![]);
                    }
                }
                if self.try_consume(TokenKind::Comma).is_some() {
                    continue;
                }
                break;
            }
        }
        let close = self.expect(TokenKind::CloseParen, vec![]);
        let span = start.merge(open.unwrap_or(start)).merge(close.unwrap_or(start));
        self.ast.alloc(span, NodeKind::ParamList { params })
    }

    /// `-> T` or `-> (T, U, ...)`, or nothing (void). `spec.md` §4.1 keeps
    /// this a group node (`ReturnList`) even for the common single-type
    /// case, so the checker can treat return arity uniformly.
    pub(crate) fn parse_return_list(&mut self) -> meek_common::NodeId {
        let start = self.scanner.peek_token_start_end();
        if self.try_consume(TokenKind::Arrow).is_none() {
            return self.ast.alloc(start, NodeKind::ReturnList { types: vec![] });
        }
        let mut types = Vec::new();
        if self.try_consume(TokenKind::OpenParen).is_some() {
            if self.peek() != TokenKind::CloseParen {
                loop {
                    let t_start = self.scanner.peek_token_start_end();
                    let ty = self.parse_type();
                    types.push((ty, t_start));
                    if self.try_consume(TokenKind::Comma).is_some() {
                        continue;
                    }
                    break;
                }
            }
            let _ = self.expect(TokenKind::CloseParen, vec![]);
        } else {
            let t_start = self.scanner.peek_token_start_end();
            let ty = self.parse_type();
            types.push((ty, t_start));
        }
        let span = types.iter().fold(start, |acc, (_, s)| acc.merge(*s));
        self.ast.alloc(span, NodeKind::ReturnList { types })
    }

    /// Dispatches between a plain expression statement, an assignment,
    /// and a detected chained assignment (`a = b = c;`, illegal per
    /// `spec.md` §4.1).
    fn parse_assign_or_expr_stmt(&mut self) -> meek_common::NodeId {
        let start = self.scanner.peek_token_start_end();
        let lhs = self.parse_expr();
        if let Some(op) = AssignOp::from_token(self.peek()) {
            self.consume();
            let rhs = self.parse_expr();
            let rhs = self.reject_chained_assign(rhs);
            let end = match self.expect(TokenKind::Semicolon, vec![rhs]) {
                Ok(s) => s,
                Err(e) => self.ast.span_of(e),
            };
            return self.ast.alloc(start.merge(end), NodeKind::Assign { op, lhs, rhs });
        }
        let end = match self.expect(TokenKind::Semicolon, vec![lhs]) {
            Ok(s) => s,
            Err(e) => self.ast.span_of(e),
        };
        self.ast.alloc(start.merge(end), NodeKind::ExprStmt { expr: lhs })
    }

    /// An assignment's right-hand side may not itself be an assignment
    /// (`spec.md` §4.1's explicit non-associativity of `=`). Detected
    /// after the fact: `parse_expr` never recurses into assignment, so a
    /// literal `b = c` on the right only occurs if the caller already
    /// consumed `b`, leaving a dangling assign operator here.
    fn reject_chained_assign(&mut self, rhs: meek_common::NodeId) -> meek_common::NodeId {
        if let Some(op) = AssignOp::from_token(self.peek()) {
            self.consume();
            let chained_rhs = self.parse_expr();
            let chained_rhs = self.reject_chained_assign(chained_rhs);
            let span = self.ast.span_of(rhs).merge(self.ast.span_of(chained_rhs));
            self.diagnostics.push(Diagnostic::error(
                codes::PARSE_CHAINED_ASSIGN,
                span,
                "chained assignment is not allowed",
            ));
            let _ = op;
            return self.ast.alloc(
                span,
                NodeKind::ChainedAssignErr {
                    lhs: rhs,
                    chained: chained_rhs,
                },
            );
        }
        rhs
    }
}
