//! Post-order expression resolution (`spec.md` §4.4): decorates every
//! expression node with its evaluated type, classifies `Symbol`
//! references against the active scope chain, and reports the type
//! errors (mismatched binop operands, non-pointer deref, non-array
//! subscript, unknown field, ...) that don't require a surrounding call
//! context to settle. Call expressions are handled separately in
//! `call_checker`, since overload disambiguation needs the whole
//! argument list at once.

use crate::context::Checker;
use meek_common::codes;
use meek_parser::{LiteralValue, NodeKind, SymbolResolution, UnOp};
use meek_types::{Type, TypeId};

impl<'a> Checker<'a> {
    /// Evaluate `id` and return its type. `value_position` is `false`
    /// only for the direct operand of an `ExprStmt`, the one place a
    /// void-returning call is legal (`spec.md` §4.4's "reject a call
    /// whose function has zero returns when used in a value
    /// position").
    pub(crate) fn eval(&mut self, id: meek_common::NodeId, value_position: bool) -> TypeId {
        let kind = self.ast.get(id).kind.clone();
        let span = self.ast.span_of(id);

        if kind.is_bubble() {
            return TypeId::BUBBLE_ERROR;
        }
        if kind.is_error() {
            // An already-diagnosed parse error standing in expression
            // position: propagate silently rather than re-reporting.
            return TypeId::BUBBLE_ERROR;
        }

        let ty = match kind {
            NodeKind::Binop { op, lhs, rhs, .. } => self.eval_binop(span, op, lhs, rhs),
            NodeKind::Unop { op, operand, .. } => self.eval_unop(op, operand),
            NodeKind::Literal { value, .. } => eval_literal(&value),
            NodeKind::Deref { operand, .. } => self.eval_deref(span, operand),
            NodeKind::ArrayAccess { array, index, .. } => self.eval_array_access(span, array, index),
            NodeKind::MemberAccess { base, member, .. } => self.eval_member_access(span, base, &member),
            NodeKind::Symbol { name, .. } => self.eval_symbol(id, span, &name),
            NodeKind::Call { callee, args, .. } => self.eval_call(span, callee, args, value_position),
            NodeKind::FuncLiteral { scope, returns, body, eval_type, .. } => {
                self.eval_func_literal(scope, returns, body, eval_type)
            }
            _ => TypeId::TYPE_ERROR,
        };

        self.ast.get_mut(id).set_eval_type(ty);

        if value_position && ty == TypeId::VOID {
            self.push_diag(
                codes::RESOLVE_CALL_VOID_RESULT,
                span,
                "a void function call cannot be used as a value",
            );
            return TypeId::TYPE_ERROR;
        }
        ty
    }

    fn eval_binop(
        &mut self,
        span: meek_common::Span,
        _op: meek_parser::BinOp,
        lhs: meek_common::NodeId,
        rhs: meek_common::NodeId,
    ) -> TypeId {
        let lt = self.eval(lhs, true);
        let rt = self.eval(rhs, true);
        if lt.is_error() || rt.is_error() {
            return TypeId::BUBBLE_ERROR;
        }
        if lt != rt {
            self.push_diag(
                codes::RESOLVE_TYPE_MISMATCH_BINOP,
                span,
                "operands of a binary expression must have the same type",
            );
            return TypeId::TYPE_ERROR;
        }
        lt
    }

    fn eval_unop(&mut self, op: UnOp, operand: meek_common::NodeId) -> TypeId {
        let ot = self.eval(operand, true);
        if ot.is_error() {
            return TypeId::BUBBLE_ERROR;
        }
        match op {
            UnOp::Plus | UnOp::Neg | UnOp::Not => ot,
            UnOp::AddrOf => self.types.intern(Type::Pointer(ot)),
        }
    }

    fn eval_deref(&mut self, span: meek_common::Span, operand: meek_common::NodeId) -> TypeId {
        let ot = self.eval(operand, true);
        if ot.is_error() {
            return TypeId::BUBBLE_ERROR;
        }
        match self.types.get(ot).clone() {
            Type::Pointer(inner) => inner,
            _ => {
                self.push_diag(codes::RESOLVE_NOT_A_POINTER, span, "cannot dereference a non-pointer value");
                TypeId::TYPE_ERROR
            }
        }
    }

    fn eval_array_access(
        &mut self,
        span: meek_common::Span,
        array: meek_common::NodeId,
        index: meek_common::NodeId,
    ) -> TypeId {
        let at = self.eval(array, true);
        let it = self.eval(index, true);
        if at.is_error() || it.is_error() {
            return TypeId::BUBBLE_ERROR;
        }
        if it != TypeId::INT {
            self.push_diag(
                codes::RESOLVE_TYPE_MISMATCH_SUBSCRIPT,
                span,
                "array subscript must be a signed 32-bit integer",
            );
            return TypeId::TYPE_ERROR;
        }
        match self.types.get(at).clone() {
            Type::Array { element, .. } => element,
            _ => {
                self.push_diag(codes::RESOLVE_NOT_AN_ARRAY, span, "cannot index a non-array value");
                TypeId::TYPE_ERROR
            }
        }
    }

    fn eval_member_access(&mut self, span: meek_common::Span, base: meek_common::NodeId, member: &str) -> TypeId {
        let bt = self.eval(base, true);
        if bt.is_error() {
            return TypeId::BUBBLE_ERROR;
        }
        match self.types.get(bt).clone() {
            Type::Struct { fields, .. } => match fields.iter().find(|(name, _)| name == member) {
                Some((_, ty)) => *ty,
                None => {
                    self.push_diag(codes::RESOLVE_UNKNOWN_FIELD, span, format!("no field named '{member}'"));
                    TypeId::TYPE_ERROR
                }
            },
            _ => {
                self.push_diag(codes::RESOLVE_NOT_A_STRUCT, span, "member access on a non-struct value");
                TypeId::TYPE_ERROR
            }
        }
    }

    fn eval_symbol(&mut self, id: meek_common::NodeId, span: meek_common::Span, name: &str) -> TypeId {
        let scope = self.current_scope();
        let candidates = self.collect_candidates(scope, name);
        let resolution = match candidates.len() {
            0 => {
                self.push_diag(codes::RESOLVE_UNRESOLVED_SYMBOL, span, format!("unresolved symbol '{name}'"));
                SymbolResolution::NotFound
            }
            1 => SymbolResolution::Resolved(candidates[0]),
            _ => SymbolResolution::Candidates(candidates),
        };
        let ty = match &resolution {
            SymbolResolution::Unresolved => TypeId::UNRESOLVED,
            SymbolResolution::NotFound => TypeId::TYPE_ERROR,
            SymbolResolution::Candidates(_) => TypeId::UNRESOLVED_HAS_CANDIDATES,
            SymbolResolution::Resolved(c) => self.decl_type(*c),
        };
        self.set_symbol_resolution(id, resolution);
        ty
    }

    fn eval_func_literal(
        &mut self,
        scope: meek_symbols::ScopeId,
        returns: meek_common::NodeId,
        body: meek_common::NodeId,
        eval_type: TypeId,
    ) -> TypeId {
        let return_types = self.return_types_of(returns);
        self.scope_stack.push(scope);
        self.func_stack.push(crate::context::FuncContext { return_types });
        self.visit_stmt(body);
        self.func_stack.pop();
        self.scope_stack.pop();
        // Established at parse time from the header; nothing here
        // revises it (`spec.md` §4.4).
        eval_type
    }

    /// The set of types an argument could evaluate to: a singleton for
    /// an already-resolved expression, or the union of a still-ambiguous
    /// symbol's candidate types (`spec.md` §4.4's "effective argument
    /// type list").
    pub(crate) fn effective_arg_types(&self, arg: meek_common::NodeId) -> Vec<TypeId> {
        if let NodeKind::Symbol { resolution, eval_type, .. } = &self.ast.get(arg).kind {
            if let SymbolResolution::Candidates(candidates) = resolution {
                return candidates.iter().map(|c| self.decl_type(*c)).collect();
            }
            return vec![*eval_type];
        }
        vec![self.ast.get(arg).eval_type().unwrap_or(TypeId::TYPE_ERROR)]
    }
}

fn eval_literal(value: &LiteralValue) -> TypeId {
    match value {
        LiteralValue::Int(_) => TypeId::INT,
        LiteralValue::Float(_) => TypeId::FLOAT,
        LiteralValue::Bool(_) => TypeId::BOOL,
        LiteralValue::Str(_) => TypeId::STRING,
    }
}
