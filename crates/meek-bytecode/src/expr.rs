//! Expression lowering (`spec.md` §4.5): an rvalue pushes a value, an
//! lvalue pushes an address. Locals are addressed by the frame offsets
//! `crate::context::Emitter::compute_frame_layout` assigns; everything
//! else (struct fields, array elements, pointer targets) is resolved to
//! an address relative to those.

use crate::context::Emitter;
use crate::opcode::{Cmp, FloatArith, IntArith, IntBitwise, Logical, Opcode, Width, width_for_bytes};
use meek_common::{NodeId, Span};
use meek_parser::{BinOp, Candidate, LiteralValue, NodeKind, SymbolResolution, UnOp};
use meek_types::{Type, TypeId};

impl<'a> Emitter<'a> {
    /// Compile `id` for its value, pushing exactly one value whose
    /// on-stack width is `self.types.size_of(id's eval type)`.
    pub(crate) fn compile_rvalue(&mut self, id: NodeId) -> TypeId {
        let kind = self.ast.get(id).kind.clone();
        let span = self.ast.span_of(id);
        let line = self.line_of(id);

        match kind {
            NodeKind::Literal { value, eval_type } => {
                self.compile_literal(&value, line);
                eval_type
            }
            NodeKind::Symbol { eval_type, resolution, .. } => {
                self.compile_symbol_rvalue(id, span, line, resolution, eval_type)
            }
            NodeKind::Unop { op: UnOp::AddrOf, operand, eval_type } => {
                self.compile_lvalue_address(operand);
                eval_type
            }
            NodeKind::Unop { op, operand, eval_type } => {
                self.compile_unop(span, line, op, operand, eval_type)
            }
            NodeKind::Binop { op, lhs, rhs, eval_type } => self.compile_binop(span, line, op, lhs, rhs, eval_type),
            NodeKind::Deref { operand, eval_type } => {
                self.compile_rvalue(operand);
                self.compile_load(span, line, eval_type);
                eval_type
            }
            NodeKind::ArrayAccess { eval_type, .. } | NodeKind::MemberAccess { eval_type, .. } => {
                self.compile_lvalue_address(id);
                self.compile_load(span, line, eval_type);
                eval_type
            }
            NodeKind::Call { callee, args, eval_type } => self.compile_call(span, line, callee, args, eval_type),
            NodeKind::FuncLiteral { eval_type, .. } => {
                self.ice(span, "function literals cannot be lowered to a callable bytecode value yet");
                self.compile_zero(line, eval_type);
                eval_type
            }
            _ => {
                self.ice(span, "expression kind is not valid in value position");
                TypeId::TYPE_ERROR
            }
        }
    }

    fn compile_literal(&mut self, value: &LiteralValue, line: u32) {
        match value {
            LiteralValue::Int(v) => {
                self.current.emit_op(Opcode::LoadImmediate(Width::W32), line);
                self.current.emit_u32(*v as i32 as u32);
            }
            LiteralValue::Float(v) => {
                self.current.emit_op(Opcode::LoadImmediate(Width::W32), line);
                self.current.emit_f32_bits(*v as f32);
            }
            LiteralValue::Bool(true) => self.current.emit_op(Opcode::LoadTrue, line),
            LiteralValue::Bool(false) => self.current.emit_op(Opcode::LoadFalse, line),
            LiteralValue::Str(_) => {
                // No string-constant pool or opcode exists in this
                // instruction set; a placeholder null address stands in
                // until one is designed.
                self.current.emit_op(Opcode::LoadImmediate(crate::opcode::POINTER_WIDTH), line);
                self.current.emit_i64(0);
            }
        }
    }

    fn compile_zero(&mut self, line: u32, ty: TypeId) {
        let bytes = self.types.size_of(ty).max(1);
        let width = width_for_bytes(bytes).unwrap_or(Width::W64);
        self.current.emit_op(Opcode::LoadImmediate(width), line);
        match width {
            Width::W8 => self.current.emit_u8(0),
            Width::W16 => self.current.emit_i16(0),
            Width::W32 => self.current.emit_u32(0),
            Width::W64 => self.current.emit_i64(0),
        }
    }

    fn compile_symbol_rvalue(
        &mut self,
        id: NodeId,
        span: Span,
        line: u32,
        resolution: SymbolResolution,
        eval_type: TypeId,
    ) -> TypeId {
        match resolution {
            SymbolResolution::Resolved(Candidate::Var(_)) => {
                self.compile_lvalue_address(id);
                self.compile_load(span, line, eval_type);
                eval_type
            }
            SymbolResolution::Resolved(Candidate::Func(_)) => {
                self.ice(span, "a bare function name has no bytecode value outside of a call");
                self.compile_zero(line, eval_type);
                eval_type
            }
            _ => {
                // Unresolved/ambiguous/not-found: the resolve pass has
                // already reported this; don't double-diagnose.
                self.compile_zero(line, eval_type);
                eval_type
            }
        }
    }

    fn compile_unop(&mut self, span: Span, line: u32, op: UnOp, operand: NodeId, eval_type: TypeId) -> TypeId {
        self.compile_rvalue(operand);
        match op {
            UnOp::Plus => {}
            UnOp::Neg => match self.negate_opcode(eval_type) {
                Some(opcode) => self.current.emit_op(opcode, line),
                None => self.ice(span, "negation operand has no arithmetic representation"),
            },
            UnOp::Not => {
                // No bitwise-not opcode exists; a `bool` is a one-byte
                // 0/1, so flipping it is `b ^ 1`.
                self.current.emit_op(Opcode::LoadImmediate(Width::W8), line);
                self.current.emit_u8(1);
                self.current.emit_op(Opcode::IntBitwise(IntBitwise::Xor, Width::W8), line);
            }
            UnOp::AddrOf => unreachable!("handled in compile_rvalue"),
        }
        eval_type
    }

    fn negate_opcode(&self, ty: TypeId) -> Option<Opcode> {
        match self.types.get(ty).as_base() {
            Some(base) => Opcode::negate(base),
            None => None,
        }
    }

    fn compile_binop(&mut self, span: Span, line: u32, op: BinOp, lhs: NodeId, rhs: NodeId, operand_ty: TypeId) -> TypeId {
        // `eval_binop` decorates every binary expression — arithmetic
        // and comparison alike — with the shared operand type, not a
        // `bool` result for comparisons; see `meek-checker`'s
        // `eval_binop`. That's exactly what opcode dispatch needs here.
        if matches!(op, BinOp::Or | BinOp::And) {
            self.compile_rvalue(lhs);
            self.compile_rvalue(rhs);
            let which = if op == BinOp::Or { Logical::Or } else { Logical::And };
            self.current.emit_op(Opcode::Logical(which), line);
            return operand_ty;
        }

        self.compile_rvalue(lhs);
        self.compile_rvalue(rhs);

        let opcode = self.binop_opcode(op, operand_ty);
        match opcode {
            Some(opcode) => self.current.emit_op(opcode, line),
            None => self.ice(span, "no bytecode operation for this operand type"),
        }

        match op {
            BinOp::Eq | BinOp::NotEq | BinOp::Less | BinOp::LessEq | BinOp::Greater | BinOp::GreaterEq => {
                TypeId::BOOL
            }
            _ => operand_ty,
        }
    }

    pub(crate) fn binop_opcode(&self, op: BinOp, operand_ty: TypeId) -> Option<Opcode> {
        let resolved = self.types.get(operand_ty).clone();
        let pointer_width = matches!(resolved, Type::Pointer(_));
        let base = resolved.as_base();

        match op {
            BinOp::Add => base.and_then(|b| Opcode::int_arith(IntArith::Add, b).or_else(|| Opcode::float_arith(FloatArith::Add, b))),
            BinOp::Sub => base.and_then(|b| Opcode::int_arith(IntArith::Sub, b).or_else(|| Opcode::float_arith(FloatArith::Sub, b))),
            BinOp::Mul => base.and_then(|b| Opcode::int_arith(IntArith::Mul, b).or_else(|| Opcode::float_arith(FloatArith::Mul, b))),
            BinOp::Div => base.and_then(|b| Opcode::div_int(b).or_else(|| Opcode::float_arith(FloatArith::Div, b))),
            BinOp::Rem => base.and_then(Opcode::rem_int),
            BinOp::HashOr => base.and_then(|b| Opcode::int_bitwise(IntBitwise::Or, b)),
            BinOp::HashXor => base.and_then(|b| Opcode::int_bitwise(IntBitwise::Xor, b)),
            BinOp::HashAnd => base.and_then(|b| Opcode::int_bitwise(IntBitwise::And, b)),
            BinOp::Eq | BinOp::NotEq | BinOp::Less | BinOp::LessEq | BinOp::Greater | BinOp::GreaterEq => {
                let cmp = match op {
                    BinOp::Eq => Cmp::Eq,
                    BinOp::NotEq => Cmp::NotEq,
                    BinOp::Less => Cmp::Less,
                    BinOp::LessEq => Cmp::LessEq,
                    BinOp::Greater => Cmp::Greater,
                    _ => Cmp::GreaterEq,
                };
                if pointer_width {
                    Some(Opcode::CmpInt(cmp, crate::opcode::POINTER_WIDTH, crate::opcode::Signedness::Unsigned))
                } else {
                    base.and_then(|b| Opcode::cmp(cmp, b))
                }
            }
            BinOp::Or | BinOp::And => unreachable!("handled by the short-circuit path above"),
        }
    }

    fn compile_call(&mut self, span: Span, line: u32, callee: NodeId, args: NodeId, eval_type: TypeId) -> TypeId {
        let arg_ids = match &self.ast.get(args).kind {
            NodeKind::ArgList { args } => args.clone(),
            _ => Vec::new(),
        };
        for arg in &arg_ids {
            self.compile_rvalue(*arg);
        }

        let target = match &self.ast.get(callee).kind {
            NodeKind::Symbol { resolution: SymbolResolution::Resolved(Candidate::Func(defn)), .. } => Some(*defn),
            _ => None,
        };
        let index = target.and_then(|defn| match &self.ast.get(defn).kind {
            NodeKind::FuncDefn { name, .. } => self.func_index.get(name).copied(),
            _ => None,
        });

        match index {
            Some(index) => {
                self.current.emit_op(Opcode::Call, line);
                self.current.emit_u32(index);
                self.current.emit_u8(arg_ids.len() as u8);
            }
            None => {
                self.ice(span, "call target did not resolve to a directly-addressable function");
                if eval_type != TypeId::VOID {
                    self.compile_zero(line, eval_type);
                }
            }
        }
        eval_type
    }

    /// Push the address the location `id` evaluates to. `id` must be an
    /// lvalue-shaped node (`meek-checker`'s `is_lvalue` has already
    /// rejected anything else by the time codegen runs).
    pub(crate) fn compile_lvalue_address(&mut self, id: NodeId) -> TypeId {
        let kind = self.ast.get(id).kind.clone();
        let span = self.ast.span_of(id);
        let line = self.line_of(id);

        match kind {
            NodeKind::Symbol { resolution, eval_type, .. } => match resolution {
                SymbolResolution::Resolved(Candidate::Var(decl)) => match self.frame.get(&decl).copied() {
                    Some(offset) => {
                        self.current.emit_op(Opcode::LoadImmediate(crate::opcode::POINTER_WIDTH), line);
                        self.current.emit_i64(offset as i64);
                        eval_type
                    }
                    None => {
                        self.ice(span, "variable has no frame slot (module-level data isn't supported)");
                        eval_type
                    }
                },
                _ => {
                    self.ice(span, "symbol does not name an addressable variable");
                    eval_type
                }
            },
            NodeKind::Deref { operand, eval_type } => {
                self.compile_rvalue(operand);
                eval_type
            }
            NodeKind::ArrayAccess { array, index, eval_type } => {
                let array_ty = self.compile_lvalue_address(array);
                let element_ty = match self.types.get(array_ty).clone() {
                    Type::Array { element, .. } => element,
                    _ => {
                        self.ice(span, "array access base did not resolve to an array type");
                        eval_type
                    }
                };
                self.compile_rvalue(index);
                let size = self.types.size_of(element_ty);
                self.current.emit_op(Opcode::LoadImmediate(crate::opcode::POINTER_WIDTH), line);
                self.current.emit_i64(size as i64);
                self.current.emit_op(Opcode::IntArith(IntArith::Mul, crate::opcode::POINTER_WIDTH), line);
                self.current.emit_op(Opcode::IntArith(IntArith::Add, crate::opcode::POINTER_WIDTH), line);
                eval_type
            }
            NodeKind::MemberAccess { base, member, eval_type } => {
                let base_ty = self.compile_lvalue_address(base);
                match self.types.field_offset(base_ty, &member) {
                    Some((offset, _)) => {
                        self.current.emit_op(Opcode::LoadImmediate(crate::opcode::POINTER_WIDTH), line);
                        self.current.emit_i64(offset as i64);
                        self.current.emit_op(Opcode::IntArith(IntArith::Add, crate::opcode::POINTER_WIDTH), line);
                    }
                    None => self.ice(span, format!("no field named '{member}' in this struct")),
                }
                eval_type
            }
            _ => {
                self.ice(span, "expression is not an lvalue");
                TypeId::TYPE_ERROR
            }
        }
    }

    pub(crate) fn compile_load(&mut self, span: Span, line: u32, ty: TypeId) {
        let bytes = self.types.size_of(ty);
        match width_for_bytes(bytes) {
            Some(width) => self.current.emit_op(Opcode::Load(width), line),
            None => self.ice(span, "value's type has no sized load representation"),
        }
    }

    pub(crate) fn compile_store(&mut self, span: Span, line: u32, ty: TypeId) {
        let bytes = self.types.size_of(ty);
        match width_for_bytes(bytes) {
            Some(width) => self.current.emit_op(Opcode::Store(width), line),
            None => self.ice(span, "value's type has no sized store representation"),
        }
    }

    /// Jump-context lowering of a condition: emits whatever's needed to
    /// fall through when `id` is truthy, and returns the byte indices of
    /// every reserved `JumpIfFalse` offset field still waiting to be
    /// patched to the "condition was false" target (`spec.md` §4.5).
    /// `&&`/`||` short-circuit here without materializing an
    /// intermediate `bool`; anything else falls back to evaluating the
    /// condition as a value and branching on it.
    pub(crate) fn compile_branch_on_false(&mut self, id: NodeId) -> Vec<usize> {
        if let NodeKind::Binop { op: BinOp::And, lhs, rhs, .. } = self.ast.get(id).kind.clone() {
            let mut patches = self.compile_branch_on_false(lhs);
            patches.extend(self.compile_branch_on_false(rhs));
            return patches;
        }
        if let NodeKind::Binop { op: BinOp::Or, lhs, rhs, .. } = self.ast.get(id).kind.clone() {
            let line = self.line_of(lhs);
            self.compile_rvalue(lhs);
            self.current.emit_op(Opcode::JumpIfFalse, line);
            let check_rhs = self.current.reserve_i16();
            self.current.emit_op(Opcode::Jump, line);
            let short_circuit_true = self.current.reserve_i16();
            let rhs_start = self.current.len();
            let _ = self.current.backpatch_to(check_rhs, rhs_start);
            let patches = self.compile_branch_on_false(rhs);
            let after = self.current.len();
            let _ = self.current.backpatch_to(short_circuit_true, after);
            return patches;
        }

        let line = self.line_of(id);
        self.compile_rvalue(id);
        self.current.emit_op(Opcode::JumpIfFalse, line);
        vec![self.current.reserve_i16()]
    }
}

#[cfg(test)]
#[path = "tests/expr.rs"]
mod tests;
