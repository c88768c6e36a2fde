//! Statement lowering (`spec.md` §4.5): control flow back-patching for
//! `if`/`while`, `break`/`continue` against the innermost enclosing
//! loop, and the frame read/write pairs behind declarations and
//! assignment.

use crate::context::{Emitter, LoopCtx};
use crate::opcode::Opcode;
use meek_common::NodeId;
use meek_parser::{AssignOp, NodeKind};
use meek_types::TypeId;

impl<'a> Emitter<'a> {
    pub(crate) fn compile_stmt(&mut self, id: NodeId) {
        let kind = self.ast.get(id).kind.clone();
        let span = self.ast.span_of(id);
        let line = self.line_of(id);

        match kind {
            NodeKind::Block { stmts, .. } => {
                for stmt in stmts {
                    self.compile_stmt(stmt);
                }
            }
            NodeKind::If { cond, then_branch, else_branch } => self.compile_if(cond, then_branch, else_branch),
            NodeKind::While { cond, body, .. } => self.compile_while(cond, body),
            NodeKind::Return { value } => {
                if let Some(value) = value {
                    self.compile_rvalue(value);
                }
                if self.frame_size > 0 {
                    self.current.emit_op(Opcode::StackFree, line);
                    self.current.emit_u32(self.frame_size);
                }
                self.current.emit_op(Opcode::Return, line);
            }
            NodeKind::Break => match self.loops.last_mut() {
                Some(_) => {
                    self.current.emit_op(Opcode::Jump, line);
                    let patch = self.current.reserve_i16();
                    self.loops.last_mut().unwrap().break_patches.push(patch);
                }
                None => self.ice(span, "break outside of a loop"),
            },
            NodeKind::Continue => match self.loops.last() {
                Some(loop_ctx) => {
                    let top_ip = loop_ctx.top_ip;
                    self.current.emit_op(Opcode::Jump, line);
                    let patch = self.current.reserve_i16();
                    let _ = self.current.backpatch_to(patch, top_ip);
                }
                None => self.ice(span, "continue outside of a loop"),
            },
            NodeKind::VarDecl { ty, init, .. } => {
                if let Some(init) = init {
                    match self.frame.get(&id).copied() {
                        Some(offset) => {
                            self.current.emit_op(Opcode::LoadImmediate(crate::opcode::POINTER_WIDTH), line);
                            self.current.emit_i64(offset as i64);
                            self.compile_rvalue(init);
                            self.compile_store(span, line, ty);
                        }
                        None => self.ice(span, "declared variable has no frame slot"),
                    }
                }
            }
            NodeKind::Assign { op, lhs, rhs } => self.compile_assign(span, line, op, lhs, rhs),
            NodeKind::ExprStmt { expr } => {
                let ty = self.compile_rvalue(expr);
                if ty != TypeId::VOID {
                    let size = self.types.size_of(ty);
                    if size > 0 {
                        self.current.emit_op(Opcode::StackFree, line);
                        self.current.emit_u32(size);
                    }
                }
            }
            NodeKind::StructDefn { .. } | NodeKind::FuncDefn { .. } => {
                // Nested declarations carry no runtime behavior of their
                // own; top-level `fn`s are compiled as separate
                // functions by `compile_program`.
            }
            _ => self.ice(span, "statement kind is not valid here"),
        }
    }

    fn compile_if(&mut self, cond: NodeId, then_branch: NodeId, else_branch: Option<NodeId>) {
        let line = self.line_of(then_branch);
        let false_patches = self.compile_branch_on_false(cond);
        self.compile_stmt(then_branch);

        match else_branch {
            Some(else_branch) => {
                self.current.emit_op(Opcode::Jump, line);
                let end_patch = self.current.reserve_i16();
                let else_start = self.current.len();
                for patch in &false_patches {
                    let _ = self.current.backpatch_to(*patch, else_start);
                }
                self.compile_stmt(else_branch);
                let end = self.current.len();
                let _ = self.current.backpatch_to(end_patch, end);
            }
            None => {
                let end = self.current.len();
                for patch in &false_patches {
                    let _ = self.current.backpatch_to(*patch, end);
                }
            }
        }
    }

    fn compile_while(&mut self, cond: NodeId, body: NodeId) {
        let line = self.line_of(body);
        let top_ip = self.current.len();
        let false_patches = self.compile_branch_on_false(cond);

        self.loops.push(LoopCtx { top_ip, break_patches: Vec::new() });
        self.compile_stmt(body);

        self.current.emit_op(Opcode::Jump, line);
        let back_patch = self.current.reserve_i16();
        let _ = self.current.backpatch_to(back_patch, top_ip);

        let loop_ctx = self.loops.pop().expect("pushed above");
        let end = self.current.len();
        for patch in false_patches.iter().chain(loop_ctx.break_patches.iter()) {
            let _ = self.current.backpatch_to(*patch, end);
        }
    }

    fn compile_assign(&mut self, span: meek_common::Span, line: u32, op: AssignOp, lhs: NodeId, rhs: NodeId) {
        let lhs_ty = self.compile_lvalue_address(lhs);

        match op.as_binop() {
            None => {
                self.compile_rvalue(rhs);
                self.compile_store(span, line, lhs_ty);
            }
            Some(binop) => {
                self.current.emit_op(Opcode::Duplicate(crate::opcode::POINTER_WIDTH), line);
                self.compile_load(span, line, lhs_ty);
                self.compile_rvalue(rhs);
                match self.binop_opcode(binop, lhs_ty) {
                    Some(opcode) => self.current.emit_op(opcode, line),
                    None => self.ice(span, "no bytecode operation for this compound-assignment's operand type"),
                }
                self.compile_store(span, line, lhs_ty);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/stmt.rs"]
mod tests;
