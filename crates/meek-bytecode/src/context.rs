//! The `Emitter` struct: owns the tree-walking codegen state — the
//! module being built, the function currently being compiled, the
//! frame-offset map for the function's locals, and the stack of
//! enclosing loops a `break`/`continue` lowers against
//! (`spec.md` §4.5, `SPEC_FULL.md` §4.5).

use crate::function::BytecodeFunction;
use crate::module::BytecodeModule;
use meek_common::{Diagnostic, DiagnosticCategory, LineIndex, NodeId, Span, codes};
use meek_parser::{Ast, NodeKind};
use meek_symbols::{ScopeArena, ScopeId, SymbolInfo, SymbolTable};
use meek_types::TypeTable;
use rustc_hash::FxHashMap;

/// An in-flight loop's bookkeeping: the byte index `continue` jumps back
/// to, and every `break`'s jump-offset field still waiting for the
/// loop's end address (`spec.md` §4.5's "`break`/`continue` are lowered
/// using the innermost loop's top/end IP").
pub(crate) struct LoopCtx {
    pub(crate) top_ip: usize,
    pub(crate) break_patches: Vec<usize>,
}

pub struct Emitter<'a> {
    pub(crate) ast: &'a Ast,
    pub(crate) symbols: &'a SymbolTable,
    pub(crate) scopes: &'a ScopeArena,
    pub(crate) types: &'a TypeTable,
    pub(crate) line_index: &'a LineIndex,
    pub(crate) current: BytecodeFunction,
    /// Frame-relative byte offset of each `VarDecl` node in the function
    /// currently being compiled, reset per function
    /// (`crate::context::Emitter::compute_frame_layout`).
    pub(crate) frame: FxHashMap<NodeId, u32>,
    pub(crate) frame_size: u32,
    pub(crate) loops: Vec<LoopCtx>,
    /// Every top-level function's position in the module's function
    /// table, built before any body is compiled so forward calls resolve
    /// (`crate::opcode::Opcode::Call` addresses a function by index, not
    /// by name).
    pub(crate) func_index: FxHashMap<String, u32>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Emitter<'a> {
    pub(crate) fn new(
        ast: &'a Ast,
        symbols: &'a SymbolTable,
        scopes: &'a ScopeArena,
        types: &'a TypeTable,
        line_index: &'a LineIndex,
    ) -> Self {
        Emitter {
            ast,
            symbols,
            scopes,
            types,
            line_index,
            current: BytecodeFunction::new(),
            frame: FxHashMap::default(),
            frame_size: 0,
            loops: Vec::new(),
            func_index: FxHashMap::default(),
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn line_of(&self, id: NodeId) -> u32 {
        self.line_index.line_col(self.ast.span_of(id).start).line
    }

    #[cfg(test)]
    pub(crate) fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn ice(&mut self, span: Span, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            category: DiagnosticCategory::Error,
            code: codes::EMIT_INTERNAL_ERROR,
            span,
            message: message.into(),
        });
    }

    fn compile_function(&mut self, name: &str, scope: ScopeId, params: NodeId, body: NodeId) -> BytecodeFunction {
        self.frame.clear();
        self.frame_size = 0;
        self.current = BytecodeFunction::new();
        self.compute_frame_layout(scope, params, body);

        if self.frame_size > 0 {
            let line = self.line_of(body);
            self.current.emit_op(crate::opcode::Opcode::StackAlloc, line);
            self.current.emit_u32(self.frame_size);
        }

        self.compile_stmt(body);

        // A function whose body falls through without an explicit
        // `return` still needs one, matching the concrete scenario
        // `spec.md` §8 gives (`main`'s stream "ends in `Return`").
        if !ends_in_return(self.ast, body) {
            let line = self.line_of(body);
            if self.frame_size > 0 {
                self.current.emit_op(crate::opcode::Opcode::StackFree, line);
                self.current.emit_u32(self.frame_size);
            }
            self.current.emit_op(crate::opcode::Opcode::Return, line);
        }

        let _ = name;
        std::mem::take(&mut self.current)
    }

    /// Assign every local variable (including parameters) a
    /// frame-relative byte offset, in declaration order: parameters
    /// first (looked up by name through the symbol table, since
    /// `ParamDecl` doesn't carry the `VarDecl` node id the parser
    /// allocated for it), then each `VarDecl` encountered walking the
    /// body. Doesn't recurse into nested `FuncDefn`/`FuncLiteral`
    /// bodies — those get their own, independently laid out frame.
    pub(crate) fn compute_frame_layout(&mut self, scope: ScopeId, params: NodeId, body: NodeId) {
        let mut offset = 0u32;
        if let NodeKind::ParamList { params } = &self.ast.get(params).kind {
            for param in params {
                let decl = self
                    .symbols
                    .entries_in_scope(scope, &param.name)
                    .iter()
                    .find_map(|e| match e {
                        SymbolInfo::Var { decl } => Some(*decl),
                        _ => None,
                    });
                if let Some(decl) = decl {
                    self.frame.insert(decl, offset);
                }
                offset += self.types.size_of(param.ty);
            }
        }
        self.layout_stmt(body, &mut offset);
        self.frame_size = offset;
    }

    fn layout_stmt(&mut self, id: NodeId, offset: &mut u32) {
        match self.ast.get(id).kind.clone() {
            NodeKind::Block { stmts, .. } => {
                for stmt in stmts {
                    self.layout_stmt(stmt, offset);
                }
            }
            NodeKind::If { then_branch, else_branch, .. } => {
                self.layout_stmt(then_branch, offset);
                if let Some(e) = else_branch {
                    self.layout_stmt(e, offset);
                }
            }
            NodeKind::While { body, .. } => self.layout_stmt(body, offset),
            NodeKind::VarDecl { ty, .. } => {
                self.frame.insert(id, *offset);
                *offset += self.types.size_of(ty);
            }
            _ => {}
        }
    }
}

/// Conservative syntactic check: does this statement always execute a
/// `Return` on every path? Used only to decide whether the emitter
/// needs to synthesize a trailing `Return` — an implementation may
/// under-approximate (emit a redundant `Return` after an already-
/// exhaustive `if`/`else`) without being wrong, since a `Return` can
/// never execute twice.
fn ends_in_return(ast: &Ast, id: NodeId) -> bool {
    match &ast.get(id).kind {
        NodeKind::Return { .. } => true,
        NodeKind::Block { stmts, .. } => stmts.last().is_some_and(|last| ends_in_return(ast, *last)),
        NodeKind::If { then_branch, else_branch: Some(e), .. } => {
            ends_in_return(ast, *then_branch) && ends_in_return(ast, *e)
        }
        _ => false,
    }
}

/// Compile every top-level `fn` in `root` into a [`BytecodeModule`].
/// `text` is the original source, used to translate spans into the
/// per-instruction line numbers `spec.md` §4.5 requires.
pub fn compile_program(
    ast: &Ast,
    root: NodeId,
    symbols: &SymbolTable,
    scopes: &ScopeArena,
    types: &TypeTable,
    text: &str,
) -> (BytecodeModule, Vec<Diagnostic>) {
    let line_index = LineIndex::new(text);
    let mut emitter = Emitter::new(ast, symbols, scopes, types, &line_index);
    let mut module = BytecodeModule::new();

    let NodeKind::Program { stmts, .. } = &ast.get(root).kind else {
        return (module, emitter.diagnostics);
    };
    let defns: Vec<NodeId> = stmts
        .iter()
        .copied()
        .filter(|s| matches!(ast.get(*s).kind, NodeKind::FuncDefn { .. }))
        .collect();
    for (index, stmt) in defns.iter().enumerate() {
        if let NodeKind::FuncDefn { name, .. } = &ast.get(*stmt).kind {
            emitter.func_index.insert(name.clone(), index as u32);
        }
    }
    for stmt in defns {
        if let NodeKind::FuncDefn { name, scope, params, body, .. } = ast.get(stmt).kind.clone() {
            let func = emitter.compile_function(&name, scope, params, body);
            module.push_function(name, func);
        }
    }
    (module, emitter.diagnostics)
}

#[cfg(test)]
#[path = "tests/context.rs"]
mod tests;
