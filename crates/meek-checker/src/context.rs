//! The `Checker` struct: owns the traversal state the resolve pass
//! needs beyond what's already recorded on the AST — an active-scope
//! stack (recovered from the `scopeId` each scope-introducing node
//! already carries), a stack of enclosing function return-type lists,
//! and a deduplicated diagnostic sink (`SPEC_FULL.md` §4.4, §9).

use meek_common::{Diagnostic, DiagnosticCategory, NodeId, Span, codes};
use meek_parser::{Ast, Candidate, NodeKind};
use meek_symbols::{ScopeArena, ScopeId, SymbolInfo, SymbolTable};
use meek_types::{Type, TypeId, TypeTable};
use rustc_hash::FxHashSet;

/// The expected return-type list of the function currently being
/// walked. Present only while inside a `FuncDefn`/`FuncLiteral` body.
pub(crate) struct FuncContext {
    pub(crate) return_types: Vec<TypeId>,
}

pub struct Checker<'a> {
    pub(crate) ast: &'a mut Ast,
    pub(crate) symbols: &'a SymbolTable,
    pub(crate) scopes: &'a ScopeArena,
    pub(crate) types: &'a mut TypeTable,
    pub(crate) scope_stack: Vec<ScopeId>,
    pub(crate) func_stack: Vec<FuncContext>,
    diagnostics: Vec<Diagnostic>,
    seen: FxHashSet<(Span, u32)>,
}

impl<'a> Checker<'a> {
    pub fn new(
        ast: &'a mut Ast,
        symbols: &'a SymbolTable,
        scopes: &'a ScopeArena,
        types: &'a mut TypeTable,
    ) -> Self {
        Checker {
            ast,
            symbols,
            scopes,
            types,
            scope_stack: Vec::new(),
            func_stack: Vec::new(),
            diagnostics: Vec::new(),
            seen: FxHashSet::default(),
        }
    }

    pub fn run(&mut self, root: NodeId) {
        let NodeKind::Program { stmts, scope } = self.ast.get(root).kind.clone() else {
            return;
        };
        self.scope_stack.push(scope);
        for stmt in &stmts {
            self.visit_stmt(*stmt);
        }
        self.scope_stack.pop();
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub(crate) fn current_scope(&self) -> ScopeId {
        *self
            .scope_stack
            .last()
            .expect("the resolve pass always runs inside at least the global scope")
    }

    /// Record a diagnostic unless an identical `(span, code)` pair was
    /// already reported — avoids the cascading repeats a tree walk
    /// would otherwise produce when a single bad subexpression feeds
    /// several sibling checks (`SPEC_FULL.md` §4.4's diagnostic-dedup
    /// note).
    pub(crate) fn push_diag(&mut self, code: u32, span: Span, message: impl Into<String>) {
        if !self.seen.insert((span, code)) {
            return;
        }
        self.diagnostics.push(Diagnostic {
            category: DiagnosticCategory::Error,
            code,
            span,
            message: message.into(),
        });
    }

    /// Every candidate `name` could refer to, visible from `scope`:
    /// every function overload found anywhere along the scope chain,
    /// plus at most one variable (the closest-declared one), inserted
    /// at the point in the function list its own scope's distance
    /// would place it (`spec.md` §4.4's shadowing-ordered candidate
    /// list). Walks the full chain rather than stopping at the first
    /// scope with any entry, since function overloads accumulate
    /// across the whole chain and a plain shadowing lookup would miss
    /// overloads declared further out.
    pub(crate) fn collect_candidates(&self, scope: ScopeId, name: &str) -> Vec<Candidate> {
        let mut funcs = Vec::new();
        let mut var = None;
        let mut insert_at = None;
        for candidate_scope in self.scopes.chain(scope) {
            let entries = self.symbols.entries_in_scope(candidate_scope, name);
            if entries.is_empty() {
                continue;
            }
            if var.is_none() {
                if let Some(SymbolInfo::Var { decl }) = entries.iter().find(|e| e.is_var()) {
                    var = Some(Candidate::Var(*decl));
                    insert_at = Some(funcs.len());
                }
            }
            for entry in entries {
                if let SymbolInfo::Func { defn } = entry {
                    funcs.push(Candidate::Func(*defn));
                }
            }
        }
        if let (Some(v), Some(idx)) = (var, insert_at) {
            funcs.insert(idx, v);
        }
        funcs
    }

    /// The declared type of a candidate's definition node: a
    /// `VarDecl`'s declared type, or a `FuncDefn`'s function signature.
    pub(crate) fn decl_type(&self, candidate: Candidate) -> TypeId {
        match &self.ast.get(candidate.decl_node()).kind {
            NodeKind::VarDecl { ty, .. } => *ty,
            NodeKind::FuncDefn { defined_type, .. } => *defined_type,
            _ => TypeId::TYPE_ERROR,
        }
    }

    pub(crate) fn set_symbol_resolution(
        &mut self,
        node: NodeId,
        resolution: meek_parser::SymbolResolution,
    ) {
        if let NodeKind::Symbol { resolution: slot, .. } = &mut self.ast.get_mut(node).kind {
            *slot = resolution;
        }
    }

    /// `canCoerce(from, to)`: intentionally conservative, always false
    /// (`spec.md` §4.4). The structure exists so a future numeric
    /// widening rule has a single place to live.
    pub(crate) fn can_coerce(&self, _from: TypeId, _to: TypeId) -> bool {
        false
    }

    /// Audit a function-name group for overload-signature duplicates:
    /// the first definition with a given parameter-type signature is
    /// canonical, every later one sharing that exact signature is a
    /// duplicate-declaration error (`spec.md` §4.2's "duplicates that
    /// share parameter type list exactly are errors"). Declarations
    /// share a name group by their *enclosing* scope — recovered as the
    /// parent of the function's own (body) scope, since that's the
    /// scope `SymbolTable::declare` inserted the overload into.
    pub(crate) fn audit_func_overloads(&mut self, node: NodeId, scope: ScopeId, name: &str, span: Span) {
        let Some(outer) = self.scopes.parent_of(scope) else {
            return;
        };
        let entries = self.symbols.entries_in_scope(outer, name).to_vec();
        let mut seen_signatures: Vec<Vec<TypeId>> = Vec::new();
        for entry in entries {
            let SymbolInfo::Func { defn } = entry else {
                continue;
            };
            let signature = self.func_signature(defn);
            if seen_signatures.iter().any(|s| *s == signature) {
                if defn == node {
                    self.push_diag(
                        codes::RESOLVE_DUPLICATE_DECLARATION,
                        span,
                        format!("function '{name}' duplicates an existing overload's parameter types"),
                    );
                }
            } else {
                seen_signatures.push(signature);
            }
        }
    }

    fn func_signature(&self, defn: NodeId) -> Vec<TypeId> {
        match &self.ast.get(defn).kind {
            NodeKind::FuncDefn { defined_type, .. } => match self.types.get(*defined_type) {
                Type::Function { params, .. } => params.clone(),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    pub(crate) fn return_types_of(&self, returns: NodeId) -> Vec<TypeId> {
        match &self.ast.get(returns).kind {
            NodeKind::ReturnList { types } => types.iter().map(|(ty, _)| *ty).collect(),
            _ => Vec::new(),
        }
    }
}
