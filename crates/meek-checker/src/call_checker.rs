//! Call-site overload resolution (`spec.md` §4.4). A call's callee is
//! either a bare `Symbol` — in which case every candidate the scope
//! chain offers is classified against the argument list right here —
//! or some other expression (a member access, a dereferenced function
//! pointer, a nested call) whose already-resolved type must itself be
//! a function signature.

use crate::context::Checker;
use meek_common::{Diagnostic, DiagnosticCategory, NodeId, Span, codes};
use meek_parser::{Candidate, NodeKind, SymbolResolution};
use meek_types::{Type, TypeId};

/// How one function candidate's parameter list compares against the
/// effective argument type sets at a call site.
enum Match {
    /// Every parameter matched an argument's type exactly.
    Exact,
    /// At least one parameter required a coercion (`canCoerce`); no
    /// parameter was an outright mismatch.
    Loose,
    /// Arity differs, or some parameter matched nothing in its
    /// argument's effective type set.
    None,
}

impl<'a> Checker<'a> {
    pub(crate) fn eval_call(
        &mut self,
        span: Span,
        callee: NodeId,
        args: NodeId,
        value_position: bool,
    ) -> TypeId {
        let arg_ids = match &self.ast.get(args).kind {
            NodeKind::ArgList { args } => args.clone(),
            _ => {
                // The argument list itself failed to parse; still visit
                // it so any well-formed arguments inside get typed.
                let _ = value_position;
                return TypeId::BUBBLE_ERROR;
            }
        };
        let arg_types: Vec<TypeId> = arg_ids.iter().map(|a| self.eval(*a, true)).collect();
        let arg_sets: Vec<Vec<TypeId>> = arg_ids.iter().map(|a| self.effective_arg_types(*a)).collect();

        if let NodeKind::Symbol { name, .. } = self.ast.get(callee).kind.clone() {
            return self.eval_call_through_symbol(callee, span, &name, &arg_ids, &arg_sets, &arg_types);
        }

        let callee_ty = self.eval(callee, true);
        self.check_direct_call(span, callee_ty, &arg_sets)
    }

    fn eval_call_through_symbol(
        &mut self,
        callee: NodeId,
        span: Span,
        name: &str,
        arg_ids: &[NodeId],
        arg_sets: &[Vec<TypeId>],
        arg_types: &[TypeId],
    ) -> TypeId {
        let scope = self.current_scope();
        let candidates = self.collect_candidates(scope, name);

        if candidates.is_empty() {
            self.push_diag(codes::RESOLVE_UNRESOLVED_SYMBOL, span, format!("unresolved symbol '{name}'"));
            self.set_symbol_resolution(callee, SymbolResolution::NotFound);
            self.ast.get_mut(callee).set_eval_type(TypeId::TYPE_ERROR);
            return TypeId::BUBBLE_ERROR;
        }

        if candidates.len() == 1 {
            let candidate = candidates[0];
            self.set_symbol_resolution(callee, SymbolResolution::Resolved(candidate));
            let decl_ty = self.decl_type(candidate);
            self.ast.get_mut(callee).set_eval_type(decl_ty);
            return self.check_direct_call(span, decl_ty, arg_sets);
        }

        match self.classify_overload_call(span, &candidates, arg_sets) {
            Some(chosen) => {
                self.set_symbol_resolution(callee, SymbolResolution::Resolved(chosen));
                let decl_ty = self.decl_type(chosen);
                self.ast.get_mut(callee).set_eval_type(decl_ty);
                let ret = match self.types.get(decl_ty).clone() {
                    Type::Function { params, ret } => {
                        self.finalize_candidate_args(arg_ids, &params, arg_types);
                        ret
                    }
                    _ => TypeId::TYPE_ERROR,
                };
                ret
            }
            None => {
                self.set_symbol_resolution(callee, SymbolResolution::Candidates(candidates));
                self.ast.get_mut(callee).set_eval_type(TypeId::UNRESOLVED_HAS_CANDIDATES);
                TypeId::BUBBLE_ERROR
            }
        }
    }

    /// A single, already-known function type (a resolved sole
    /// candidate, or any non-overloaded callee expression): every
    /// parameter must classify as at least `Loose` against its
    /// argument's effective type set.
    fn check_direct_call(&mut self, span: Span, callee_ty: TypeId, arg_sets: &[Vec<TypeId>]) -> TypeId {
        if callee_ty.is_error() {
            return TypeId::BUBBLE_ERROR;
        }
        match self.types.get(callee_ty).clone() {
            Type::Function { params, ret } => match self.classify_signature(&params, arg_sets) {
                Some(_) => ret,
                None => {
                    self.push_diag(
                        codes::RESOLVE_TYPE_MISMATCH_CALL,
                        span,
                        "argument types do not match the function's parameter types",
                    );
                    TypeId::TYPE_ERROR
                }
            },
            _ => {
                self.push_diag(codes::RESOLVE_NOT_CALLABLE, span, "value is not callable");
                TypeId::TYPE_ERROR
            }
        }
    }

    /// Classifies every function candidate in the set, then applies
    /// `spec.md` §4.4's selection rule: exactly one exact match wins;
    /// failing that, exactly one loose match wins; more than one
    /// match at whichever tier is reached is ambiguous; no match at
    /// either tier is a no-overload error.
    fn classify_overload_call(
        &mut self,
        span: Span,
        candidates: &[Candidate],
        arg_sets: &[Vec<TypeId>],
    ) -> Option<Candidate> {
        let mut exact = Vec::new();
        let mut loose = Vec::new();
        for &candidate in candidates {
            if !candidate.is_func() {
                continue;
            }
            let decl_ty = self.decl_type(candidate);
            let Type::Function { params, .. } = self.types.get(decl_ty).clone() else {
                continue;
            };
            match self.classify_signature(&params, arg_sets) {
                Some(true) => exact.push(candidate),
                Some(false) => loose.push(candidate),
                None => {}
            }
        }

        if exact.len() == 1 {
            return Some(exact[0]);
        }
        if exact.len() > 1 {
            self.push_ambiguous(span);
            return None;
        }
        if loose.len() == 1 {
            return Some(loose[0]);
        }
        if loose.len() > 1 {
            self.push_ambiguous(span);
            return None;
        }
        self.push_diag(
            codes::RESOLVE_NO_MATCHING_OVERLOAD,
            span,
            "no overload accepts these argument types",
        );
        None
    }

    fn push_ambiguous(&mut self, span: Span) {
        self.diagnostics_push(Diagnostic {
            category: DiagnosticCategory::Error,
            code: codes::RESOLVE_AMBIGUOUS_CALL,
            span,
            message: "call is ambiguous between more than one overload".to_string(),
        });
    }

    fn diagnostics_push(&mut self, diag: Diagnostic) {
        self.push_diag(diag.code, diag.span, diag.message);
    }

    /// Returns `Some(true)` for an all-exact match, `Some(false)` for a
    /// match requiring at least one coercion, `None` if arity differs
    /// or some parameter matches nothing.
    fn classify_signature(&self, params: &[TypeId], arg_sets: &[Vec<TypeId>]) -> Option<bool> {
        if params.len() != arg_sets.len() {
            return None;
        }
        let mut all_exact = true;
        for (param, effective) in params.iter().zip(arg_sets) {
            match self.classify_arg(effective, *param) {
                Match::Exact => {}
                Match::Loose => all_exact = false,
                Match::None => return None,
            }
        }
        Some(all_exact)
    }

    fn classify_arg(&self, effective: &[TypeId], param: TypeId) -> Match {
        if effective.iter().filter(|&&t| t == param).count() == 1 {
            return Match::Exact;
        }
        if effective.iter().any(|&t| self.can_coerce(t, param)) {
            return Match::Loose;
        }
        Match::None
    }

    /// Once an overload is selected, any argument that was still an
    /// ambiguous candidate set collapses to whichever of its
    /// candidates exactly matches the chosen parameter type
    /// (`spec.md` §4.4 step 3).
    fn finalize_candidate_args(&mut self, arg_ids: &[NodeId], params: &[TypeId], _arg_types: &[TypeId]) {
        for (&arg, &param) in arg_ids.iter().zip(params) {
            let resolution = match &self.ast.get(arg).kind {
                NodeKind::Symbol { resolution, .. } => resolution.clone(),
                _ => continue,
            };
            if let SymbolResolution::Candidates(candidates) = resolution {
                if let Some(&matched) = candidates.iter().find(|c| self.decl_type(**c) == param) {
                    self.set_symbol_resolution(arg, SymbolResolution::Resolved(matched));
                    self.ast.get_mut(arg).set_eval_type(param);
                }
            }
        }
    }
}
