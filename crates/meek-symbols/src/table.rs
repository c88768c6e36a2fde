//! The symbol table: declares names into scopes and looks them back up.
//!
//! Functions may overload (several `Func` entries share a name within one
//! scope, disambiguated later by call-site argument types); variables and
//! structs may not, so declaring a second one under the same
//! `ScopedIdentifier` is a duplicate-declaration error.

use crate::scope::ScopeId;
use crate::symbol::{ScopedIdentifier, SymbolInfo};
use meek_common::{Diagnostic, Span, codes};
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: FxHashMap<ScopedIdentifier, Vec<SymbolInfo>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Declare `name` in `scope`. Fails with a duplicate-declaration
    /// diagnostic if `name` already names a non-function symbol in this
    /// exact scope, or if a function is declared over a non-function.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        info: SymbolInfo,
        span: Span,
    ) -> Result<(), Diagnostic> {
        let key = ScopedIdentifier::new(name, scope);
        let existing = self.entries.entry(key).or_default();

        if let Some(first) = existing.first() {
            let compatible_overload = info.is_func() && first.is_func();
            if !compatible_overload {
                return Err(Diagnostic::error(
                    codes::RESOLVE_DUPLICATE_DECLARATION,
                    span,
                    format!("'{name}' is already declared in this scope"),
                ));
            }
        }

        existing.push(info);
        Ok(())
    }

    /// Candidates for `name` visible from `scope`, walking up the parent
    /// chain via `scopes.chain`. Stops at the first scope with any entry
    /// (shadowing), unless `ignore_parent` is set, in which case only
    /// `scope` itself is consulted.
    pub fn lookup<'a>(
        &'a self,
        scopes: &crate::scope::ScopeArena,
        scope: ScopeId,
        name: &str,
        ignore_parent: bool,
    ) -> &'a [SymbolInfo] {
        if ignore_parent {
            return self.lookup_in(scope, name);
        }
        for candidate_scope in scopes.chain(scope) {
            let found = self.lookup_in(candidate_scope, name);
            if !found.is_empty() {
                return found;
            }
        }
        &[]
    }

    fn lookup_in(&self, scope: ScopeId, name: &str) -> &[SymbolInfo] {
        self.entries
            .get(&ScopedIdentifier::new(name, scope))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every entry declared directly in `scope` under `name`, without
    /// walking to enclosing scopes. Used by overload resolution
    /// (`spec.md` §4.4), which needs per-scope entries to accumulate
    /// function overloads across the whole chain rather than stopping at
    /// the first shadowing scope the way `lookup_func` does.
    pub fn entries_in_scope(&self, scope: ScopeId, name: &str) -> &[SymbolInfo] {
        self.lookup_in(scope, name)
    }

    pub fn lookup_var(
        &self,
        scopes: &crate::scope::ScopeArena,
        scope: ScopeId,
        name: &str,
        ignore_parent: bool,
    ) -> Option<&SymbolInfo> {
        self.lookup(scopes, scope, name, ignore_parent)
            .iter()
            .find(|s| s.is_var())
    }

    pub fn lookup_type(
        &self,
        scopes: &crate::scope::ScopeArena,
        scope: ScopeId,
        name: &str,
        ignore_parent: bool,
    ) -> Option<&SymbolInfo> {
        self.lookup(scopes, scope, name, ignore_parent)
            .iter()
            .find(|s| s.is_struct())
    }

    pub fn lookup_func(
        &self,
        scopes: &crate::scope::ScopeArena,
        scope: ScopeId,
        name: &str,
        ignore_parent: bool,
    ) -> Vec<&SymbolInfo> {
        self.lookup(scopes, scope, name, ignore_parent)
            .iter()
            .filter(|s| s.is_func())
            .collect()
    }
}
