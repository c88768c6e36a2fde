use super::*;
use meek_common::{NodeId, Span};

#[test]
fn declares_and_looks_up_a_variable() {
    let scopes = ScopeArena::new();
    let mut table = SymbolTable::new();
    let global = ScopeId::GLOBAL;

    table
        .declare(global, "x", SymbolInfo::Var { decl: NodeId(0) }, Span::at(0))
        .unwrap();

    let found = table.lookup_var(&scopes, global, "x", false);
    assert_eq!(found, Some(&SymbolInfo::Var { decl: NodeId(0) }));
}

#[test]
fn duplicate_variable_declaration_is_an_error() {
    let mut table = SymbolTable::new();
    let global = ScopeId::GLOBAL;
    table
        .declare(global, "x", SymbolInfo::Var { decl: NodeId(0) }, Span::at(0))
        .unwrap();

    let err = table
        .declare(global, "x", SymbolInfo::Var { decl: NodeId(1) }, Span::at(5))
        .unwrap_err();
    assert_eq!(err.code, meek_common::codes::RESOLVE_DUPLICATE_DECLARATION);
}

#[test]
fn functions_can_overload_by_sharing_a_name() {
    let mut table = SymbolTable::new();
    let global = ScopeId::GLOBAL;
    table
        .declare(global, "add", SymbolInfo::Func { defn: NodeId(0) }, Span::at(0))
        .unwrap();
    table
        .declare(global, "add", SymbolInfo::Func { defn: NodeId(1) }, Span::at(10))
        .unwrap();

    let scopes = ScopeArena::new();
    let candidates = table.lookup_func(&scopes, global, "add", false);
    assert_eq!(candidates.len(), 2);
}

#[test]
fn a_function_cannot_be_declared_over_a_variable() {
    let mut table = SymbolTable::new();
    let global = ScopeId::GLOBAL;
    table
        .declare(global, "add", SymbolInfo::Var { decl: NodeId(0) }, Span::at(0))
        .unwrap();

    let err = table
        .declare(global, "add", SymbolInfo::Func { defn: NodeId(1) }, Span::at(10))
        .unwrap_err();
    assert_eq!(err.code, meek_common::codes::RESOLVE_DUPLICATE_DECLARATION);
}

#[test]
fn lookup_walks_up_enclosing_scopes() {
    let mut scopes = ScopeArena::new();
    let mut table = SymbolTable::new();
    let global = ScopeId::GLOBAL;
    let inner = scopes.enter(global, ScopeKind::Block);

    table
        .declare(global, "x", SymbolInfo::Var { decl: NodeId(0) }, Span::at(0))
        .unwrap();

    assert!(table.lookup_var(&scopes, inner, "x", false).is_some());
    assert!(table.lookup_var(&scopes, inner, "x", true).is_none());
}

#[test]
fn inner_declaration_shadows_the_outer_one() {
    let mut scopes = ScopeArena::new();
    let mut table = SymbolTable::new();
    let global = ScopeId::GLOBAL;
    let inner = scopes.enter(global, ScopeKind::Block);

    table
        .declare(global, "x", SymbolInfo::Var { decl: NodeId(0) }, Span::at(0))
        .unwrap();
    table
        .declare(inner, "x", SymbolInfo::Var { decl: NodeId(1) }, Span::at(10))
        .unwrap();

    let found = table.lookup_var(&scopes, inner, "x", false);
    assert_eq!(found, Some(&SymbolInfo::Var { decl: NodeId(1) }));
}

#[test]
fn scope_ids_increase_monotonically_with_nesting() {
    let mut scopes = ScopeArena::new();
    let global = ScopeId::GLOBAL;
    let a = scopes.enter(global, ScopeKind::Block);
    let b = scopes.enter(a, ScopeKind::Block);
    assert!(a > global);
    assert!(b > a);
}

#[test]
fn is_within_loop_walks_ancestors() {
    let mut scopes = ScopeArena::new();
    let global = ScopeId::GLOBAL;
    let loop_scope = scopes.enter(global, ScopeKind::Loop);
    let body = scopes.enter(loop_scope, ScopeKind::Block);
    assert!(scopes.is_within_loop(body));
    assert!(!scopes.is_within_loop(global));
}
