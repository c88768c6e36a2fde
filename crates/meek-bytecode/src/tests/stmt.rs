use super::*;
use crate::context::Emitter;
use meek_checker::check_program;
use meek_common::LineIndex;
use meek_parser::{NodeKind, Parser};

struct Checked {
    parser: Parser<'static>,
    root: meek_common::NodeId,
}

fn checked(text: &'static str) -> Checked {
    let mut parser = Parser::new(text);
    let outcome = parser.parse_program();
    let mut diags = parser.diagnostics.clone();
    diags.extend(parser.types.try_resolve_all_types(&parser.symbols, &parser.scopes));
    parser.ast.canonicalize_types(&parser.types);
    diags.extend(check_program(&mut parser.ast, outcome.root, &parser.symbols, &parser.scopes, &mut parser.types));
    assert!(diags.is_empty(), "{:?}", diags);
    Checked { parser, root: outcome.root }
}

/// The `index`-th top-level `fn`'s `(scope, params, body)`.
fn nth_fn(c: &Checked, index: usize) -> (meek_symbols::ScopeId, meek_common::NodeId, meek_common::NodeId) {
    let NodeKind::Program { stmts, .. } = &c.parser.ast.get(c.root).kind else { panic!() };
    let NodeKind::FuncDefn { scope, params, body, .. } = c.parser.ast.get(stmts[index]).kind.clone() else {
        panic!("expected a FuncDefn")
    };
    (scope, params, body)
}

#[test]
fn if_without_an_else_patches_its_single_false_jump_past_the_then_branch() {
    let c = checked("fn main() -> int { if (1 == 1) { return 1; } return 0; }");
    let (scope, params, body) = nth_fn(&c, 0);
    let line_index = LineIndex::new("");
    let mut emitter = Emitter::new(&c.parser.ast, &c.parser.symbols, &c.parser.scopes, &c.parser.types, &line_index);
    emitter.compute_frame_layout(scope, params, body);
    emitter.compile_stmt(body);
    assert!(emitter.diagnostics().is_empty(), "{:?}", emitter.diagnostics());
    assert!(!emitter.current.bytes().is_empty());
}

#[test]
fn while_loops_own_bookkeeping_does_not_leak_past_its_body() {
    let c = checked("fn main() -> int { int i; i = 0; while (i < 3) { i = i + 1; } return i; }");
    let (scope, params, body) = nth_fn(&c, 0);
    let line_index = LineIndex::new("");
    let mut emitter = Emitter::new(&c.parser.ast, &c.parser.symbols, &c.parser.scopes, &c.parser.types, &line_index);
    emitter.compute_frame_layout(scope, params, body);
    emitter.compile_stmt(body);
    assert!(emitter.diagnostics().is_empty(), "{:?}", emitter.diagnostics());
    assert!(emitter.loops.is_empty());
}

#[test]
fn break_inside_a_nested_if_is_still_patched_to_land_after_the_loop() {
    let c = checked("fn main() -> int { int i; i = 0; while (i < 10) { i = i + 1; if (i == 2) { break; } } return i; }");
    let (scope, params, body) = nth_fn(&c, 0);
    let line_index = LineIndex::new("");
    let mut emitter = Emitter::new(&c.parser.ast, &c.parser.symbols, &c.parser.scopes, &c.parser.types, &line_index);
    emitter.compute_frame_layout(scope, params, body);
    emitter.compile_stmt(body);
    assert!(emitter.diagnostics().is_empty(), "{:?}", emitter.diagnostics());
}

#[test]
fn compound_assignment_reads_the_lvalue_once_before_writing_it_back() {
    let c = checked("fn main() -> int { int a; a = 1; a += 4; return a; }");
    let (scope, params, body) = nth_fn(&c, 0);
    let line_index = LineIndex::new("");
    let mut emitter = Emitter::new(&c.parser.ast, &c.parser.symbols, &c.parser.scopes, &c.parser.types, &line_index);
    emitter.compute_frame_layout(scope, params, body);
    emitter.compile_stmt(body);
    assert!(emitter.diagnostics().is_empty(), "{:?}", emitter.diagnostics());
}

#[test]
fn an_expression_statement_discards_its_leftover_value() {
    let c = checked("fn f() -> int { return 3; } fn main() -> int { f(); return 0; }");
    let (scope, params, body) = nth_fn(&c, 1);
    let line_index = LineIndex::new("");
    let mut emitter = Emitter::new(&c.parser.ast, &c.parser.symbols, &c.parser.scopes, &c.parser.types, &line_index);
    emitter.func_index.insert("f".to_string(), 0);
    emitter.compute_frame_layout(scope, params, body);
    emitter.compile_stmt(body);
    assert!(emitter.diagnostics().is_empty(), "{:?}", emitter.diagnostics());
}
