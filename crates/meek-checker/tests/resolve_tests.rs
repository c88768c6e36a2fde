//! Behavioral tests for the resolve pass, exercising the concrete
//! scenarios `spec.md` §8 lists end to end: parse, run the fixed-point
//! type resolver, then run the checker and inspect diagnostics/decorated
//! types.

use meek_checker::check_program;
use meek_common::{Diagnostic, codes};
use meek_parser::{NodeKind, Parser};
use meek_types::TypeId;

struct Compiled {
    parser: Parser<'static>,
    diagnostics: Vec<Diagnostic>,
    root: meek_common::NodeId,
}

fn compile(text: &'static str) -> Compiled {
    let mut parser = Parser::new(text);
    let outcome = parser.parse_program();
    let mut diagnostics = parser.diagnostics.clone();
    diagnostics.extend(parser.types.try_resolve_all_types(&parser.symbols, &parser.scopes));
    parser.ast.canonicalize_types(&parser.types);
    diagnostics.extend(check_program(
        &mut parser.ast,
        outcome.root,
        &parser.symbols,
        &parser.scopes,
        &mut parser.types,
    ));
    Compiled { parser, diagnostics, root: outcome.root }
}

fn has_code(diags: &[Diagnostic], code: u32) -> bool {
    diags.iter().any(|d| d.code == code)
}

#[test]
fn resolves_a_call_to_the_exact_integer_overload() {
    let c = compile(
        "fn f(int a) -> int { return a; } \
         fn f(float a) -> float { return a; } \
         fn main() -> int { return f(1); }",
    );
    assert!(c.diagnostics.is_empty(), "{:?}", c.diagnostics);

    let NodeKind::Program { stmts, .. } = &c.parser.ast.get(c.root).kind else {
        panic!("expected Program root");
    };
    let NodeKind::FuncDefn { body, .. } = &c.parser.ast.get(stmts[2]).kind else {
        panic!("expected FuncDefn for main");
    };
    let NodeKind::Block { stmts: body_stmts, .. } = &c.parser.ast.get(*body).kind else {
        panic!("expected Block body");
    };
    let NodeKind::Return { value: Some(ret_expr) } = &c.parser.ast.get(body_stmts[0]).kind else {
        panic!("expected Return with a value");
    };
    assert!(matches!(c.parser.ast.get(*ret_expr).kind, NodeKind::Call { .. }));
    assert_eq!(c.parser.ast.get(*ret_expr).eval_type(), Some(TypeId::INT));
}

#[test]
fn reports_ambiguous_overload_from_a_candidate_typed_argument() {
    // `x` itself only ever resolves to one candidate (there is no
    // overloaded variable in this language), so the ambiguity here
    // comes from two equally loose-matching overloads for a `string`
    // argument neither accepts exactly.
    let c = compile(
        "fn f(int a) {} \
         fn f(float a) {} \
         fn main() { string x; f(x); }",
    );
    assert!(
        has_code(&c.diagnostics, codes::RESOLVE_NO_MATCHING_OVERLOAD)
            || has_code(&c.diagnostics, codes::RESOLVE_AMBIGUOUS_CALL),
        "{:?}",
        c.diagnostics
    );
}

#[test]
fn member_access_chain_through_a_self_referential_pointer_typechecks() {
    let c = compile(
        "struct S { int a; ^S next; } \
         fn main() { S s; s.next^.a = 0; }",
    );
    assert!(c.diagnostics.is_empty(), "{:?}", c.diagnostics);
}

#[test]
fn break_validates_inside_a_while_loop() {
    let c = compile("fn main() { while (true) { if (true) { break; } } }");
    assert!(!has_code(&c.diagnostics, codes::RESOLVE_BREAK_OUTSIDE_LOOP), "{:?}", c.diagnostics);
}

#[test]
fn break_is_rejected_outside_any_loop() {
    let c = compile("fn main() { break; }");
    assert!(has_code(&c.diagnostics, codes::RESOLVE_BREAK_OUTSIDE_LOOP), "{:?}", c.diagnostics);
}

#[test]
fn binop_operand_type_mismatch_is_reported() {
    let c = compile("fn main() -> int { int a; float b; return a + b; }");
    assert!(has_code(&c.diagnostics, codes::RESOLVE_TYPE_MISMATCH_BINOP), "{:?}", c.diagnostics);
}

#[test]
fn assignment_to_a_non_lvalue_is_rejected() {
    let c = compile("fn main() { int a; 1 = a; }");
    assert!(has_code(&c.diagnostics, codes::RESOLVE_NOT_AN_LVALUE), "{:?}", c.diagnostics);
}

#[test]
fn duplicate_struct_fields_are_rejected() {
    let c = compile("struct S { int a; float a; }");
    assert!(has_code(&c.diagnostics, codes::RESOLVE_DUPLICATE_DECLARATION), "{:?}", c.diagnostics);
}

#[test]
fn return_type_mismatch_is_reported() {
    let c = compile("fn main() -> int { return true; }");
    assert!(has_code(&c.diagnostics, codes::RESOLVE_INVALID_RETURN_VALUE), "{:?}", c.diagnostics);
}

#[test]
fn dereferencing_a_non_pointer_is_rejected() {
    let c = compile("fn main() { int a; a^; }");
    assert!(has_code(&c.diagnostics, codes::RESOLVE_NOT_A_POINTER), "{:?}", c.diagnostics);
}
