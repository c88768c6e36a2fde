use super::*;
use meek_checker::check_program;
use meek_common::LineIndex;
use meek_parser::{NodeKind, Parser};

/// Parse, resolve, and check `text`, then hand back everything an
/// `Emitter` needs plus the `main` function's `(scope, params, body)`.
fn checked(text: &'static str) -> (Parser<'static>, meek_common::NodeId, meek_common::NodeId, meek_common::NodeId) {
    let mut parser = Parser::new(text);
    let outcome = parser.parse_program();
    let mut diags = parser.diagnostics.clone();
    diags.extend(parser.types.try_resolve_all_types(&parser.symbols, &parser.scopes));
    parser.ast.canonicalize_types(&parser.types);
    diags.extend(check_program(&mut parser.ast, outcome.root, &parser.symbols, &parser.scopes, &mut parser.types));
    assert!(diags.is_empty(), "{:?}", diags);

    let NodeKind::Program { stmts, .. } = &parser.ast.get(outcome.root).kind else { panic!() };
    let NodeKind::FuncDefn { scope, params, body, .. } = parser.ast.get(stmts[0]).kind.clone() else {
        panic!("expected a FuncDefn")
    };
    (parser, scope, params, body)
}

#[test]
fn an_integer_literal_lowers_to_a_single_sized_immediate() {
    let (parser, _scope, _params, body) = checked("fn main() -> int { return 41; }");
    let line_index = LineIndex::new("");
    let mut emitter = Emitter::new(&parser.ast, &parser.symbols, &parser.scopes, &parser.types, &line_index);

    let NodeKind::Block { stmts, .. } = &parser.ast.get(body).kind else { panic!() };
    let NodeKind::Return { value: Some(v) } = parser.ast.get(stmts[0]).kind.clone() else { panic!() };
    emitter.compile_rvalue(v);

    assert_eq!(emitter.current.line_numbers().len(), 1);
    assert_eq!(emitter.current.bytes().len(), 1 + 1 + 4); // tag + width + u32
}

#[test]
fn negating_a_float_picks_the_float_negate_opcode() {
    let (parser, _scope, _params, body) = checked("fn main() -> float { return -1.5; }");
    let line_index = LineIndex::new("");
    let mut emitter = Emitter::new(&parser.ast, &parser.symbols, &parser.scopes, &parser.types, &line_index);

    let NodeKind::Block { stmts, .. } = &parser.ast.get(body).kind else { panic!() };
    let NodeKind::Return { value: Some(v) } = parser.ast.get(stmts[0]).kind.clone() else { panic!() };
    emitter.compile_rvalue(v);
    // LoadImmediate32 <bits>; NegateFloat32 — two instructions.
    assert_eq!(emitter.current.line_numbers().len(), 2);
    assert!(emitter.diagnostics().is_empty());
}

#[test]
fn a_comparison_dispatches_to_cmp_int_and_is_not_fooled_by_its_decorated_operand_type() {
    let (parser, _scope, _params, body) = checked("fn main() -> int { return 1 == 2; }");
    let line_index = LineIndex::new("");
    let mut emitter = Emitter::new(&parser.ast, &parser.symbols, &parser.scopes, &parser.types, &line_index);

    let NodeKind::Block { stmts, .. } = &parser.ast.get(body).kind else { panic!() };
    let NodeKind::Return { value: Some(v) } = parser.ast.get(stmts[0]).kind.clone() else { panic!() };
    emitter.compile_rvalue(v);
    // LoadImmediate32 1; LoadImmediate32 2; CmpInt.
    assert_eq!(emitter.current.line_numbers().len(), 3);
}

#[test]
fn address_of_a_local_lowers_to_its_frame_offset_rather_than_loading_it() {
    let (parser, scope, params, body) = checked("fn main() -> int { int a; return ^a == ^a; }");
    let line_index = LineIndex::new("");
    let mut emitter = Emitter::new(&parser.ast, &parser.symbols, &parser.scopes, &parser.types, &line_index);
    emitter.compute_frame_layout(scope, params, body);

    let NodeKind::Block { stmts, .. } = &parser.ast.get(body).kind else { panic!() };
    let NodeKind::Return { value: Some(v) } = parser.ast.get(stmts[1]).kind.clone() else { panic!() };
    let NodeKind::Binop { lhs, .. } = parser.ast.get(v).kind.clone() else { panic!("expected comparison") };
    let NodeKind::Unop { operand, .. } = parser.ast.get(lhs).kind.clone() else { panic!("expected ^a") };

    emitter.compile_rvalue(lhs);
    assert!(emitter.diagnostics().is_empty());
    let _ = operand;
    // Taking the operand's address never emits a `Load`.
    assert!(!emitter.current.bytes().contains(&4)); // tag 4 == Opcode::Load's tag
    assert_eq!(emitter.current.line_numbers().len(), 1);
}

#[test]
fn short_circuit_or_skips_the_right_operand_when_the_left_is_already_true() {
    let (parser, _scope, _params, body) = checked("fn main() -> int { if (1 == 1 || 2 == 2) { return 1; } return 0; }");
    let line_index = LineIndex::new("");
    let mut emitter = Emitter::new(&parser.ast, &parser.symbols, &parser.scopes, &parser.types, &line_index);

    let NodeKind::Block { stmts, .. } = &parser.ast.get(body).kind else { panic!() };
    let NodeKind::If { cond, .. } = parser.ast.get(stmts[0]).kind.clone() else { panic!() };
    let patches = emitter.compile_branch_on_false(cond);
    // The right `==`'s `JumpIfFalse` is the only placeholder the caller
    // still needs to patch to the false target; the left operand being
    // true resolves its own internal jump immediately.
    assert_eq!(patches.len(), 1);
    assert!(!emitter.current.bytes().is_empty());
}
