use super::*;
use meek_common::codes;

fn parse(text: &str) -> Parser<'_> {
    let mut parser = Parser::new(text);
    parser.parse_program();
    parser
}

#[test]
fn parses_the_canonical_return_example() {
    let mut parser = parse("fn main() -> int { return 1 + 2; }");
    assert!(parser.diagnostics.is_empty(), "{:?}", parser.diagnostics);

    let NodeKind::Program { stmts, .. } = &parser.ast.get(parser_root(&mut parser)).kind else {
        panic!("expected Program root");
    };
    assert_eq!(stmts.len(), 1);
    let NodeKind::FuncDefn { name, body, .. } = &parser.ast.get(stmts[0]).kind else {
        panic!("expected FuncDefn");
    };
    assert_eq!(name, "main");

    let NodeKind::Block { stmts: body_stmts, .. } = &parser.ast.get(*body).kind else {
        panic!("expected Block body");
    };
    assert_eq!(body_stmts.len(), 1);
    let NodeKind::Return { value: Some(value) } = &parser.ast.get(body_stmts[0]).kind else {
        panic!("expected Return with a value");
    };
    assert!(matches!(
        parser.ast.get(*value).kind,
        NodeKind::Binop { op: BinOp::Add, .. }
    ));
}

fn parser_root(parser: &mut Parser<'_>) -> meek_common::NodeId {
    // The root is the last node allocated during `parse_program`, since
    // `Program` is built only after every top-level statement.
    meek_common::NodeId((parser.ast.len() - 1) as u32)
}

#[test]
fn self_referential_struct_field_resolves_after_the_fixed_point_pass() {
    let mut parser = parse("struct Node { int value; ^Node next; }");
    let diags = parser
        .types
        .try_resolve_all_types(&parser.symbols, &parser.scopes);
    assert!(diags.is_empty(), "{diags:?}");

    let root = parser_root(&mut parser);
    let NodeKind::Program { stmts, .. } = &parser.ast.get(root).kind else {
        panic!("expected Program root");
    };
    let NodeKind::StructDefn { fields, .. } = &parser.ast.get(stmts[0]).kind else {
        panic!("expected StructDefn");
    };
    assert_eq!(fields.len(), 2);
    let next_field_type = fields[1].ty;
    assert!(!parser.types.get(next_field_type).is_error());
}

#[test]
fn rejects_expression_statements_at_top_level() {
    let mut parser = parse("1 + 2;");
    let root = parser_root(&mut parser);
    let NodeKind::Program { stmts, .. } = &parser.ast.get(root).kind else {
        panic!("expected Program root");
    };
    assert!(matches!(
        parser.ast.get(stmts[0]).kind,
        NodeKind::IllegalTopLevelStmtErr { .. }
    ));
}

#[test]
fn rejects_chained_assignment() {
    let mut parser = parse("fn f() { int a; int b; a = b = 1; }");
    assert!(
        parser.diagnostics.iter().any(|d| d.code == codes::PARSE_CHAINED_ASSIGN),
        "{:?}",
        parser.diagnostics
    );
}

#[test]
fn rejects_a_block_directly_after_a_bare_do() {
    let mut parser = parse("fn f() { do { } }");
    assert!(
        parser.diagnostics.iter().any(|d| d.code == codes::PARSE_ILLEGAL_DO_STMT),
        "{:?}",
        parser.diagnostics
    );
}

#[test]
fn disambiguates_a_struct_typed_declaration_from_a_call_statement() {
    let mut parser = parse("struct Foo { int a; } fn f() { Foo bar; bar.a = 1; }");
    assert!(parser.diagnostics.is_empty(), "{:?}", parser.diagnostics);
}

#[test]
fn recovers_from_a_missing_semicolon_and_keeps_parsing_the_next_statement() {
    let mut parser = parse("fn f() { int a int b; }");
    // The missing `;` after `int a` is reported, but the parser still
    // discovers the second declaration rather than discarding the rest
    // of the block.
    assert!(parser.diagnostics.iter().any(|d| d.code == codes::PARSE_EXPECTED_TOKEN));
    let root = parser_root(&mut parser);
    let NodeKind::Program { stmts, .. } = &parser.ast.get(root).kind else {
        panic!("expected Program root");
    };
    let NodeKind::FuncDefn { body, .. } = &parser.ast.get(stmts[0]).kind else {
        panic!("expected FuncDefn");
    };
    let NodeKind::Block { stmts: body_stmts, .. } = &parser.ast.get(*body).kind else {
        panic!("expected Block body");
    };
    assert_eq!(body_stmts.len(), 2);
}
