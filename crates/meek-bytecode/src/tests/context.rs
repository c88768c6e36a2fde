use super::*;
use meek_parser::Parser;

fn parsed(text: &'static str) -> (Parser<'static>, NodeId) {
    let mut parser = Parser::new(text);
    let outcome = parser.parse_program();
    parser.types.try_resolve_all_types(&parser.symbols, &parser.scopes);
    parser.ast.canonicalize_types(&parser.types);
    (parser, outcome.root)
}

#[test]
fn frame_layout_assigns_sequential_offsets_by_declaration_order() {
    let (parser, root) = parsed("fn main() { int a; float b; }");
    let line_index = LineIndex::new("");
    let mut emitter = Emitter::new(&parser.ast, &parser.symbols, &parser.scopes, &parser.types, &line_index);

    let NodeKind::Program { stmts, .. } = &parser.ast.get(root).kind else { panic!() };
    let NodeKind::FuncDefn { scope, params, body, .. } = parser.ast.get(stmts[0]).kind.clone() else {
        panic!("expected FuncDefn")
    };
    emitter.compute_frame_layout(scope, params, body);

    assert_eq!(emitter.frame_size, 4 + 4); // s32 `a` then f32 `b`, both 4 bytes
    assert_eq!(emitter.frame.len(), 2);
}

#[test]
fn compile_function_skips_stack_alloc_when_the_frame_is_empty() {
    let (parser, root) = parsed("fn main() -> int { return 1 + 2; }");
    let (module, diags) = compile_program(&parser.ast, root, &parser.symbols, &parser.scopes, &parser.types, "");
    assert!(diags.is_empty(), "{:?}", diags);
    let main = module.get("main").unwrap();
    // No locals: the emitted stream is exactly the four instructions
    // `spec.md` §8's concrete scenario names, nothing else.
    assert_eq!(main.line_numbers().len(), 4);
}
