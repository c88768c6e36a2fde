use super::*;
use crate::span::{LineIndex, Span};

#[test]
fn render_formats_file_line_col_message() {
    let text = "int x;\nx = 1 + \"a\";\n";
    let index = LineIndex::new(text);
    let bad_span = Span::new(text.find('x').unwrap() as u32 + 8, 0);
    let diag = Diagnostic::error(codes::RESOLVE_TYPE_MISMATCH_BINOP, bad_span, "type mismatch");
    let rendered = diag.render("main.meek", &index);
    assert!(rendered.starts_with("main.meek:2:"));
    assert!(rendered.ends_with("type mismatch"));
}
