use super::*;

#[test]
fn merge_covers_both_spans() {
    let a = Span::new(4, 10);
    let b = Span::new(2, 6);
    assert_eq!(a.merge(b), Span::new(2, 10));
}

#[test]
fn merge_with_dummy_returns_the_other() {
    let real = Span::new(3, 7);
    assert_eq!(Span::dummy().merge(real), real);
    assert_eq!(real.merge(Span::dummy()), real);
}

#[test]
fn contains_span_is_inclusive_of_bounds() {
    let outer = Span::new(0, 10);
    assert!(outer.contains_span(Span::new(0, 10)));
    assert!(outer.contains_span(Span::new(2, 8)));
    assert!(!outer.contains_span(Span::new(0, 11)));
}

#[test]
fn slice_extracts_the_covered_text() {
    let text = "fn main() {}";
    let span = Span::new(0, 2);
    assert_eq!(span.slice(text), "fn");
}

#[test]
fn line_index_finds_line_starts() {
    let text = "int x;\nfn f() {\n  return x;\n}\n";
    let index = LineIndex::new(text);
    assert_eq!(index.line_col(0), LineCol { line: 1, column: 1 });
    // 'f' of "fn f()" is right after the first newline.
    let second_line_start = text.find("fn f").unwrap() as u32;
    assert_eq!(
        index.line_col(second_line_start),
        LineCol { line: 2, column: 1 }
    );
    let return_offset = text.find("return").unwrap() as u32;
    assert_eq!(
        index.line_col(return_offset),
        LineCol {
            line: 3,
            column: 3
        }
    );
}
