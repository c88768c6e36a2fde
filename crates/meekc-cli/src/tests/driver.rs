use super::*;
use std::io::Write;

fn write_source(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".meek").tempfile().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn a_clean_program_compiles_with_no_diagnostics_and_a_populated_module() {
    let file = write_source("fn main() -> int { return 1 + 2; }");
    let outcome = compile(file.path()).unwrap();
    assert!(!outcome.has_errors(), "{:?}", outcome.diagnostics);
    assert!(outcome.module.unwrap().get("main").is_some());
}

#[test]
fn an_unresolved_symbol_is_reported_and_suppresses_emission() {
    let file = write_source("fn main() -> int { return undeclared_name; }");
    let outcome = compile(file.path()).unwrap();
    assert!(outcome.has_errors());
    assert!(outcome.module.is_none());
    assert!(!outcome.render_diagnostics().is_empty());
}

#[test]
fn rendered_diagnostics_carry_the_file_name_and_a_line_column_position() {
    let file = write_source("fn main() -> int { return undeclared_name; }");
    let outcome = compile(file.path()).unwrap();
    let rendered = outcome.render_diagnostics();
    assert!(rendered.iter().any(|line| line.contains(':')));
}

#[test]
fn a_missing_file_is_a_process_level_error_not_a_diagnostic() {
    let missing = std::path::Path::new("/nonexistent/path/to/nothing.meek");
    assert!(compile(missing).is_err());
}
