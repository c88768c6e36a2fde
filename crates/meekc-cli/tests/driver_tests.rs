//! End-to-end coverage of `meekc`'s exit-code contract (`spec.md` §6):
//! 0 on a clean compile, non-zero on any scan/parse/unresolved-type/
//! resolve error.

use std::io::Write;

use clap::Parser as _;
use meekc::args::CliArgs;
use meekc::driver;

fn write_source(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".meek").tempfile().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn run_succeeds_for_the_concrete_scenario_spec_md_names() {
    let file = write_source("fn main() -> int { return 1 + 2; }");
    let args = CliArgs::parse_from(["meekc", file.path().to_str().unwrap()]);
    let succeeded = driver::run(&args).unwrap();
    assert!(succeeded);
}

#[test]
fn run_fails_for_a_program_with_an_unresolved_symbol() {
    let file = write_source("fn main() -> int { return nope; }");
    let args = CliArgs::parse_from(["meekc", file.path().to_str().unwrap()]);
    let succeeded = driver::run(&args).unwrap();
    assert!(!succeeded);
}

#[test]
fn emit_bytecode_writes_the_canonical_header_to_disk() {
    let src = write_source("fn main() -> int { return 1 + 2; }");
    let out = tempfile::NamedTempFile::new().unwrap();
    let args = CliArgs::parse_from([
        "meekc",
        src.path().to_str().unwrap(),
        "--emit-bytecode",
        out.path().to_str().unwrap(),
    ]);
    let succeeded = driver::run(&args).unwrap();
    assert!(succeeded);
    let bytes = std::fs::read(out.path()).unwrap();
    assert_eq!(u32::from_le_bytes(bytes[0..4].try_into().unwrap()), 0x4D45454B);
}

#[test]
fn require_exists_rejects_a_missing_path() {
    let missing = std::path::Path::new("/nonexistent/path/to/nothing.meek");
    assert!(driver::require_exists(missing).is_err());
}
