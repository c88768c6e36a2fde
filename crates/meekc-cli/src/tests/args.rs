use super::*;

#[test]
fn bare_path_defaults_every_flag_off() {
    let args = CliArgs::parse_from(["meekc", "main.meek"]);
    assert_eq!(args.path.to_str(), Some("main.meek"));
    assert!(args.emit_bytecode.is_none());
    assert!(!args.dump_ast);
    assert!(!args.dump_types);
    assert!(!args.dump_bytecode);
    assert_eq!(args.verbose, 0);
}

#[test]
fn emit_bytecode_takes_an_output_path() {
    let args = CliArgs::parse_from(["meekc", "main.meek", "--emit-bytecode", "out.bc"]);
    assert_eq!(args.emit_bytecode.unwrap().to_str(), Some("out.bc"));
}

#[test]
fn repeated_verbose_flags_escalate_the_default_log_directive() {
    let quiet = CliArgs::parse_from(["meekc", "main.meek"]);
    let debug = CliArgs::parse_from(["meekc", "main.meek", "-v"]);
    let trace = CliArgs::parse_from(["meekc", "main.meek", "-vv"]);
    assert_eq!(quiet.default_log_directive(), "warn");
    assert_eq!(debug.default_log_directive(), "debug");
    assert_eq!(trace.default_log_directive(), "trace");
}

#[test]
fn dump_flags_are_independent() {
    let args = CliArgs::parse_from(["meekc", "main.meek", "--dump-ast", "--dump-bytecode"]);
    assert!(args.dump_ast);
    assert!(args.dump_bytecode);
    assert!(!args.dump_types);
}
