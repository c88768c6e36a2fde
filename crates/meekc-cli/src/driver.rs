//! Compile a single source file end to end: scan → parse → resolve
//! types → check → emit, the same phase order `spec.md` §2 describes.
//! Process-level failures (I/O) surface through `anyhow::Result`;
//! everything the compiler itself reports goes through a first-class
//! `Diagnostic` list instead.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use meek_common::SourceFile;
use meek_parser::Parser;
use tracing::debug;

use crate::args::CliArgs;

/// Everything a run of the pipeline produced, regardless of whether it
/// found errors.
pub struct CompileOutcome {
    pub source: SourceFile,
    pub parser: Parser<'static>,
    pub diagnostics: Vec<meek_common::Diagnostic>,
    pub module: Option<meek_bytecode::BytecodeModule>,
}

impl CompileOutcome {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.category == meek_common::DiagnosticCategory::Error)
    }

    pub fn render_diagnostics(&self) -> Vec<String> {
        let file = self.source.display_name();
        self.diagnostics
            .iter()
            .map(|d| d.render(&file, self.source.line_index()))
            .collect()
    }
}

/// Read `path`, run the full pipeline, and return every diagnostic
/// produced along the way. Bytecode is only emitted when parsing,
/// type resolution, and checking all came back clean — `spec.md` §7's
/// "later phases assume earlier ones succeeded".
pub fn compile(path: &Path) -> Result<CompileOutcome> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))?;
    // `Parser` borrows its source text; leaking it is the simplest way
    // to hand back an owned `Parser<'static>` for a single-shot CLI run
    // that exits right after, without fighting a borrow that a short
    // process doesn't need to manage.
    let leaked_text: &'static str = Box::leak(text.clone().into_boxed_str());
    let source = SourceFile::new(path, text);

    debug!(path = %path.display(), "parsing");
    let mut parser = Parser::new(leaked_text);
    let outcome = parser.parse_program();
    let mut diagnostics = parser.diagnostics.clone();

    debug!("resolving types");
    diagnostics.extend(parser.types.try_resolve_all_types(&parser.symbols, &parser.scopes));
    parser.ast.canonicalize_types(&parser.types);

    debug!("running the resolve pass");
    diagnostics.extend(meek_checker::check_program(
        &mut parser.ast,
        outcome.root,
        &parser.symbols,
        &parser.scopes,
        &mut parser.types,
    ));

    let has_errors = diagnostics
        .iter()
        .any(|d| d.category == meek_common::DiagnosticCategory::Error);

    let module = if has_errors {
        None
    } else {
        debug!("emitting bytecode");
        let (module, emit_diagnostics) = meek_bytecode::compile_program(
            &parser.ast,
            outcome.root,
            &parser.symbols,
            &parser.scopes,
            &parser.types,
            &source.text,
        );
        diagnostics.extend(emit_diagnostics);
        Some(module)
    };

    Ok(CompileOutcome { source, parser, diagnostics, module })
}

/// Drive a full `meekc` invocation: compile, optionally dump debug
/// output, optionally persist bytecode, and report the exit-code
/// contract `spec.md` §6 specifies (0 on success, non-zero on any
/// scan/parse/unresolved-type/resolve error).
pub fn run(args: &CliArgs) -> Result<bool> {
    let outcome = compile(&args.path)?;

    for line in outcome.render_diagnostics() {
        eprintln!("{line}");
    }

    if args.dump_ast {
        println!("{:#?}", outcome.parser.ast);
    }
    if args.dump_types {
        println!("{:#?}", outcome.parser.types);
    }

    if outcome.has_errors() {
        return Ok(false);
    }

    let module = outcome.module.as_ref().expect("no errors means emission ran");

    if args.dump_bytecode {
        for (name, func) in module.functions() {
            println!("fn {name}:");
            for (line, _) in func.line_numbers().iter().enumerate() {
                println!("  [{line}]");
            }
        }
    }

    if let Some(out) = &args.emit_bytecode {
        let bytes = module.to_bytes();
        fs::write(out, bytes).with_context(|| format!("failed to write '{}'", out.display()))?;
    }

    Ok(true)
}

/// Read the file at `path` and `bail!` with a process-level error if it
/// doesn't exist — surfaced separately from `compile` so callers that
/// only want a friendlier "no such file" message don't have to pattern-
/// match an `anyhow::Error`'s chain.
pub fn require_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("no such file: '{}'", path.display());
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/driver.rs"]
mod tests;
