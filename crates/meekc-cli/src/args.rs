use std::path::PathBuf;

use clap::Parser;

/// CLI arguments for the `meekc` binary (`spec.md` §6, expanded by
/// `SPEC_FULL.md` §6).
#[derive(Parser, Debug)]
#[command(name = "meekc", version, about = "Compile a single Meek source file")]
pub struct CliArgs {
    /// Path to the `.meek` source file to compile.
    pub path: PathBuf,

    /// Persist the canonical bytecode layout to this path.
    #[arg(long = "emit-bytecode", value_name = "OUT")]
    pub emit_bytecode: Option<PathBuf>,

    /// Pretty-print the parsed AST and stop.
    #[arg(long = "dump-ast")]
    pub dump_ast: bool,

    /// Pretty-print the resolved type table and stop.
    #[arg(long = "dump-types")]
    pub dump_types: bool,

    /// Pretty-print the emitted bytecode instead of (or in addition to)
    /// writing it.
    #[arg(long = "dump-bytecode")]
    pub dump_bytecode: bool,

    /// Increase log verbosity; repeatable (`-v` debug, `-vv` trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CliArgs {
    /// The `EnvFilter` directive implied by `-v`/`-vv`, overridable by
    /// `RUST_LOG` the way `tracing_subscriber::EnvFilter::from_default_env`
    /// always lets an explicit environment variable win.
    pub fn default_log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
#[path = "tests/args.rs"]
mod tests;
