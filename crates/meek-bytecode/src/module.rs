//! `BytecodeModule`: a named collection of [`BytecodeFunction`]s plus
//! the canonical persisted-layout writer `spec.md` §6 describes. Not
//! named in `spec.md` itself — needed so the CLI has a single artifact
//! to hand `--emit-bytecode` (`SPEC_FULL.md` §4.5), grounded on
//! `original_source/src/bytecode.h`'s `BytecodeBuilder` owning an array
//! of `BytecodeFunction`s.

use crate::function::BytecodeFunction;

const MAGIC: u32 = 0x4D45454B; // "MEEK" in ASCII, little-endian on disk.
const VERSION: u32 = 1;

#[derive(Debug, Default)]
pub struct BytecodeModule {
    functions: Vec<(String, BytecodeFunction)>,
}

impl BytecodeModule {
    pub fn new() -> Self {
        BytecodeModule::default()
    }

    pub fn push_function(&mut self, name: impl Into<String>, func: BytecodeFunction) {
        self.functions.push((name.into(), func));
    }

    pub fn functions(&self) -> &[(String, BytecodeFunction)] {
        &self.functions
    }

    pub fn get(&self, name: &str) -> Option<&BytecodeFunction> {
        self.functions.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    /// A function's position in the table, i.e. the index [`Opcode::Call`](crate::opcode::Opcode::Call)
    /// addresses it by.
    pub fn index_of(&self, name: &str) -> Option<u32> {
        self.functions.iter().position(|(n, _)| n == name).map(|i| i as u32)
    }

    /// The canonical persisted layout (`spec.md` §6): `u32` magic, `u32`
    /// version, `u32` functionCount, then for each function a `u32`
    /// byteCount followed by that many bytes and a parallel `u32`-length
    /// line-number array, all little-endian. Not versioned for external
    /// consumption — round-tripping through this layout is only meant to
    /// survive one compiler's own write followed by its own read.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&MAGIC.to_le_bytes());
        out.extend_from_slice(&VERSION.to_le_bytes());
        out.extend_from_slice(&(self.functions.len() as u32).to_le_bytes());
        for (_, func) in &self.functions {
            out.extend_from_slice(&(func.bytes().len() as u32).to_le_bytes());
            out.extend_from_slice(func.bytes());
            out.extend_from_slice(&(func.line_numbers().len() as u32).to_le_bytes());
            for line in func.line_numbers() {
                out.extend_from_slice(&line.to_le_bytes());
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "tests/module.rs"]
mod tests;
