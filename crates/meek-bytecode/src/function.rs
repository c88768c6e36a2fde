//! A single function's compiled output: a byte stream plus a parallel
//! sequence of source line numbers, one per instruction start
//! (`spec.md` §4.5), grounded on `original_source/src/bytecode.h`'s
//! `BytecodeFunction`.

use crate::opcode::Opcode;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BytecodeFunction {
    bytes: Vec<u8>,
    /// `line_numbers[i]` is the source line the instruction starting at
    /// some byte index logged alongside it came from; immediate operand
    /// bytes that follow an opcode don't get their own entry.
    line_numbers: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitError {
    pub message: &'static str,
}

impl BytecodeFunction {
    pub fn new() -> Self {
        BytecodeFunction::default()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn line_numbers(&self) -> &[u32] {
        &self.line_numbers
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Emit an opcode at the current byte index, recording `line` as its
    /// instruction-start line number.
    pub fn emit_op(&mut self, op: Opcode, line: u32) {
        self.line_numbers.push(line);
        op.encode(&mut self.bytes);
    }

    pub fn emit_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn emit_i16(&mut self, value: i16) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn emit_u32(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn emit_i64(&mut self, value: i64) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn emit_f32_bits(&mut self, value: f32) {
        self.bytes.extend_from_slice(&value.to_bits().to_le_bytes());
    }

    pub fn emit_f64_bits(&mut self, value: f64) {
        self.bytes.extend_from_slice(&value.to_bits().to_le_bytes());
    }

    /// Reserve a 16-bit jump-offset field at the current byte index,
    /// returning its index so a later `backpatch_i16` can fill it in.
    /// Placeholder bytes are `0` so an un-patched field is conspicuous
    /// in a hex dump rather than silently looking like a valid offset.
    pub fn reserve_i16(&mut self) -> usize {
        let idx = self.bytes.len();
        self.bytes.extend_from_slice(&[0, 0]);
        idx
    }

    /// Back-patch a 16-bit field reserved by `reserve_i16` with the
    /// offset from the instruction following that field to `target`
    /// (`spec.md` §4.5's "offsets are signed 16-bit relative to the
    /// instruction following the offset field").
    pub fn backpatch_to(&mut self, field_index: usize, target: usize) -> Result<(), EmitError> {
        let from = field_index as i64 + 2;
        let rel = target as i64 - from;
        let rel: i16 = rel.try_into().map_err(|_| EmitError {
            message: "jump offset does not fit in a signed 16-bit field",
        })?;
        self.bytes[field_index..field_index + 2].copy_from_slice(&rel.to_le_bytes());
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/function.rs"]
mod tests;
