use super::*;
use crate::opcode::Width;

#[test]
fn emit_op_keeps_line_numbers_parallel_to_instruction_starts() {
    let mut f = BytecodeFunction::new();
    f.emit_op(Opcode::LoadImmediate(Width::W32), 1);
    f.emit_u32(1);
    f.emit_op(Opcode::Return, 1);
    assert_eq!(f.line_numbers(), &[1, 1]);
}

#[test]
fn backpatch_to_computes_offset_relative_to_the_following_instruction() {
    let mut f = BytecodeFunction::new();
    f.emit_op(Opcode::JumpIfFalse, 1);
    let field = f.reserve_i16();
    f.emit_op(Opcode::Return, 2);
    let target = f.len();
    f.backpatch_to(field, target).unwrap();
    let written = i16::from_le_bytes([f.bytes()[field], f.bytes()[field + 1]]);
    assert_eq!(written as usize, target - (field + 2));
}

#[test]
fn backpatch_rejects_an_offset_that_overflows_i16() {
    let mut f = BytecodeFunction::new();
    let field = f.reserve_i16();
    assert!(f.backpatch_to(field, field + 2 + i32::from(i16::MAX) as usize + 1).is_err());
}
