use super::*;
use crate::opcode::{Opcode, Width};

#[test]
fn to_bytes_writes_the_canonical_header_and_per_function_layout() {
    let mut module = BytecodeModule::new();
    let mut main = BytecodeFunction::new();
    main.emit_op(Opcode::LoadImmediate(Width::W32), 1);
    main.emit_u32(1);
    main.emit_op(Opcode::Return, 1);
    module.push_function("main", main);

    let bytes = module.to_bytes();
    assert_eq!(u32::from_le_bytes(bytes[0..4].try_into().unwrap()), MAGIC);
    assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), VERSION);
    assert_eq!(u32::from_le_bytes(bytes[8..12].try_into().unwrap()), 1);

    let byte_count = u32::from_le_bytes(bytes[12..16].try_into().unwrap()) as usize;
    let func_bytes = &bytes[16..16 + byte_count];
    assert_eq!(func_bytes, module.get("main").unwrap().bytes());

    let line_count_idx = 16 + byte_count;
    let line_count = u32::from_le_bytes(bytes[line_count_idx..line_count_idx + 4].try_into().unwrap());
    assert_eq!(line_count as usize, module.get("main").unwrap().line_numbers().len());
}

#[test]
fn empty_module_is_just_the_header() {
    let module = BytecodeModule::new();
    assert_eq!(module.to_bytes().len(), 12);
}
