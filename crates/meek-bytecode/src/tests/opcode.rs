use super::*;

#[test]
fn int_arith_picks_width_from_base_type() {
    assert_eq!(Opcode::int_arith(IntArith::Add, BaseType::S32), Some(Opcode::IntArith(IntArith::Add, Width::W32)));
    assert_eq!(Opcode::int_arith(IntArith::Add, BaseType::Byte), Some(Opcode::IntArith(IntArith::Add, Width::W8)));
    assert_eq!(Opcode::int_arith(IntArith::Add, BaseType::F32), None);
}

#[test]
fn div_int_carries_signedness() {
    assert_eq!(Opcode::div_int(BaseType::S16), Some(Opcode::DivInt(Width::W16, Signedness::Signed)));
    assert_eq!(Opcode::div_int(BaseType::U16), Some(Opcode::DivInt(Width::W16, Signedness::Unsigned)));
}

#[test]
fn cmp_dispatches_to_float_family_for_floating_base_types() {
    assert_eq!(Opcode::cmp(Cmp::Less, BaseType::F64), Some(Opcode::CmpFloat(Cmp::Less, FloatWidth::F64)));
    assert_eq!(
        Opcode::cmp(Cmp::Less, BaseType::S64),
        Some(Opcode::CmpInt(Cmp::Less, Width::W64, Signedness::Signed))
    );
}

#[test]
fn string_base_type_has_no_arithmetic_opcode() {
    assert_eq!(Opcode::int_arith(IntArith::Add, BaseType::Str), None);
    assert_eq!(Opcode::float_arith(FloatArith::Add, BaseType::Str), None);
    assert_eq!(Opcode::negate(BaseType::Str), None);
}

#[test]
fn rem_int_has_no_floating_point_counterpart() {
    assert_eq!(
        Opcode::rem_int(BaseType::U32),
        Some(Opcode::RemInt(Width::W32, Signedness::Unsigned))
    );
    assert_eq!(Opcode::rem_int(BaseType::F32), None);
}

#[test]
fn width_for_bytes_covers_every_sized_slot() {
    assert_eq!(width_for_bytes(1), Some(Width::W8));
    assert_eq!(width_for_bytes(2), Some(Width::W16));
    assert_eq!(width_for_bytes(4), Some(Width::W32));
    assert_eq!(width_for_bytes(8), Some(Width::W64));
    assert_eq!(width_for_bytes(3), None);
}

#[test]
fn encode_gives_every_opcode_a_distinct_tag_byte() {
    let mut out = Vec::new();
    Opcode::Return.encode(&mut out);
    let return_tag = out[0];
    out.clear();
    Opcode::Call.encode(&mut out);
    assert_ne!(out[0], return_tag);
    out.clear();
    Opcode::RemInt(Width::W32, Signedness::Signed).encode(&mut out);
    assert_eq!(out.len(), 3);
}
