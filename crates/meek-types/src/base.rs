//! The built-in base type family. `int`/`float`/`uint` are surface-syntax
//! aliases for their fixed-width equivalents (`s32`/`f32`/`u32`): the
//! scanner keeps them as distinct keywords, but [`TypeTable`](crate::TypeTable)
//! interns them to the same [`TypeId`](crate::TypeId).

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseType {
    Bool,
    Byte,
    S16,
    S32,
    S64,
    U16,
    U32,
    U64,
    F32,
    F64,
    Str,
}

impl BaseType {
    pub fn from_token(kind: meek_scanner::TokenKind) -> Option<BaseType> {
        use meek_scanner::TokenKind as K;
        Some(match kind {
            K::Bool => BaseType::Bool,
            K::Byte => BaseType::Byte,
            K::S16 => BaseType::S16,
            K::Int | K::S32 => BaseType::S32,
            K::S64 => BaseType::S64,
            K::Uint | K::U32 => BaseType::U32,
            K::U16 => BaseType::U16,
            K::U64 => BaseType::U64,
            K::Float | K::F32 => BaseType::F32,
            K::F64 => BaseType::F64,
            K::StringKw => BaseType::Str,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            BaseType::Bool => "bool",
            BaseType::Byte => "byte",
            BaseType::S16 => "s16",
            BaseType::S32 => "s32",
            BaseType::S64 => "s64",
            BaseType::U16 => "u16",
            BaseType::U32 => "u32",
            BaseType::U64 => "u64",
            BaseType::F32 => "f32",
            BaseType::F64 => "f64",
            BaseType::Str => "string",
        }
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            BaseType::Byte
                | BaseType::S16
                | BaseType::S32
                | BaseType::S64
                | BaseType::U16
                | BaseType::U32
                | BaseType::U64
        )
    }

    pub fn is_floating(self) -> bool {
        matches!(self, BaseType::F32 | BaseType::F64)
    }

    pub fn is_numeric(self) -> bool {
        self.is_integral() || self.is_floating()
    }

    /// Size in bytes, used by the bytecode emitter to pick sized
    /// instructions (`SPEC_FULL.md` §4.5).
    pub fn size_bytes(self) -> u32 {
        match self {
            BaseType::Bool | BaseType::Byte => 1,
            BaseType::S16 | BaseType::U16 => 2,
            BaseType::S32 | BaseType::U32 | BaseType::F32 => 4,
            BaseType::S64 | BaseType::U64 | BaseType::F64 => 8,
            BaseType::Str => 8, // pointer + length, handled as a fat pointer
        }
    }
}
