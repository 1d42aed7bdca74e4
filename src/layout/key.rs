// Tue Jan 13 2026 - Alex

use std::fmt;

/// The twelve fixed-width scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Bool,
    I8,
    U8,
    Char16,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 12] = [
        Self::Bool,
        Self::I8,
        Self::U8,
        Self::Char16,
        Self::I16,
        Self::U16,
        Self::I32,
        Self::U32,
        Self::I64,
        Self::U64,
        Self::F32,
        Self::F64,
    ];

    pub fn size(self) -> usize {
        match self {
            Self::Bool | Self::I8 | Self::U8 => 1,
            Self::Char16 | Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::Char16 => "char16",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

/// Identity of a logical type in a [`LayoutRegistry`](crate::layout::LayoutRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKey {
    Primitive(PrimitiveType),
    /// Target-width address.
    Pointer,
    Array(Box<TypeKey>, usize),
    /// Record layouts and anything else a provider knows by name.
    Named(&'static str),
}

impl TypeKey {
    pub fn array(element: TypeKey, count: usize) -> Self {
        Self::Array(Box::new(element), count)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_, _))
    }
}

impl From<PrimitiveType> for TypeKey {
    fn from(ty: PrimitiveType) -> Self {
        Self::Primitive(ty)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(ty) => write!(f, "{}", ty.name()),
            Self::Pointer => write!(f, "pointer"),
            Self::Array(elem, count) => write!(f, "[{}; {}]", elem, count),
            Self::Named(name) => write!(f, "{}", name),
        }
    }
}
