// Tue Jan 13 2026 - Alex

use crate::layout::LayoutError;
use indexmap::IndexMap;

/// A decoded value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I8(i8),
    U8(u8),
    Char16(u16),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Pointer(u64),
    Array(Vec<Value>),
    Struct(IndexMap<&'static str, Value>),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::I8(_) => "i8",
            Self::U8(_) => "u8",
            Self::Char16(_) => "char16",
            Self::I16(_) => "i16",
            Self::U16(_) => "u16",
            Self::I32(_) => "i32",
            Self::U32(_) => "u32",
            Self::I64(_) => "i64",
            Self::U64(_) => "u64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Pointer(_) => "pointer",
            Self::Array(_) => "array",
            Self::Struct(_) => "struct",
        }
    }

    fn mismatch(&self, expected: &'static str) -> LayoutError {
        LayoutError::TypeMismatch {
            expected,
            found: self.kind().to_string(),
        }
    }

    pub fn as_bool(&self) -> Result<bool, LayoutError> {
        match self {
            Self::Bool(v) => Ok(*v),
            _ => Err(self.mismatch("bool")),
        }
    }

    /// Unsigned integers, UTF-16 code units and pointers widen to `u64`.
    pub fn as_u64(&self) -> Result<u64, LayoutError> {
        match self {
            Self::U8(v) => Ok(u64::from(*v)),
            Self::Char16(v) | Self::U16(v) => Ok(u64::from(*v)),
            Self::U32(v) => Ok(u64::from(*v)),
            Self::U64(v) | Self::Pointer(v) => Ok(*v),
            _ => Err(self.mismatch("unsigned integer")),
        }
    }

    pub fn as_i64(&self) -> Result<i64, LayoutError> {
        match self {
            Self::I8(v) => Ok(i64::from(*v)),
            Self::I16(v) => Ok(i64::from(*v)),
            Self::I32(v) => Ok(i64::from(*v)),
            Self::I64(v) => Ok(*v),
            _ => Err(self.mismatch("signed integer")),
        }
    }

    pub fn as_f64(&self) -> Result<f64, LayoutError> {
        match self {
            Self::F32(v) => Ok(f64::from(*v)),
            Self::F64(v) => Ok(*v),
            _ => Err(self.mismatch("float")),
        }
    }

    pub fn as_array(&self) -> Result<&[Value], LayoutError> {
        match self {
            Self::Array(items) => Ok(items),
            _ => Err(self.mismatch("array")),
        }
    }

    pub fn into_array(self) -> Result<Vec<Value>, LayoutError> {
        match self {
            Self::Array(items) => Ok(items),
            other => Err(other.mismatch("array")),
        }
    }

    pub fn field(&self, name: &str) -> Result<&Value, LayoutError> {
        match self {
            Self::Struct(fields) => fields
                .get(name)
                .ok_or_else(|| LayoutError::FieldNotFound(name.to_string())),
            _ => Err(self.mismatch("struct")),
        }
    }
}
