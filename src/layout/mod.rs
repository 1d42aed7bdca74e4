// Tue Jan 13 2026 - Alex

pub mod array;
pub mod error;
pub mod key;
pub mod layout;
pub mod pointer;
pub mod primitive;
pub mod reader;
pub mod record;
pub mod registry;
pub mod value;

pub use array::ArrayLayout;
pub use error::LayoutError;
pub use key::{PrimitiveType, TypeKey};
pub use layout::{ByteOrder, Layout};
pub use pointer::{PointerLayout, PointerWidth};
pub use primitive::{register_primitives, PrimitiveLayout};
pub use reader::DataReader;
pub use record::{RecordField, StructBuilder, StructLayout};
pub use registry::LayoutRegistry;
pub use value::Value;
