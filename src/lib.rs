// Tue Jan 15 2026 - Alex

pub mod config;
pub mod layout;
pub mod mach;
pub mod memory;
pub mod utils;

pub use config::Config;
pub use layout::{ByteOrder, DataReader, Layout, LayoutError, LayoutRegistry, PointerWidth, TypeKey, Value};
pub use mach::{MachCore, MachDyld, MachError, MachLoadedImage, MachView};
pub use memory::{Address, DataSource, MemoryError};
