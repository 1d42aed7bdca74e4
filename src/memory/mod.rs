// Tue Jan 13 2026 - Alex

pub mod address;
pub mod buffer;
pub mod error;
pub mod mmap;
pub mod range;
pub mod space;
pub mod traits;

pub use address::Address;
pub use buffer::BufferSource;
pub use error::MemoryError;
pub use mmap::MmapSource;
pub use range::MemoryRange;
pub use space::{SegmentAddressSpace, SegmentMapping};
pub use traits::DataSource;
