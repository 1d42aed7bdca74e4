// Fri Jan 16 2026 - Alex

pub mod core;
pub mod dyld;
pub mod error;
pub mod header;
pub mod image;
pub mod layouts;
pub mod view;

#[cfg(test)]
pub(crate) mod fixture;

pub use self::core::MachCore;
pub use dyld::{DyldAllImageInfos, DyldImageInfo, DyldLoadedImage, MachDyld};
pub use error::MachError;
pub use header::{LoadCommand, MachHeader, MachSegment, SymtabCommand, VmProt};
pub use image::MachLoadedImage;
pub use view::{MachView, ViewKind};
