// Fri Jan 16 2026 - Alex

use crate::mach::MachView;
use crate::memory::Address;
use std::fmt;

/// A loaded module: where it lives, what it was loaded from, and a view of it.
#[derive(Debug)]
pub struct MachLoadedImage {
    image: MachView,
    load_address: Address,
    path: String,
}

impl MachLoadedImage {
    pub fn new(image: MachView, load_address: Address, path: String) -> Self {
        Self {
            image,
            load_address,
            path,
        }
    }

    pub fn image(&self) -> &MachView {
        &self.image
    }

    pub fn load_address(&self) -> Address {
        self.load_address
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for MachLoadedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.load_address, self.path)
    }
}
