// Tue Jan 13 2026 - Alex

use std::fmt;
use std::ops::{Add, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address {
    value: u64,
}

impl Address {
    pub const fn new(value: u64) -> Self {
        Self { value }
    }

    pub const fn zero() -> Self {
        Self { value: 0 }
    }

    pub fn as_u64(&self) -> u64 {
        self.value
    }

    pub fn is_null(&self) -> bool {
        self.value == 0
    }

    pub fn checked_add(&self, rhs: u64) -> Option<Self> {
        self.value.checked_add(rhs).map(Self::new)
    }

    /// Position-independent rebase: `self - preferred + actual`, wrapping.
    pub fn rebase(&self, preferred: Address, actual: Address) -> Self {
        Self::new(self.value.wrapping_sub(preferred.value).wrapping_add(actual.value))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.value)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.value, f)
    }
}

impl Add<u64> for Address {
    type Output = Self;
    fn add(self, rhs: u64) -> Self::Output {
        Self { value: self.value.wrapping_add(rhs) }
    }
}

impl Sub<u64> for Address {
    type Output = Self;
    fn sub(self, rhs: u64) -> Self::Output {
        Self { value: self.value.wrapping_sub(rhs) }
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl From<Address> for u64 {
    fn from(addr: Address) -> Self {
        addr.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebase() {
        let symbol = Address::new(0x1000);
        let rebased = symbol.rebase(Address::zero(), Address::new(0x4000));
        assert_eq!(rebased.as_u64(), 0x5000);
    }

    #[test]
    fn test_rebase_below_preferred_base() {
        let symbol = Address::new(0x7fff_5fc0_1000);
        let rebased = symbol.rebase(Address::new(0x7fff_5fc0_0000), Address::new(0x1_0000));
        assert_eq!(rebased.as_u64(), 0x1_1000);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Address::new(0x1234)), "0x0000000000001234");
        assert_eq!(format!("{:x}", Address::new(0x1234)), "1234");
    }
}
