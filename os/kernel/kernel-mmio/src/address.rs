use core::fmt;
use core::ops::{Add, AddAssign};

/// Address of a byte register on the I/O bus.
///
/// A thin wrapper around `u32` that keeps bus addresses apart from plain
/// integers (port indices, channel numbers, register values). The raw value
/// is preserved exactly; no translation happens here.
///
/// ```rust
/// # use kernel_mmio::IoAddress;
/// let base = IoAddress::new(0xF200_0100);
/// assert_eq!((base + 3).as_u32(), 0xF200_0103);
/// assert_eq!(format!("{base}"), "0xF2000100");
/// ```
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct IoAddress(u32);

impl IoAddress {
    #[inline]
    #[must_use]
    pub const fn new(v: u32) -> Self {
        Self(v)
    }

    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// `self + by`, usable in `const` contexts.
    #[inline]
    #[must_use]
    pub const fn offset(self, by: u32) -> Self {
        Self(self.0 + by)
    }
}

impl fmt::Debug for IoAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IO(0x{:08X})", self.0)
    }
}

impl fmt::Display for IoAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

impl fmt::LowerHex for IoAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for IoAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

impl From<u32> for IoAddress {
    #[inline]
    fn from(v: u32) -> Self {
        Self::new(v)
    }
}

impl From<IoAddress> for u32 {
    #[inline]
    fn from(v: IoAddress) -> Self {
        v.0
    }
}

impl Add<u32> for IoAddress {
    type Output = Self;
    #[inline]
    fn add(self, rhs: u32) -> Self::Output {
        self.offset(rhs)
    }
}

impl AddAssign<u32> for IoAddress {
    #[inline]
    fn add_assign(&mut self, rhs: u32) {
        self.0 += rhs;
    }
}
