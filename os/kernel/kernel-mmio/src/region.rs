use crate::IoAddress;
use core::fmt;

/// A contiguous window of byte registers, `[start, start + len - 1]`.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct IoRegion {
    start: IoAddress,
    len: u32,
}

impl IoRegion {
    #[inline]
    #[must_use]
    pub const fn new(start: IoAddress, len: u32) -> Self {
        Self { start, len }
    }

    #[inline]
    #[must_use]
    pub const fn start(&self) -> IoAddress {
        self.start
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Last address inside the window (inclusive). Equals `start` for an
    /// empty window.
    #[inline]
    #[must_use]
    pub const fn last(&self) -> IoAddress {
        self.start.offset(self.len.saturating_sub(1))
    }

    #[must_use]
    pub const fn contains(&self, address: IoAddress) -> bool {
        !self.is_empty()
            && address.as_u32() >= self.start.as_u32()
            && address.as_u32() <= self.last().as_u32()
    }

    /// Whether the two windows share at least one address.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.start.as_u32() <= other.last().as_u32() && other.start.as_u32() <= self.last().as_u32()
    }
}

impl fmt::Debug for IoRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IoRegion({:#x}..={:#x})", self.start, self.last())
    }
}

impl fmt::Display for IoRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}-{:#x}", self.start, self.last())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn window(start: u32, len: u32) -> IoRegion {
        IoRegion::new(IoAddress::new(start), len)
    }

    #[test]
    fn last_is_inclusive() {
        let w = window(0xF200_0104, 4);
        assert_eq!(w.last().as_u32(), 0xF200_0107);
        assert!(w.contains(IoAddress::new(0xF200_0104)));
        assert!(w.contains(IoAddress::new(0xF200_0107)));
        assert!(!w.contains(IoAddress::new(0xF200_0108)));
    }

    #[test]
    fn adjacent_windows_do_not_overlap() {
        let a = window(0x100, 4);
        let b = window(0x104, 4);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn partial_overlap_is_detected() {
        let a = window(0x100, 4);
        let b = window(0x103, 8);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(window(0x0, 0x1000).overlaps(&a));
    }

    #[test]
    fn empty_window_overlaps_nothing() {
        let e = window(0x100, 0);
        assert!(e.is_empty());
        assert!(!e.overlaps(&window(0x100, 4)));
        assert!(!e.contains(IoAddress::new(0x100)));
    }

    #[test]
    fn display_matches_range_notation() {
        assert_eq!(format!("{}", window(0xF200_0100, 4)), "0xf2000100-0xf2000103");
    }
}
