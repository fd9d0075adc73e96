//! Catalogue of selectable port base addresses and their "found" flags.

use crate::platform::{PORTS_MAX, Platform, WINDOW_LEN};
use crate::PortTableError;
use kernel_mmio::IoRegion;

/// Base addresses the board's jumpers can select, in port order.
pub const DEFAULT_BASES: [u32; PORTS_MAX] = [
    0x100, 0x104, 0x108, 0x10c, 0x110, 0x114, 0x118, 0x11c, //
    0x120, 0x124, 0x128, 0x12c, 0x130, 0x134, 0x138, 0x13c,
];

/// Fixed, ordered port catalogue with a parallel found flag per entry.
///
/// The index into the table is the canonical port identifier. A set flag
/// means both I/O windows of that port are held by the driver; keeping that
/// true is the discovery engine's job, the table only stores the bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortTable {
    bases: [u32; PORTS_MAX],
    found: u16,
}

impl Default for PortTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PortTable {
    /// Table over [`DEFAULT_BASES`] with no port found.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_bases(DEFAULT_BASES)
    }

    #[must_use]
    pub const fn with_bases(bases: [u32; PORTS_MAX]) -> Self {
        Self { bases, found: 0 }
    }

    /// Catalogue base address of `port`.
    ///
    /// # Errors
    /// [`PortTableError::OutOfRange`] if `port >= 16`.
    pub const fn base_address(&self, port: usize) -> Result<u32, PortTableError> {
        if port >= PORTS_MAX {
            return Err(PortTableError::OutOfRange { port });
        }
        Ok(self.bases[port])
    }

    /// # Errors
    /// [`PortTableError::OutOfRange`] if `port >= 16`.
    pub const fn mark_found(&mut self, port: usize) -> Result<(), PortTableError> {
        match Self::bit(port) {
            Ok(bit) => {
                self.found |= bit;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// # Errors
    /// [`PortTableError::OutOfRange`] if `port >= 16`.
    pub const fn clear_found(&mut self, port: usize) -> Result<(), PortTableError> {
        match Self::bit(port) {
            Ok(bit) => {
                self.found &= !bit;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Whether `port` is marked found. Out-of-range ports never are.
    #[must_use]
    pub const fn is_found(&self, port: usize) -> bool {
        match Self::bit(port) {
            Ok(bit) => self.found & bit != 0,
            Err(_) => false,
        }
    }

    #[must_use]
    pub const fn count_found(&self) -> usize {
        self.found.count_ones() as usize
    }

    /// `(port, base_address)` for every catalogue entry, in table order.
    ///
    /// The iterator owns a copy of the catalogue, so found flags may be
    /// changed while walking it.
    pub fn entries(&self) -> impl Iterator<Item = (usize, u32)> + use<> {
        self.bases.into_iter().enumerate()
    }

    /// Found ports in table order.
    pub fn found_ports(&self) -> impl Iterator<Item = usize> + '_ {
        (0..PORTS_MAX).filter(|&port| self.is_found(port))
    }

    /// Every port whose catalogue address equals `address`.
    pub fn ports_at(&self, address: u32) -> impl Iterator<Item = usize> + '_ {
        (0..PORTS_MAX).filter(move |&port| self.bases[port] == address)
    }

    /// The 4-byte window of `port` in 8-bit I/O space.
    ///
    /// # Errors
    /// [`PortTableError::OutOfRange`] if `port >= 16`.
    pub const fn io8_window(&self, platform: Platform, port: usize) -> Result<IoRegion, PortTableError> {
        match self.base_address(port) {
            Ok(base) => Ok(IoRegion::new(platform.io8(base), WINDOW_LEN)),
            Err(e) => Err(e),
        }
    }

    /// The 4-byte window of `port` in 16-bit I/O space.
    ///
    /// # Errors
    /// [`PortTableError::OutOfRange`] if `port >= 16`.
    pub const fn io16_window(&self, platform: Platform, port: usize) -> Result<IoRegion, PortTableError> {
        match self.base_address(port) {
            Ok(base) => Ok(IoRegion::new(platform.io16(base), WINDOW_LEN)),
            Err(e) => Err(e),
        }
    }

    const fn bit(port: usize) -> Result<u16, PortTableError> {
        if port >= PORTS_MAX {
            return Err(PortTableError::OutOfRange { port });
        }
        Ok(1 << port)
    }
}
