//! Board-level constants and the I/O window layout.

use kernel_mmio::IoAddress;

/// Number of selectable port base addresses on the board.
pub const PORTS_MAX: usize = 16;

/// Byte registers behind each port (and the size of each I/O window).
pub const CHANNELS_PER_PORT: u32 = 4;

/// Registers at offsets `0..DATA_CHANNELS` are exposed as channels; the
/// register at [`SIGNATURE_OFFSET`] is not.
pub const DATA_CHANNELS: u32 = 3;

/// Offset of the identification register read by the reset-state probe.
pub const SIGNATURE_OFFSET: u32 = 3;

/// Value the identification register holds while the board is in reset.
pub const PROBE_SIGNATURE: u8 = 0xFF;

/// Length of the 8-bit and of the 16-bit window reserved per port.
pub const WINDOW_LEN: u32 = CHANNELS_PER_PORT;

/// Where the 8-bit and 16-bit I/O spaces are decoded on the host bus.
///
/// A port's table base address is added to these offsets to obtain the two
/// windows the driver reserves:
///
/// ```text
/// base8(i)  = io8_base  + base_address[i]
/// base16(i) = io16_base + base_address[i]
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Platform {
    pub io8_base: u32,
    pub io16_base: u32,
}

impl Platform {
    /// ISA-style I/O windows of the Armadillo-460.
    pub const ARMADILLO_460: Self = Self {
        io8_base: 0xF200_0000,
        io16_base: 0xF400_0000,
    };

    #[inline]
    #[must_use]
    pub const fn io8(self, base_address: u32) -> IoAddress {
        IoAddress::new(self.io8_base + base_address)
    }

    #[inline]
    #[must_use]
    pub const fn io16(self, base_address: u32) -> IoAddress {
        IoAddress::new(self.io16_base + base_address)
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::ARMADILLO_460
    }
}
