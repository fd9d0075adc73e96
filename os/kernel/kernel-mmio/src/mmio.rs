//! Memory-mapped register access.
//!
//! The bus address is turned into a pointer by adding a fixed `origin`
//! (zero when the I/O windows are identity mapped), then accessed with a
//! single volatile load or store.

use crate::{BusError, IoAddress, RegisterIo};

/// [`RegisterIo`] backed by real memory-mapped device registers.
#[derive(Debug)]
pub struct MmioBus {
    origin: usize,
}

impl MmioBus {
    /// Create a bus that accesses `origin + address` for every register.
    ///
    /// # Safety
    /// You must uphold **all** of the following:
    /// - **Mapping:** every address the driver will hand to this bus, offset
    ///   by `origin`, is mapped as device (uncached) memory for the lifetime
    ///   of the bus.
    /// - **Ownership:** the accessed windows are reserved for the caller, so
    ///   no other driver issues conflicting accesses.
    /// - **Width:** the device tolerates 8-bit accesses at those addresses.
    #[must_use]
    pub const unsafe fn new(origin: usize) -> Self {
        Self { origin }
    }

    #[inline]
    fn ptr(&self, address: IoAddress) -> *mut u8 {
        self.origin.wrapping_add(address.as_u32() as usize) as *mut u8
    }
}

impl RegisterIo for MmioBus {
    #[inline]
    fn read_register(&self, address: IoAddress) -> Result<u8, BusError> {
        // SAFETY: mapping and ownership were asserted by `MmioBus::new`.
        Ok(unsafe { core::ptr::read_volatile(self.ptr(address)) })
    }

    #[inline]
    fn write_register(&self, address: IoAddress, value: u8) -> Result<(), BusError> {
        // SAFETY: mapping and ownership were asserted by `MmioBus::new`.
        unsafe { core::ptr::write_volatile(self.ptr(address), value) };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accesses_plain_memory_through_origin() {
        let mut backing = [0u8, 0, 0, 0xFF];
        let origin = backing.as_mut_ptr() as usize;
        // SAFETY: the "device" is a local array covering addresses 0..4.
        let bus = unsafe { MmioBus::new(origin) };

        assert_eq!(bus.read_register(IoAddress::new(3)), Ok(0xFF));
        bus.write_register(IoAddress::new(1), 0x55).unwrap();
        assert_eq!(bus.read_register(IoAddress::new(1)), Ok(0x55));
        assert_eq!(backing[1], 0x55);
    }
}
