use crate::IoAddress;

/// Error returned by a [`RegisterIo`] implementation when the access itself
/// did not complete.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
    #[error("register access at {address} faulted")]
    Fault { address: IoAddress },
}

/// Single byte register access.
///
/// Every call is one bounded bus cycle: no buffering, no retries, no
/// blocking. Implementations take `&self`; device registers are shared state
/// by nature and callers serialize access to any one register themselves.
pub trait RegisterIo {
    /// Read the byte register at `address`.
    ///
    /// # Errors
    /// [`BusError::Fault`] if the bus reported a failed cycle.
    fn read_register(&self, address: IoAddress) -> Result<u8, BusError>;

    /// Write `value` to the byte register at `address`.
    ///
    /// # Errors
    /// [`BusError::Fault`] if the bus reported a failed cycle.
    fn write_register(&self, address: IoAddress, value: u8) -> Result<(), BusError>;
}

impl<T: RegisterIo + ?Sized> RegisterIo for &T {
    #[inline]
    fn read_register(&self, address: IoAddress) -> Result<u8, BusError> {
        (**self).read_register(address)
    }

    #[inline]
    fn write_register(&self, address: IoAddress, value: u8) -> Result<(), BusError> {
        (**self).write_register(address, value)
    }
}
