//! Per-request channel reads and writes.

use crate::driver::Ht2020;
use crate::{ChannelError, ChannelIndex, ChannelSession, Transfer};
use kernel_mmio::{IoAddress, RegisterIo};
use log::trace;

impl<B: RegisterIo> Ht2020<B> {
    /// Register address behind `channel`, if it may be accessed.
    ///
    /// # Errors
    /// - [`ChannelError::InvalidChannel`] for a port beyond the table or the
    ///   reserved identification register.
    /// - [`ChannelError::PortNotPresent`] if the port was not enabled.
    pub fn register_address(&self, channel: ChannelIndex) -> Result<IoAddress, ChannelError> {
        let (port, offset) = channel.decode()?;
        if !self.table.is_found(port) {
            return Err(ChannelError::PortNotPresent { port });
        }
        let base = self
            .table
            .base_address(port)
            .map_err(|_| ChannelError::PortNotPresent { port })?;
        Ok(self.platform.io8(base) + offset)
    }

    /// Read the session's register.
    ///
    /// The first successful read of a session delivers one byte; later reads
    /// report [`Transfer::EndOfData`] without touching the bus.
    ///
    /// # Errors
    /// Addressing errors from [`register_address`](Self::register_address),
    /// or [`ChannelError::IoFault`] if the access failed. The cursor only
    /// moves on success.
    pub fn read_channel(&self, session: &mut ChannelSession) -> Result<Transfer, ChannelError> {
        let address = self.register_address(session.channel())?;
        if session.is_consumed() {
            return Ok(Transfer::EndOfData);
        }

        let value = self.bus.read_register(address)?;
        session.advance();
        trace!("{address} -> {value:#04x}");
        Ok(Transfer::Byte(value))
    }

    /// Write `value` to the session's register.
    ///
    /// Returns the number of bytes written, always 1.
    ///
    /// # Errors
    /// Addressing errors from [`register_address`](Self::register_address),
    /// [`ChannelError::Overflow`] once the session's byte has been used, or
    /// [`ChannelError::IoFault`] if the access failed.
    pub fn write_channel(&self, session: &mut ChannelSession, value: u8) -> Result<usize, ChannelError> {
        let address = self.register_address(session.channel())?;
        if session.is_consumed() {
            return Err(ChannelError::Overflow);
        }

        self.bus.write_register(address, value)?;
        session.advance();
        trace!("{address} <- {value:#04x}");
        Ok(1)
    }
}
