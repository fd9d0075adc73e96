use crate::platform::{DATA_CHANNELS, PROBE_SIGNATURE, SIGNATURE_OFFSET};
use kernel_mmio::{BusError, IoAddress, RegisterIo};

/// Reset-state probe of the port whose 8-bit window starts at `base8`.
///
/// A board fresh out of reset reads zero on its three data registers and
/// [`PROBE_SIGNATURE`] on the identification register. Registers are read in
/// that order and the probe stops at the first mismatch, so an absent port
/// costs as few bus cycles as possible.
///
/// # Errors
/// A failed register access is passed through; the caller decides what an
/// unreadable port means.
pub fn probe_reset_state<B: RegisterIo + ?Sized>(bus: &B, base8: IoAddress) -> Result<bool, BusError> {
    for offset in 0..DATA_CHANNELS {
        if bus.read_register(base8 + offset)? != 0 {
            return Ok(false);
        }
    }
    Ok(bus.read_register(base8 + SIGNATURE_OFFSET)? == PROBE_SIGNATURE)
}
