//! Driver instance lifecycle: initialization and teardown.

use crate::device::DRIVER_INFO;
use crate::discovery::DiscoveryEngine;
use crate::platform::Platform;
use crate::{InitError, IoParam, PortTable};
use kernel_mmio::{RegionArbiter, RegisterIo};
use log::{debug, info, warn};

/// How the driver is brought up.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct DriverConfig {
    pub platform: Platform,
    /// Caller-asserted base addresses; empty selects probing.
    pub io: IoParam,
    /// Refuse to start without `io` addresses (the loadable-module build).
    pub require_io: bool,
}

impl DriverConfig {
    /// Probe every selectable address on `platform`.
    #[must_use]
    pub const fn probing(platform: Platform) -> Self {
        Self {
            platform,
            io: IoParam::empty(),
            require_io: false,
        }
    }

    /// Enable exactly the ports named in `io`.
    #[must_use]
    pub const fn explicit(platform: Platform, io: IoParam) -> Self {
        Self {
            platform,
            io,
            require_io: false,
        }
    }

    #[must_use]
    pub const fn requiring_io(mut self) -> Self {
        self.require_io = true;
        self
    }
}

/// An initialized HT2020 driver instance.
///
/// Owns the register bus and the port table. Every found port in the table
/// holds both of its I/O windows until [`teardown`](Self::teardown).
#[derive(Debug)]
pub struct Ht2020<B> {
    pub(crate) platform: Platform,
    pub(crate) table: PortTable,
    pub(crate) bus: B,
}

impl<B: RegisterIo> Ht2020<B> {
    /// Discover ports and reserve their windows from `arbiter`.
    ///
    /// # Errors
    /// - [`InitError::NoIoAddressSupplied`] if `config.require_io` is set and
    ///   `config.io` is empty.
    /// - [`InitError::NoValidAddresses`], [`InitError::NotFound`] or
    ///   [`InitError::ReservationExhausted`] from discovery and reservation.
    ///
    /// No window is left claimed on error.
    pub fn init<A: RegionArbiter + ?Sized>(
        config: &DriverConfig,
        bus: B,
        arbiter: &mut A,
    ) -> Result<Self, InitError> {
        if config.require_io && config.io.is_empty() {
            warn!("{}", InitError::NoIoAddressSupplied);
            return Err(InitError::NoIoAddressSupplied);
        }

        let mut table = PortTable::new();
        let found = DiscoveryEngine::new(config.platform, &mut table).run(&config.io, &bus, arbiter)?;
        debug!("{found} port(s) enabled");
        info!("{DRIVER_INFO}");

        Ok(Self {
            platform: config.platform,
            table,
            bus,
        })
    }
}

impl<B> Ht2020<B> {
    #[must_use]
    pub const fn table(&self) -> &PortTable {
        &self.table
    }

    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    #[must_use]
    pub const fn bus(&self) -> &B {
        &self.bus
    }

    /// `(port, base_address)` of every enabled port, for reporting.
    pub fn enabled_ports(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.table
            .entries()
            .filter(|&(port, _)| self.table.is_found(port))
    }

    /// Release every held window back to `arbiter`.
    ///
    /// The host must guarantee no channel request is in flight or will be
    /// issued afterwards. Calling it again is a no-op.
    ///
    /// Returns the number of windows released.
    pub fn teardown<A: RegionArbiter + ?Sized>(&mut self, arbiter: &mut A) -> usize {
        let released = DiscoveryEngine::new(self.platform, &mut self.table).release_all(arbiter);
        debug!("teardown released {released} window(s)");
        released
    }
}
