//! Port discovery and I/O window reservation.
//!
//! Initialization runs in two phases over a [`PortTable`]:
//!
//! 1. **Discovery** marks ports found, either because the caller named their
//!    base address ([`DiscoveryEngine::discover_explicit`]) or because the
//!    board answered the reset-state probe
//!    ([`DiscoveryEngine::discover_by_probe`]).
//! 2. **Reservation** ([`DiscoveryEngine::reserve`]) claims the 8-bit and the
//!    16-bit window of every found port, in table order. A port that loses
//!    either claim is dropped on the spot and whatever it had claimed is given
//!    back, so a found flag always means "both windows held".
//!
//! ```text
//!            ┌──────────┐  io list   ┌──────────────┐
//!   config ─►│ strategy ├───────────►│ explicit scan├──┐
//!            └────┬─────┘            └──────────────┘  │  found
//!                 │ empty                               ├───────► reserve ──► PortTable
//!                 │                  ┌──────────────┐  │
//!                 └─────────────────►│ probe ports  ├──┘
//!                                    └──────────────┘
//! ```
//!
//! [`DiscoveryEngine::release_all`] undoes reservation at teardown.

use crate::device::DRIVER_NAME;
use crate::probe::probe_reset_state;
use crate::{InitError, IoParam, PortTable};
use crate::platform::Platform;
use kernel_mmio::{IoRegion, RegionArbiter, RegisterIo};
use log::{debug, info, trace, warn};

/// Drives discovery and reservation over a borrowed [`PortTable`].
pub struct DiscoveryEngine<'t> {
    platform: Platform,
    table: &'t mut PortTable,
}

impl<'t> DiscoveryEngine<'t> {
    #[must_use]
    pub const fn new(platform: Platform, table: &'t mut PortTable) -> Self {
        Self { platform, table }
    }

    #[must_use]
    pub const fn table(&self) -> &PortTable {
        self.table
    }

    /// Discover by the strategy `io` selects, then reserve.
    ///
    /// Returns the number of ports left holding both windows.
    ///
    /// # Errors
    /// Any [`InitError`] from discovery or reservation. No window is held
    /// when an error is returned.
    pub fn run<B, A>(&mut self, io: &IoParam, bus: &B, arbiter: &mut A) -> Result<usize, InitError>
    where
        B: RegisterIo + ?Sized,
        A: RegionArbiter + ?Sized,
    {
        if io.is_empty() {
            self.discover_by_probe(bus)?;
        } else {
            self.discover_explicit(io.as_slice())?;
        }
        self.reserve(arbiter)
    }

    /// Trust the caller: mark every catalogue entry whose base address is in
    /// `addresses`. No hardware is touched.
    ///
    /// Returns the number of ports marked.
    ///
    /// # Errors
    /// [`InitError::NoValidAddresses`] if no address matched the catalogue.
    pub fn discover_explicit(&mut self, addresses: &[u32]) -> Result<usize, InitError> {
        let mut found_count = 0;
        for &address in addresses {
            let mut matched = false;
            for (port, base) in self.table.entries() {
                if base != address {
                    continue;
                }
                matched = true;
                if self.table.is_found(port) {
                    debug!("0x{base:X} given more than once");
                    continue;
                }
                if self.table.mark_found(port).is_ok() {
                    found_count += 1;
                    info!("access enabled at 0x{base:X}");
                }
            }
            if !matched {
                debug!("0x{address:X} is not a selectable base address");
            }
        }

        if self.table.count_found() == 0 {
            warn!("{}", InitError::NoValidAddresses);
            return Err(InitError::NoValidAddresses);
        }
        Ok(found_count)
    }

    /// Probe every catalogue entry in table order and mark the ones that
    /// answer with the reset-state signature.
    ///
    /// A port whose registers cannot be read counts as absent.
    ///
    /// Returns the number of ports marked.
    ///
    /// # Errors
    /// [`InitError::NotFound`] if no port passed the probe.
    pub fn discover_by_probe<B: RegisterIo + ?Sized>(&mut self, bus: &B) -> Result<usize, InitError> {
        let mut found_count = 0;
        for (port, base) in self.table.entries() {
            match probe_reset_state(bus, self.platform.io8(base)) {
                Ok(true) => {
                    if self.table.mark_found(port).is_ok() {
                        found_count += 1;
                        info!("HT2020 found at 0x{base:X}");
                    }
                }
                Ok(false) => trace!("nothing at 0x{base:X}"),
                Err(e) => warn!("probe at 0x{base:X} aborted: {e}"),
            }
        }

        if self.table.count_found() == 0 {
            warn!("{}", InitError::NotFound);
            return Err(InitError::NotFound);
        }
        Ok(found_count)
    }

    /// Claim both windows of every found port, dropping ports that cannot
    /// get them.
    ///
    /// Returns the number of ports still found.
    ///
    /// # Errors
    /// [`InitError::ReservationExhausted`] as soon as the last found port is
    /// dropped. Each dropped port released its own claims before that, so
    /// nothing is held.
    pub fn reserve<A: RegionArbiter + ?Sized>(&mut self, arbiter: &mut A) -> Result<usize, InitError> {
        let mut found_count = self.table.count_found();

        for (port, _) in self.table.entries() {
            if !self.table.is_found(port) {
                continue;
            }
            let Some((io8, io16)) = self.windows(port) else {
                continue;
            };

            if let Err(e) = arbiter.request_region(io8, DRIVER_NAME) {
                warn!("I/O port {io8} was not free: {e}");
                self.drop_port(port);
                found_count -= 1;
                if found_count == 0 {
                    return Err(self.exhausted());
                }
                continue;
            }

            if let Err(e) = arbiter.request_region(io16, DRIVER_NAME) {
                warn!("I/O port {io16} was not free: {e}");
                Self::release(arbiter, io8);
                self.drop_port(port);
                found_count -= 1;
                if found_count == 0 {
                    return Err(self.exhausted());
                }
            }
        }

        Ok(found_count)
    }

    /// Release both windows of every found port and clear its flag.
    ///
    /// Returns the number of windows handed back; zero when nothing is found.
    pub fn release_all<A: RegionArbiter + ?Sized>(&mut self, arbiter: &mut A) -> usize {
        let mut released = 0;
        for (port, _) in self.table.entries() {
            if !self.table.is_found(port) {
                continue;
            }
            if let Some((io8, io16)) = self.windows(port) {
                released += usize::from(Self::release(arbiter, io16));
                released += usize::from(Self::release(arbiter, io8));
            }
            self.drop_port(port);
        }
        released
    }

    fn windows(&self, port: usize) -> Option<(IoRegion, IoRegion)> {
        let io8 = self.table.io8_window(self.platform, port).ok()?;
        let io16 = self.table.io16_window(self.platform, port).ok()?;
        Some((io8, io16))
    }

    fn drop_port(&mut self, port: usize) {
        if self.table.clear_found(port).is_err() {
            warn!("port {port} is not in the table");
        }
    }

    fn exhausted(&self) -> InitError {
        debug_assert_eq!(self.table.count_found(), 0);
        warn!("{}", InitError::ReservationExhausted);
        InitError::ReservationExhausted
    }

    fn release<A: RegionArbiter + ?Sized>(arbiter: &mut A, region: IoRegion) -> bool {
        match arbiter.release_region(region) {
            Ok(()) => {
                debug!("released {region}");
                true
            }
            Err(e) => {
                warn!("could not release {region}: {e}");
                false
            }
        }
    }
}
