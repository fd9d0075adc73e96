//! # HT2020 Multi-Port I/O Board
//!
//! Hardware-access core for the HT2020: up to sixteen ports, each a block of
//! four byte registers, reached through an 8-bit and a 16-bit I/O window on
//! the host bus.
//!
//! ## Overview
//!
//! The driver does three things, in this order:
//!
//! 1. **Discovery** decides which ports carry a live board, either from an
//!    explicit `io=` address list or by probing every selectable address for
//!    the reset-state signature.
//! 2. **Reservation** claims both I/O windows of each discovered port,
//!    dropping (and cleanly unwinding) any port whose windows are taken.
//! 3. **Dispatch** serves single-byte reads and writes addressed by channel
//!    index, only for ports that made it through the first two steps.
//!
//! Teardown gives every window back.
//!
//! ## Core Components
//!
//! | Component | Type | Role |
//! |-----------|------|------|
//! | Port table | [`PortTable`] | Catalogue of base addresses plus found flags |
//! | Discovery & reservation | [`DiscoveryEngine`] | Explicit scan, probing, window claims, rollback |
//! | Channel dispatch | [`Ht2020::read_channel`] / [`Ht2020::write_channel`] | Validate a channel, one register access |
//! | Sessions | [`ChannelSession`] | One byte per open: EOF on re-read, overflow on re-write |
//!
//! ## Channel Addressing
//!
//! ```text
//! channel = 4 * port + offset      offset 0..=2  data registers
//!                                  offset 3      identification (never exposed)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use kernel_ht2020::{ChannelIndex, ChannelSession, DriverConfig, Ht2020, IoParam, Platform, Transfer};
//! use kernel_mmio::{FakeBus, RegionTable};
//!
//! let bus = FakeBus::new();
//! let mut arbiter = RegionTable::<32>::new();
//! let io: IoParam = "io=0x100".parse().unwrap();
//!
//! let config = DriverConfig::explicit(Platform::ARMADILLO_460, io);
//! let mut drv = Ht2020::init(&config, bus, &mut arbiter).unwrap();
//!
//! let mut s = ChannelSession::open(ChannelIndex::of(0, 2));
//! assert_eq!(drv.write_channel(&mut s, 0x55), Ok(1));
//!
//! let mut s = ChannelSession::open(ChannelIndex::of(0, 2));
//! assert_eq!(drv.read_channel(&mut s), Ok(Transfer::Byte(0x55)));
//! assert_eq!(drv.read_channel(&mut s), Ok(Transfer::EndOfData));
//!
//! assert_eq!(drv.teardown(&mut arbiter), 2);
//! ```
//!
//! ## Concurrency
//!
//! Nothing here locks. Initialization happens before any request can arrive,
//! the host serializes requests per channel, and teardown runs only after the
//! last request has finished.

#![cfg_attr(not(any(test, doctest)), no_std)]

mod channel;
pub mod device;
mod discovery;
mod dispatch;
mod driver;
mod error;
mod params;
pub mod platform;
mod port_table;
mod probe;

pub use channel::{ChannelIndex, ChannelSession, Transfer};
pub use discovery::DiscoveryEngine;
pub use driver::{DriverConfig, Ht2020};
pub use error::{ChannelError, InitError, ParamError, PortTableError, errno};
pub use params::IoParam;
pub use platform::Platform;
pub use port_table::{DEFAULT_BASES, PortTable};
pub use probe::probe_reset_state;
