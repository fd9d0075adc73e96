//! # Byte-Wide Register Access and Address-Window Reservation
//!
//! This crate provides the two hardware capabilities a simple bus driver
//! needs before it can talk to a board: reading and writing single byte
//! registers, and claiming exclusive ownership of the address windows those
//! registers live in.
//!
//! ## Overview
//!
//! Drivers are written against two small traits rather than against raw
//! pointers:
//!
//! | Capability | Trait | Real implementation | Test implementation |
//! |------------|-------|---------------------|---------------------|
//! | Register access | [`RegisterIo`] | [`MmioBus`] | `FakeBus` (feature `fake`) |
//! | Window ownership | [`RegionArbiter`] | [`RegionTable`] | [`RegionTable`] or any custom recorder |
//!
//! Keeping the driver generic over these traits decouples its state machine
//! from physical hardware: the same discovery and dispatch code runs against
//! memory-mapped registers on the target and against an in-memory register
//! file on the host.
//!
//! ## Address Model
//!
//! * [`IoAddress`]: a 32-bit bus address. Platform window offsets are
//!   already folded in; the value is exactly what the hardware decodes.
//! * [`IoRegion`]: a contiguous, inclusive-end window `[start, start+len-1]`
//!   of byte registers.
//!
//! ```text
//! io8 window of a port         io16 window of the same port
//! ┌──────┬──────┬──────┬──────┐ ┌──────┬──────┬──────┬──────┐
//! │ +0   │ +1   │ +2   │ +3   │ │ +0   │ +1   │ +2   │ +3   │
//! └──────┴──────┴──────┴──────┘ └──────┴──────┴──────┴──────┘
//! ```
//!
//! ## Reservation
//!
//! [`RegionArbiter::request_region`] either grants a window exclusively or
//! reports the current owner of an overlapping claim. Releases must name the
//! exact window that was granted. [`RegionTable`] is a fixed-capacity,
//! allocation-free arbiter suitable for early kernel use.
//!
//! ## Safety
//!
//! Only [`MmioBus::new`] is `unsafe`: constructing it asserts that every
//! address the driver will touch is mapped device memory. All other types are
//! plain bookkeeping.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

#[cfg(feature = "fake")]
extern crate alloc;

mod address;
mod arbiter;
mod bus;
#[cfg(feature = "fake")]
mod fake;
mod mmio;
mod region;

pub use address::IoAddress;
pub use arbiter::{Claim, ClaimError, RegionArbiter, RegionTable};
pub use bus::{BusError, RegisterIo};
#[cfg(feature = "fake")]
pub use fake::{Access, FakeBus};
pub use mmio::MmioBus;
pub use region::IoRegion;
