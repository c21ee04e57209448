#![no_std]

//! A decoder and state aggregator for Specialized Turbo e-bike telemetry.
//!
//! Turbo bikes push one small binary frame per telemetry field over a BLE
//! notify characteristic. Crankset decodes those frames against a declarative
//! field registry, and folds every decoded field into a snapshot of bike state
//! that can be read at any time.
//!
//! Most users should begin with the [`avec::Aggregator`], which owns both the
//! registry and the snapshot. The pure decoding layer in the [`sans`] module
//! performs no I/O and holds no state, and is usable without the standard
//! library.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `std`: enable the state aggregator (default).
//! - `serde`: serialize snapshots for diagnostics (default, implies `std`).

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "std")]
pub mod avec;
pub mod ble;
pub mod sans;
