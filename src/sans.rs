//! Stateless decoding of telemetry frames.
//!
//! Nothing in this module performs I/O or keeps state between frames, so
//! decoding may be driven from any number of threads at once, or from an
//! embedded transport without the standard library.
//!
//! # Wire Format
//!
//! ```text
//! ┌──────────┬───────────┬──────────────────────┐
//! │ Sender   │ Channel   │ Payload              │
//! │ (1B)     │ (1B)      │ (1, 2 or 4B LE)      │
//! └──────────┴───────────┴──────────────────────┘
//! ```
//!
//! The sender identifies the subsystem a frame originates from, and the
//! channel identifies a field within that subsystem. Neither byte carries the
//! payload width: it is declared by the matching rule in the [`registry`], so
//! frames can only be decoded against one.
//!
//! Multi-byte payloads are always little-endian.

pub mod channel;
pub mod frame;
pub mod registry;
pub mod scale;

pub use channel::Sender;
pub use frame::{DecodeError, DecodedField, decode};
pub use registry::{FieldRule, Registry, RegistryError};
pub use scale::{AssistLevel, Scale, Value, Width};
