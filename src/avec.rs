//! Stateful aggregation of decoded fields into a snapshot of the bike.
//!
//! _Requires Cargo feature `std`._
//!
//! The [`Aggregator`] is the single write path: it decodes each frame, routes
//! the field to the container for its sender through [`FromSenders`], then to
//! an attribute through [`FromChannels`]. Both traits are normally derived,
//! which turns the routing tables into exhaustive `match` expressions checked
//! by the compiler.

pub mod aggregator;
pub mod state;

pub use aggregator::{Aggregator, Update, UpdateError};
pub use state::{BatteryState, BikeSettings, MotorState, Snapshot};

use crate::sans::{AssistLevel, DecodedField, Value};

/// The last value received for an attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Reading {
    pub value: Value,
    pub unit: Option<&'static str>,
    /// The channel the value arrived on.
    pub channel: u8,
}

impl Reading {
    /// The value as a number, if it is a measurement.
    pub fn as_f64(&self) -> Option<f64> {
        self.value.as_f64()
    }

    /// The assist level, if this is a known assist level.
    pub fn assist(&self) -> Option<AssistLevel> {
        self.value.assist()
    }
}

impl From<&DecodedField> for Reading {
    fn from(field: &DecodedField) -> Self {
        Self {
            value: field.value,
            unit: field.unit,
            channel: field.channel,
        }
    }
}

/// Derive [`FromChannels`] for a state container.
///
/// # Example
///
/// Name the channel enum with the `channels(E)` attribute on the struct, and
/// give every `Option<Reading>` attribute a `channel(V)` attribute, where `V`
/// is a variant of `E`. Each variant must be assigned to exactly one
/// attribute: an unassigned variant fails to compile, as does one assigned
/// twice. `E` must implement `TryFrom<u8>`.
///
/// ```
/// #[derive(Debug, Default, FromChannels)]
/// #[channels(BikeSettingsChannel)]
/// struct Settings {
///     #[channel(WheelCircumferenceMm)]
///     wheel: Option<Reading>,
///     #[channel(AssistLev1Pct)]
///     eco: Option<Reading>,
///     #[channel(AssistLev2Pct)]
///     trail: Option<Reading>,
///     #[channel(AssistLev3Pct)]
///     turbo: Option<Reading>,
/// }
/// ```
pub use crankset_derive::FromChannels;

/// Receive readings for the attributes of one subsystem.
///
/// See the [`FromChannels`](macro@FromChannels) derive macro for an automatic
/// implementation of this trait.
pub trait FromChannels {
    /// Overwrite the attribute for a channel.
    ///
    /// Returns `false`, leaving every attribute unchanged, if no attribute
    /// corresponds to the channel.
    fn add_reading(&mut self, channel: u8, reading: Reading) -> bool;
}

/// Derive [`FromSenders`] for a snapshot of containers.
///
/// # Example
///
/// Name the sender enum with the `senders(E)` attribute on the struct, and
/// mark each container with `sender(V)`. As with
/// [`FromChannels`](macro@FromChannels), each variant must be assigned exactly
/// once. Unmarked fields are left alone.
///
/// ```
/// #[derive(Debug, Default, FromSenders)]
/// #[senders(Sender)]
/// struct Bike {
///     #[sender(Battery)]
///     battery: BatteryState,
///     #[sender(BatteryExtender)]
///     extender: BatteryState,
///     #[sender(Motor)]
///     motor: MotorState,
///     #[sender(BikeSettings)]
///     settings: BikeSettings,
///     frames: u64,
/// }
/// ```
pub use crankset_derive::FromSenders;

/// Produce state containers for a snapshot.
///
/// See the [`FromSenders`](macro@FromSenders) derive macro for an automatic
/// implementation of this trait.
pub trait FromSenders {
    /// Retrieve the container for a sender, if one exists.
    fn add_sender(&mut self, sender: u8) -> Option<&mut dyn FromChannels>;
}
