//! Payload widths and the numeric transforms applied to raw payloads.

use core::fmt;

use either::Either::{self, Left, Right};
use zerocopy::TryFromBytes;

/// The number of payload bytes following a frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// One byte.
    U8,
    /// Two bytes, little-endian.
    U16,
    /// Four bytes, little-endian.
    U32,
}

impl Width {
    /// The width in bytes.
    pub const fn bytes(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }

    /// The largest raw value representable in this width.
    pub const fn max(self) -> u32 {
        match self {
            Self::U8 => u8::MAX as u32,
            Self::U16 => u16::MAX as u32,
            Self::U32 => u32::MAX,
        }
    }
}

/// A pure transform from a raw unsigned payload to a physical value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// The raw value, unchanged.
    Identity,
    /// `raw / divisor`.
    Linear { divisor: f64 },
    /// `raw / divisor + offset`.
    Affine { divisor: f64, offset: f64 },
    /// Lookup of an [`AssistLevel`], keeping unknown raw values.
    Assist,
}

impl Scale {
    /// Convert a raw payload to its physical value.
    pub fn decode(self, raw: u32) -> Value {
        let raw_f = f64::from(raw);

        match self {
            Self::Identity => Value::Number(raw_f),
            Self::Linear { divisor } => Value::Number(raw_f / divisor),
            Self::Affine { divisor, offset } => Value::Number(raw_f / divisor + offset),
            Self::Assist => Value::Assist(AssistLevel::from_raw(raw)),
        }
    }

    /// Convert a physical value back to the nearest raw payload.
    ///
    /// Returns `None` if the value is of the wrong kind for this transform, is
    /// not finite, or falls outside the `u32` range.
    pub fn encode(self, value: &Value) -> Option<u32> {
        let raw = match (self, value) {
            (Self::Identity, Value::Number(x)) => *x,
            (Self::Linear { divisor }, Value::Number(x)) => x * divisor,
            (Self::Affine { divisor, offset }, Value::Number(x)) => (x - offset) * divisor,
            (Self::Assist, Value::Assist(Left(level))) => return Some(u32::from(u8::from(*level))),
            (Self::Assist, Value::Assist(Right(raw))) => return Some(*raw),
            _ => return None,
        };

        if !raw.is_finite() {
            return None;
        }

        let raw = round_half_away(raw);
        if (0.0..=f64::from(u32::MAX)).contains(&raw) {
            Some(raw as u32)
        } else {
            None
        }
    }
}

// `f64::round` is not available without the standard library.
fn round_half_away(x: f64) -> f64 {
    let t = x as i64 as f64;
    let d = x - t;
    if d >= 0.5 {
        t + 1.0
    } else if d <= -0.5 {
        t - 1.0
    } else {
        t
    }
}

/// A decoded physical value.
///
/// Serializes as a bare number, or as the assist level name.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum Value {
    /// A measurement, in the unit of its field rule.
    Number(f64),
    /// A motor assist level, or the raw value if it names no known level.
    Assist(
        #[cfg_attr(feature = "serde", serde(with = "either::serde_untagged"))]
        Either<AssistLevel, u32>,
    ),
}

impl Value {
    /// The value as a number, if it is a measurement.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(x) => Some(*x),
            Self::Assist(_) => None,
        }
    }

    /// The assist level, if this is a known assist level.
    pub fn assist(&self) -> Option<AssistLevel> {
        match self {
            Self::Assist(Left(level)) => Some(*level),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(x) => write!(f, "{x}"),
            Self::Assist(Left(level)) => write!(f, "{level}"),
            Self::Assist(Right(raw)) => write!(f, "{raw}"),
        }
    }
}

/// Motor assist mode.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromBytes)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AssistLevel {
    Off = 0,
    Eco = 1,
    Trail = 2,
    Turbo = 3,
}

impl AssistLevel {
    /// Look up a raw payload, returning it unchanged if it names no level.
    pub fn from_raw(raw: u32) -> Either<Self, u32> {
        let Ok(r) = u8::try_from(raw) else {
            return Right(raw);
        };

        let level: Result<Self, _> = zerocopy::try_transmute!(r);
        level.map_or(Right(raw), Left)
    }

    /// The capitalised display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Eco => "Eco",
            Self::Trail => "Trail",
            Self::Turbo => "Turbo",
        }
    }
}

impl From<AssistLevel> for u8 {
    fn from(level: AssistLevel) -> u8 {
        level as u8
    }
}

impl fmt::Display for AssistLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
