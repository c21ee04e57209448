//! Decoding of single frames.

use thiserror::Error;
use zerocopy::FromBytes;

use super::{registry::Registry, scale::Value};

/// Sender byte plus channel byte.
pub const HEADER_SIZE: usize = 2;

/// An error decoding a frame.
///
/// None of these are fatal: the frame is dropped and the next one decodes
/// independently.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The frame is too short to hold a header.
    #[error("Frame of {len} bytes is shorter than its header.")]
    Structural { len: usize },
    /// No rule is registered for the pair.
    #[error("No rule for sender {sender:#04x}, channel {channel:#04x}.")]
    Unrecognized { sender: u8, channel: u8 },
    /// The payload is shorter than the rule's width.
    #[error(
        "Payload for sender {sender:#04x}, channel {channel:#04x} has {found} bytes, expected {expected}."
    )]
    Truncated {
        sender: u8,
        channel: u8,
        expected: usize,
        found: usize,
    },
}

impl DecodeError {
    /// Whether this is routine, rather than a sign of a faulty device or
    /// transport.
    ///
    /// Bikes emit channels the registry does not model, so unrecognized
    /// fields are expected.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::Unrecognized { .. })
    }
}

/// A frame decoded to its physical value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedField {
    pub sender: u8,
    pub channel: u8,
    pub name: &'static str,
    pub value: Value,
    pub unit: Option<&'static str>,
}

#[repr(C, packed)]
#[derive(FromBytes)]
struct FrameHeader {
    sender: u8,
    channel: u8,
}

/// Decode a frame against a registry.
///
/// Exactly the rule's width of payload bytes is read; any trailing bytes are
/// ignored.
pub fn decode(frame: &[u8], registry: &Registry) -> Result<DecodedField, DecodeError> {
    let Some((header, payload)) = frame.split_first_chunk::<HEADER_SIZE>() else {
        return Err(DecodeError::Structural { len: frame.len() });
    };

    let FrameHeader { sender, channel } = zerocopy::transmute!(*header);

    let rule = registry
        .lookup(sender, channel)
        .ok_or(DecodeError::Unrecognized { sender, channel })?;

    let width = rule.width.bytes();
    let bytes = payload.get(..width).ok_or(DecodeError::Truncated {
        sender,
        channel,
        expected: width,
        found: payload.len(),
    })?;

    let mut r = [0; 4];
    r[..width].copy_from_slice(bytes);
    let raw = u32::from_le_bytes(r);

    let value = rule.scale.decode(raw);

    tracing::trace!(sender, channel, raw, name = rule.name, "decoded field");

    Ok(DecodedField {
        sender,
        channel,
        name: rule.name,
        value,
        unit: rule.unit,
    })
}
