//! Constants and helpers for the BLE transport around the decoder.
//!
//! Connecting, pairing and subscribing are left to the application; this
//! module only describes what to look for and what to write.

/// Bluetooth SIG company identifier advertised by Turbo bikes (Nordic
/// Semiconductor).
pub const NORDIC_COMPANY_ID: u16 = 0x0059;

/// Prefix of the manufacturer data advertised by Turbo bikes.
pub const ADVERTISING_MAGIC: &[u8] = b"TURBOHMI";

/// Service carrying unsolicited telemetry notifications.
pub const SERVICE_DATA_NOTIFY: &str = "00000003-3731-3032-494d-484f42525554";
/// Characteristic delivering telemetry frames.
pub const CHAR_NOTIFY: &str = "00000013-3731-3032-494d-484f42525554";

/// Service for requesting individual fields.
pub const SERVICE_DATA_REQUEST: &str = "00000001-3731-3032-494d-484f42525554";
/// Characteristic holding the response to a field request.
pub const CHAR_REQUEST_READ: &str = "00000011-3731-3032-494d-484f42525554";
/// Characteristic accepting field requests built by [`build_request`].
pub const CHAR_REQUEST_WRITE: &str = "00000021-3731-3032-494d-484f42525554";

/// Service for writing settings.
pub const SERVICE_DATA_WRITE: &str = "00000002-3731-3032-494d-484f42525554";
/// Characteristic accepting setting frames.
pub const CHAR_WRITE: &str = "00000012-3731-3032-494d-484f42525554";

/// Whether an advertisement's manufacturer data identifies a Turbo bike.
///
/// Accepts `(company identifier, payload)` entries, as most BLE stacks expose
/// them.
pub fn is_turbo_advertisement<'a>(
    manufacturer_data: impl IntoIterator<Item = (u16, &'a [u8])>,
) -> bool {
    manufacturer_data
        .into_iter()
        .any(|(id, data)| id == NORDIC_COMPANY_ID && data.starts_with(ADVERTISING_MAGIC))
}

/// Build a request asking the bike to report one field.
///
/// The response arrives as an ordinary frame.
pub fn build_request(sender: u8, channel: u8) -> [u8; 2] {
    [sender, channel]
}
