//! State containers, one per subsystem.

use std::time::{Duration, SystemTime};

use crate::sans::channel::{BatteryChannel, BikeSettingsChannel, MotorChannel, Sender};

use super::{FromChannels, FromSenders, Reading};

/// Battery state. Used for both the primary and range extender batteries.
#[derive(Debug, Clone, Default, PartialEq, FromChannels)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[channels(BatteryChannel)]
pub struct BatteryState {
    #[channel(CapacityWh)]
    pub capacity_wh: Option<Reading>,
    #[channel(RemainingWh)]
    pub remaining_wh: Option<Reading>,
    #[channel(HealthPct)]
    pub health_pct: Option<Reading>,
    #[channel(TempC)]
    pub temp_c: Option<Reading>,
    #[channel(ChargeCycles)]
    pub charge_cycles: Option<Reading>,
    #[channel(VoltageV)]
    pub voltage_v: Option<Reading>,
    #[channel(CurrentA)]
    pub current_a: Option<Reading>,
    #[channel(ChargePct)]
    pub charge_pct: Option<Reading>,
}

/// Motor and rider state.
#[derive(Debug, Clone, Default, PartialEq, FromChannels)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[channels(MotorChannel)]
pub struct MotorState {
    #[channel(RiderPowerW)]
    pub rider_power_w: Option<Reading>,
    #[channel(CadenceRpm)]
    pub cadence_rpm: Option<Reading>,
    #[channel(SpeedKmh)]
    pub speed_kmh: Option<Reading>,
    #[channel(OdometerKm)]
    pub odometer_km: Option<Reading>,
    #[channel(AssistLevel)]
    pub assist_level: Option<Reading>,
    #[channel(MotorTempC)]
    pub motor_temp_c: Option<Reading>,
    #[channel(MotorPowerW)]
    pub motor_power_w: Option<Reading>,
}

/// Bike configuration, as reported by the bike.
#[derive(Debug, Clone, Default, PartialEq, FromChannels)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[channels(BikeSettingsChannel)]
pub struct BikeSettings {
    #[channel(WheelCircumferenceMm)]
    pub wheel_circumference_mm: Option<Reading>,
    /// Eco assist percentage.
    #[channel(AssistLev1Pct)]
    pub assist_lev1_pct: Option<Reading>,
    /// Trail assist percentage.
    #[channel(AssistLev2Pct)]
    pub assist_lev2_pct: Option<Reading>,
    /// Turbo assist percentage.
    #[channel(AssistLev3Pct)]
    pub assist_lev3_pct: Option<Reading>,
}

/// Everything known about the bike.
///
/// Attribute values are meaningless until [`Snapshot::is_available`] holds.
///
/// With Cargo feature `serde`, a snapshot serializes to a diagnostics dump:
/// one object per container, unset attributes as `null`.
#[derive(Debug, Clone, Default, PartialEq, FromSenders)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[senders(Sender)]
pub struct Snapshot {
    #[sender(Battery)]
    pub battery: BatteryState,
    #[sender(BatteryExtender)]
    pub extender: BatteryState,
    #[sender(Motor)]
    pub motor: MotorState,
    #[sender(BikeSettings)]
    pub settings: BikeSettings,
    /// Number of frames applied to this snapshot.
    pub message_count: u64,
    /// When the last frame was applied.
    pub last_update: Option<SystemTime>,
}

impl Snapshot {
    /// Whether any frame has been applied.
    pub fn is_available(&self) -> bool {
        self.message_count > 0
    }

    /// Time elapsed since the last applied frame, if any was applied.
    ///
    /// Returns zero if the system clock has moved backward since.
    pub fn since_last_update(&self) -> Option<Duration> {
        self.last_update
            .map(|t| t.elapsed().unwrap_or(Duration::ZERO))
    }
}
