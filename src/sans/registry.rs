//! The table of field rules frames are decoded against.

use alloc::{collections::BTreeMap, vec::Vec};

use thiserror::Error;

use super::{
    channel::{BatteryChannel, BikeSettingsChannel, MotorChannel, Sender},
    scale::{Scale, Width},
};

/// How to decode the payload of one `(sender, channel)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRule {
    pub sender: u8,
    pub channel: u8,
    /// Attribute name, unique within a sender.
    pub name: &'static str,
    pub unit: Option<&'static str>,
    pub width: Width,
    pub scale: Scale,
}

impl FieldRule {
    pub const fn new(
        sender: u8,
        channel: u8,
        name: &'static str,
        unit: Option<&'static str>,
        width: Width,
        scale: Scale,
    ) -> Self {
        Self {
            sender,
            channel,
            name,
            unit,
            width,
            scale,
        }
    }

    /// Build the wire frame carrying a raw payload for this rule.
    ///
    /// Bits of `raw` beyond the rule's width are dropped.
    pub fn frame(&self, raw: u32) -> Vec<u8> {
        let mut frame = Vec::with_capacity(2 + self.width.bytes());
        frame.push(self.sender);
        frame.push(self.channel);
        frame.extend_from_slice(&raw.to_le_bytes()[..self.width.bytes()]);
        frame
    }
}

/// An error building a registry.
///
/// These indicate a defect in the rule table, and should abort
/// initialisation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A rule is already registered for the pair.
    #[error("A rule is already registered for sender {sender:#04x}, channel {channel:#04x}.")]
    Conflict { sender: u8, channel: u8 },
    /// The duplication target already has rules.
    #[error("Sender {0:#04x} already has rules registered.")]
    Occupied(u8),
    /// The duplication source has no rules.
    #[error("Sender {0:#04x} has no rules to duplicate.")]
    EmptySource(u8),
}

/// Field rules keyed by `(sender, channel)`.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    rules: BTreeMap<(u8, u8), FieldRule>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry of every field known to be sent by Turbo bikes.
    ///
    /// The range extender battery reuses the primary battery's rules.
    pub fn turbo() -> Result<Self, RegistryError> {
        let mut registry = Self::new();

        for rule in BATTERY.iter().chain(MOTOR).chain(BIKE_SETTINGS) {
            registry.register(*rule)?;
        }

        registry.duplicate_source(Sender::Battery.into(), Sender::BatteryExtender.into())?;

        Ok(registry)
    }

    /// Add a rule, refusing to shadow an existing one.
    pub fn register(&mut self, rule: FieldRule) -> Result<(), RegistryError> {
        let key = (rule.sender, rule.channel);

        if self.rules.contains_key(&key) {
            Err(RegistryError::Conflict {
                sender: rule.sender,
                channel: rule.channel,
            })?;
        }

        self.rules.insert(key, rule);
        Ok(())
    }

    /// Find the rule for a pair, if one is registered.
    pub fn lookup(&self, sender: u8, channel: u8) -> Option<&FieldRule> {
        self.rules.get(&(sender, channel))
    }

    /// Copy every rule of one sender to another, substituting only the
    /// sender.
    ///
    /// Intended to run once while building a registry, after the source's own
    /// rules are registered. Fails if the target already has rules.
    pub fn duplicate_source(&mut self, from: u8, to: u8) -> Result<(), RegistryError> {
        if self.rules_for(to).next().is_some() {
            Err(RegistryError::Occupied(to))?;
        }

        let copies: Vec<_> = self
            .rules_for(from)
            .map(|rule| FieldRule { sender: to, ..*rule })
            .collect();

        if copies.is_empty() {
            Err(RegistryError::EmptySource(from))?;
        }

        for rule in copies {
            self.register(rule)?;
        }

        Ok(())
    }

    /// Every rule, ordered by sender then channel.
    pub fn rules(&self) -> impl Iterator<Item = &FieldRule> {
        self.rules.values()
    }

    /// The rules of one sender, ordered by channel.
    pub fn rules_for(&self, sender: u8) -> impl Iterator<Item = &FieldRule> {
        self.rules
            .range((sender, u8::MIN)..=(sender, u8::MAX))
            .map(|(_, rule)| rule)
    }

    /// The number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule is registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

macro_rules! rules {
    ($sender:expr, $channel:ident: $(($variant:ident, $name:literal, $unit:expr, $width:ident, $scale:expr),)*) => {
        &[$(FieldRule::new(
            $sender as u8,
            $channel::$variant as u8,
            $name,
            $unit,
            Width::$width,
            $scale,
        ),)*]
    };
}

const fn per(divisor: f64) -> Scale {
    Scale::Linear { divisor }
}

const BATTERY: &[FieldRule] = rules!(Sender::Battery, BatteryChannel:
    (CapacityWh, "capacity_wh", Some("Wh"), U16, Scale::Identity),
    (RemainingWh, "remaining_wh", Some("Wh"), U16, Scale::Identity),
    (HealthPct, "health_pct", Some("%"), U8, Scale::Identity),
    (TempC, "temp_c", Some("°C"), U8, Scale::Identity),
    (ChargeCycles, "charge_cycles", None, U16, Scale::Identity),
    (VoltageV, "voltage_v", Some("V"), U8, Scale::Affine { divisor: 5.0, offset: 20.0 }),
    (CurrentA, "current_a", Some("A"), U8, per(5.0)),
    (ChargePct, "charge_pct", Some("%"), U8, Scale::Identity),
);

const MOTOR: &[FieldRule] = rules!(Sender::Motor, MotorChannel:
    (RiderPowerW, "rider_power_w", Some("W"), U16, Scale::Identity),
    (CadenceRpm, "cadence_rpm", Some("rpm"), U16, per(10.0)),
    (SpeedKmh, "speed_kmh", Some("km/h"), U16, per(10.0)),
    (OdometerKm, "odometer_km", Some("km"), U32, per(1000.0)),
    (AssistLevel, "assist_level", None, U16, Scale::Assist),
    (MotorTempC, "motor_temp_c", Some("°C"), U8, Scale::Identity),
    (MotorPowerW, "motor_power_w", Some("W"), U16, Scale::Identity),
);

const BIKE_SETTINGS: &[FieldRule] = rules!(Sender::BikeSettings, BikeSettingsChannel:
    (WheelCircumferenceMm, "wheel_circumference_mm", Some("mm"), U16, Scale::Identity),
    (AssistLev1Pct, "assist_lev1_pct", Some("%"), U8, Scale::Identity),
    (AssistLev2Pct, "assist_lev2_pct", Some("%"), U8, Scale::Identity),
    (AssistLev3Pct, "assist_lev3_pct", Some("%"), U8, Scale::Identity),
);
