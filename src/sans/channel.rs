//! Sender and channel tags.
//!
//! Each tag enum converts from its raw byte with [`TryFrom<u8>`], returning the
//! byte back when it names no variant. The state containers in
//! [`crate::avec`] match on these enums exhaustively, so adding a variant here
//! without giving it an attribute fails to compile.

use zerocopy::TryFromBytes;

macro_rules! tag {
    (
        $(#[$attr:meta])*
        $name:ident {
            $($(#[$variant_attr:meta])* $variant:ident = $value:literal,)*
        }
    ) => {
        $(#[$attr])*
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromBytes)]
        pub enum $name {
            $($(#[$variant_attr])* $variant = $value,)*
        }

        impl $name {
            /// Every variant, in tag order.
            pub const ALL: &[Self] = &[$(Self::$variant,)*];
        }

        impl TryFrom<u8> for $name {
            type Error = u8;

            fn try_from(r: u8) -> Result<Self, u8> {
                let tag: Result<Self, _> = zerocopy::try_transmute!(r);
                tag.map_err(|_| r)
            }
        }

        impl From<$name> for u8 {
            fn from(tag: $name) -> u8 {
                tag as u8
            }
        }
    };
}

tag!(
    /// The subsystem a frame originates from.
    Sender {
        /// Primary battery.
        Battery = 0x00,
        /// Motor and rider telemetry.
        Motor = 0x01,
        /// Bike settings (assist tuning, wheel size).
        BikeSettings = 0x02,
        /// Secondary (range extender) battery. Shares the primary battery's
        /// channels.
        BatteryExtender = 0x04,
    }
);

tag!(
    /// Fields reported by [`Sender::Battery`] and [`Sender::BatteryExtender`].
    BatteryChannel {
        CapacityWh = 0x00,
        RemainingWh = 0x01,
        HealthPct = 0x02,
        TempC = 0x03,
        ChargeCycles = 0x04,
        VoltageV = 0x05,
        CurrentA = 0x06,
        ChargePct = 0x0C,
    }
);

tag!(
    /// Fields reported by [`Sender::Motor`].
    MotorChannel {
        RiderPowerW = 0x00,
        CadenceRpm = 0x01,
        SpeedKmh = 0x02,
        OdometerKm = 0x04,
        AssistLevel = 0x05,
        MotorTempC = 0x07,
        MotorPowerW = 0x0C,
    }
);

tag!(
    /// Fields reported by [`Sender::BikeSettings`].
    BikeSettingsChannel {
        WheelCircumferenceMm = 0x00,
        AssistLev1Pct = 0x03,
        AssistLev2Pct = 0x04,
        AssistLev3Pct = 0x05,
    }
);
