#![cfg(feature = "std")]

use std::{sync::Arc, thread};

use crankset::{
    avec::{Aggregator, Snapshot, UpdateError},
    sans::{
        DecodeError, FieldRule, Registry, Scale, Sender, Width,
        channel::{BatteryChannel, MotorChannel},
    },
};

fn frame(sender: Sender, channel: impl Into<u8>, payload: &[u8]) -> Vec<u8> {
    let mut frame = vec![sender.into(), channel.into()];
    frame.extend_from_slice(payload);
    frame
}

#[test]
fn charge_percent_sets_battery_attribute() {
    let aggregator = Aggregator::turbo().unwrap();

    let update = aggregator
        .apply(&frame(Sender::Battery, BatteryChannel::ChargePct, &[77]))
        .unwrap();

    assert_eq!(update.name, "charge_pct");
    assert_eq!(update.message_count, 1);

    let snapshot = aggregator.snapshot();
    let reading = snapshot.battery.charge_pct.unwrap();
    assert_eq!(reading.as_f64(), Some(77.0));
    assert_eq!(reading.unit, Some("%"));
    assert_eq!(reading.channel, 0x0C);
    assert_eq!(snapshot.message_count, 1);
}

#[test]
fn motor_speed_is_little_endian_tenths() {
    let aggregator = Aggregator::turbo().unwrap();

    aggregator
        .apply(&frame(Sender::Motor, MotorChannel::SpeedKmh, &[245, 0]))
        .unwrap();

    let speed = aggregator.read(|s| s.motor.speed_kmh.unwrap());
    assert_eq!(speed.as_f64(), Some(24.5));
    assert_eq!(speed.unit, Some("km/h"));
}

#[test]
fn unrecognized_channel_changes_nothing() {
    let aggregator = Aggregator::turbo().unwrap();
    aggregator
        .apply(&frame(Sender::Battery, BatteryChannel::ChargePct, &[50]))
        .unwrap();
    let before = aggregator.snapshot();

    let err = aggregator
        .apply(&frame(Sender::Battery, 0x30u8, &[1, 2]))
        .unwrap_err();

    assert_eq!(
        err,
        UpdateError::Decode(DecodeError::Unrecognized {
            sender: 0x00,
            channel: 0x30
        })
    );
    assert_eq!(aggregator.snapshot(), before);
}

#[test]
fn truncated_payload_changes_nothing() {
    let aggregator = Aggregator::turbo().unwrap();

    let err = aggregator
        .apply(&frame(Sender::Motor, MotorChannel::OdometerKm, &[1, 2, 3]))
        .unwrap_err();

    assert_eq!(
        err,
        UpdateError::Decode(DecodeError::Truncated {
            sender: 0x01,
            channel: 0x04,
            expected: 4,
            found: 3,
        })
    );
    assert_eq!(aggregator.snapshot(), Snapshot::default());
}

#[test]
fn short_frame_is_structural() {
    let aggregator = Aggregator::turbo().unwrap();

    let shorts: [&[u8]; 2] = [&[], &[0x01]];
    for short in shorts {
        assert_eq!(
            aggregator.apply(short),
            Err(UpdateError::Decode(DecodeError::Structural { len: short.len() }))
        );
    }

    assert_eq!(aggregator.snapshot().message_count, 0);
}

#[test]
fn bad_frames_do_not_block_later_frames() {
    let aggregator = Aggregator::turbo().unwrap();

    assert!(aggregator.apply(&[0x00]).is_err());
    assert!(aggregator.apply(&[0x03, 0x00, 0x42]).is_err());
    assert!(aggregator.apply(&[0x01, 0x02, 0xFF]).is_err());

    let update = aggregator.apply(&[0x01, 0x02, 0xFF, 0x00]).unwrap();
    assert_eq!(update.message_count, 1);
}

#[test]
fn message_count_tracks_routed_frames_only() {
    let mut registry = Registry::turbo().unwrap();
    // Registered, but the battery container has no attribute for it.
    registry
        .register(FieldRule::new(0x00, 0x40, "serial", None, Width::U32, Scale::Identity))
        .unwrap();
    // Registered for a sender the snapshot has no container for.
    registry
        .register(FieldRule::new(0x09, 0x00, "light", None, Width::U8, Scale::Identity))
        .unwrap();
    let aggregator = Aggregator::new(registry);

    let frames: [(&[u8], bool); 8] = [
        (&[0x00, 0x0C, 10], true),
        (&[0x00], false),
        (&[0x00, 0x7F, 0], false),
        (&[0x00, 0x00, 1], false),
        (&[0x00, 0x40, 1, 2, 3, 4], false),
        (&[0x09, 0x00, 1], false),
        (&[0x01, 0x07, 30], true),
        (&[0x02, 0x05, 90], true),
    ];

    let mut expected = 0;
    for (frame, routed) in frames {
        let result = aggregator.apply(frame);
        assert_eq!(result.is_ok(), routed, "frame {frame:02x?}");
        expected += u64::from(routed);
        assert_eq!(aggregator.snapshot().message_count, expected);
    }
}

#[test]
fn unmapped_and_unrouted_are_reported() {
    let mut registry = Registry::turbo().unwrap();
    registry
        .register(FieldRule::new(0x00, 0x40, "serial", None, Width::U8, Scale::Identity))
        .unwrap();
    registry
        .register(FieldRule::new(0x09, 0x00, "light", None, Width::U8, Scale::Identity))
        .unwrap();
    let aggregator = Aggregator::new(registry);

    assert_eq!(
        aggregator.apply(&[0x00, 0x40, 1]),
        Err(UpdateError::Unmapped {
            sender: 0x00,
            channel: 0x40,
            name: "serial",
        })
    );
    assert_eq!(
        aggregator.apply(&[0x09, 0x00, 1]),
        Err(UpdateError::Unrouted { sender: 0x09 })
    );
    assert_eq!(aggregator.snapshot(), Snapshot::default());
}

#[test]
fn out_of_order_frames_touch_only_their_attribute() {
    let aggregator = Aggregator::turbo().unwrap();

    aggregator
        .apply(&frame(Sender::Motor, MotorChannel::MotorPowerW, &[0xF4, 0x01]))
        .unwrap();
    let after_motor = aggregator.snapshot();

    aggregator
        .apply(&frame(Sender::Battery, BatteryChannel::ChargePct, &[60]))
        .unwrap();
    let after_battery = aggregator.snapshot();

    assert_eq!(after_battery.motor, after_motor.motor);
    assert_eq!(after_battery.settings, after_motor.settings);
    assert_eq!(after_battery.extender, after_motor.extender);
    assert_eq!(
        after_battery.motor.motor_power_w.unwrap().as_f64(),
        Some(500.0)
    );

    let mut battery = after_battery.battery.clone();
    battery.charge_pct = None;
    assert_eq!(battery, after_motor.battery);
}

#[test]
fn repeated_frame_keeps_value_and_counts_twice() {
    let aggregator = Aggregator::turbo().unwrap();
    let cadence = frame(Sender::Motor, MotorChannel::CadenceRpm, &[0x20, 0x03]);

    aggregator.apply(&cadence).unwrap();
    let once = aggregator.snapshot();
    aggregator.apply(&cadence).unwrap();
    let twice = aggregator.snapshot();

    assert_eq!(once.motor, twice.motor);
    assert_eq!(twice.motor.cadence_rpm.unwrap().as_f64(), Some(80.0));
    assert_eq!(once.message_count, 1);
    assert_eq!(twice.message_count, 2);
}

#[test]
fn extender_is_independent_of_primary_battery() {
    let aggregator = Aggregator::turbo().unwrap();

    aggregator
        .apply(&frame(Sender::BatteryExtender, BatteryChannel::RemainingWh, &[0xF0, 0x00]))
        .unwrap();

    let snapshot = aggregator.snapshot();
    assert_eq!(snapshot.extender.remaining_wh.unwrap().as_f64(), Some(240.0));
    assert_eq!(snapshot.battery, Default::default());
}

#[test]
fn snapshot_is_unavailable_until_first_update() {
    let aggregator = Aggregator::turbo().unwrap();
    let snapshot = aggregator.snapshot();

    assert!(!snapshot.is_available());
    assert_eq!(snapshot.last_update, None);
    assert_eq!(snapshot.since_last_update(), None);

    aggregator.apply(&[0x02, 0x03, 40]).unwrap();
    let snapshot = aggregator.snapshot();

    assert!(snapshot.is_available());
    assert!(snapshot.since_last_update().is_some());
}

#[test]
fn concurrent_writers_and_readers() {
    let aggregator = Arc::new(Aggregator::turbo().unwrap());

    let writers: Vec<_> = (0..4u8)
        .map(|i| {
            let aggregator = Arc::clone(&aggregator);
            thread::spawn(move || {
                for pct in 0..100u8 {
                    aggregator.apply(&[0x00, 0x0C, pct]).unwrap();
                    aggregator.apply(&[0x01, 0x07, i]).unwrap();
                }
            })
        })
        .collect();

    let reader = {
        let aggregator = Arc::clone(&aggregator);
        thread::spawn(move || {
            for _ in 0..100 {
                let snapshot = aggregator.snapshot();
                if let Some(reading) = snapshot.battery.charge_pct {
                    let pct = reading.as_f64().unwrap();
                    assert!((0.0..100.0).contains(&pct));
                    assert_eq!(reading.unit, Some("%"));
                }
            }
        })
    };

    for writer in writers {
        writer.join().unwrap();
    }
    reader.join().unwrap();

    assert_eq!(aggregator.snapshot().message_count, 800);
    assert_eq!(
        aggregator.read(|s| s.battery.charge_pct.unwrap().as_f64()),
        Some(99.0)
    );
}
