//! Header mapping tests

use pi_header::hal::MockGpio;
use pi_header::pins::{to_channel, to_physical, Channel, PhysicalPin, PinMapping, HEADER_PINS};
use pi_header::{ChannelHandle, GpioError};

const POWER_AND_GROUND: [u8; 12] = [1, 2, 4, 6, 9, 14, 17, 20, 25, 30, 34, 39];

// ============================================================================
// Round Trips
// ============================================================================

#[test]
fn every_mapped_pin_round_trips() {
    let mut mapped = 0;
    for p in 1..=HEADER_PINS as u8 {
        if let Ok(channel) = to_channel(PhysicalPin(p)) {
            assert_eq!(to_physical(channel), Ok(PhysicalPin(p)), "pin {p}");
            mapped += 1;
        }
    }
    assert_eq!(mapped, 28);
}

#[test]
fn every_channel_is_routed_once() {
    for c in 0..28u8 {
        let pin = to_physical(Channel(c)).unwrap();
        assert_eq!(to_channel(pin), Ok(Channel(c)));
    }
}

// ============================================================================
// Unmapped Positions
// ============================================================================

#[test]
fn power_and_ground_are_unmapped() {
    for p in POWER_AND_GROUND {
        assert_eq!(
            to_channel(PhysicalPin(p)),
            Err(GpioError::UnmappedPin(PhysicalPin(p)))
        );
    }
}

#[test]
fn off_header_positions_are_unmapped() {
    for p in [0u8, 41, 255] {
        assert_eq!(
            to_channel(PhysicalPin(p)),
            Err(GpioError::UnmappedPin(PhysicalPin(p)))
        );
    }
}

#[test]
fn unrouted_channels_are_unknown() {
    for c in [28u8, 40, 255] {
        assert_eq!(
            to_physical(Channel(c)),
            Err(GpioError::UnknownChannel(Channel(c)))
        );
    }
}

// ============================================================================
// Custom Mappings
// ============================================================================

#[test]
fn handle_opens_through_custom_mapping() {
    let mut table = [None; HEADER_PINS + 1];
    table[1] = Some(4);
    table[2] = Some(5);
    let mapping = PinMapping::new(table).unwrap();

    let gpio = MockGpio::new();
    let handle = ChannelHandle::open_with_mapping(gpio.clone(), PhysicalPin(2), &mapping).unwrap();
    assert_eq!(handle.channel(), Channel(5));
    assert!(gpio.is_claimed(Channel(5)));

    assert_eq!(
        ChannelHandle::open_with_mapping(gpio, PhysicalPin(3), &mapping).unwrap_err(),
        GpioError::UnmappedPin(PhysicalPin(3))
    );
}

#[test]
fn custom_mapping_rejects_shared_channel() {
    let mut table = [None; HEADER_PINS + 1];
    table[7] = Some(4);
    table[8] = Some(4);
    assert!(matches!(
        PinMapping::new(table),
        Err(GpioError::InvalidArgument(_))
    ));
}
