//! Translation between physical header positions and controller channels.
//!
//! The Raspberry Pi exposes its GPIO lines on a 40-pin header. Software
//! addresses a line by its controller channel ("BCM" number) while wiring
//! diagrams use the header position ("board" number). [`PinMapping`] holds
//! both directions of that translation.
//!
//! # Example
//!
//! ```rust
//! use pi_header::pins::{to_channel, to_physical, Channel, PhysicalPin};
//!
//! assert_eq!(to_channel(PhysicalPin(12)).unwrap(), Channel(18));
//! assert_eq!(to_physical(Channel(18)).unwrap(), PhysicalPin(12));
//!
//! // Pin 6 is ground
//! assert!(to_channel(PhysicalPin(6)).is_err());
//! ```

use core::fmt;

use crate::error::GpioError;

/// Number of positions on the header.
pub const HEADER_PINS: usize = 40;

/// Number of controller channels routed to the header (BCM 0-27).
pub const CHANNEL_COUNT: usize = 28;

/// A position on the physical header, numbered 1-40.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhysicalPin(pub u8);

/// A controller-internal GPIO line ("BCM" number).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Channel(pub u8);

impl fmt::Display for PhysicalPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Header table indexed by physical position. Index 0 is unused; power
/// and ground positions hold `None`.
type HeaderTable = [Option<u8>; HEADER_PINS + 1];

/// Standard Raspberry Pi 40-pin header.
const RPI_HEADER: HeaderTable = [
    None,     // (unused)
    None,     // 1: 3.3V
    None,     // 2: 5V
    Some(2),  // 3: SDA1
    None,     // 4: 5V
    Some(3),  // 5: SCL1
    None,     // 6: GND
    Some(4),  // 7
    Some(14), // 8: TXD0
    None,     // 9: GND
    Some(15), // 10: RXD0
    Some(17), // 11
    Some(18), // 12: PCM_CLK
    Some(27), // 13
    None,     // 14: GND
    Some(22), // 15
    Some(23), // 16
    None,     // 17: 3.3V
    Some(24), // 18
    Some(10), // 19: MOSI
    None,     // 20: GND
    Some(9),  // 21: MISO
    Some(25), // 22
    Some(11), // 23: SCLK
    Some(8),  // 24: CE0
    None,     // 25: GND
    Some(7),  // 26: CE1
    Some(0),  // 27: ID_SD
    Some(1),  // 28: ID_SC
    Some(5),  // 29
    None,     // 30: GND
    Some(6),  // 31
    Some(12), // 32
    Some(13), // 33
    None,     // 34: GND
    Some(19), // 35
    Some(16), // 36
    Some(26), // 37
    Some(20), // 38
    None,     // 39: GND
    Some(21), // 40
];

/// Builds the channel -> physical table, or `None` if two positions share
/// a channel or a channel is out of range.
const fn invert(table: &HeaderTable) -> Option<[Option<u8>; CHANNEL_COUNT]> {
    let mut inverse = [None; CHANNEL_COUNT];
    let mut pin = 1;
    while pin <= HEADER_PINS {
        if let Some(channel) = table[pin] {
            let idx = channel as usize;
            if idx >= CHANNEL_COUNT || inverse[idx].is_some() {
                return None;
            }
            inverse[idx] = Some(pin as u8);
        }
        pin += 1;
    }
    Some(inverse)
}

// Checked at compile time.
static STANDARD: PinMapping = match invert(&RPI_HEADER) {
    Some(to_physical) => PinMapping {
        to_channel: RPI_HEADER,
        to_physical,
    },
    None => panic!("standard header table is not injective"),
};

/// Bidirectional mapping between header positions and channels.
///
/// The mapping is a partial injection: every physical pin maps to at most
/// one channel and no two pins share a channel. The reverse direction
/// only contains channels that some pin maps to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinMapping {
    to_channel: HeaderTable,
    to_physical: [Option<u8>; CHANNEL_COUNT],
}

impl PinMapping {
    /// Returns the standard Raspberry Pi header mapping.
    pub fn standard() -> &'static PinMapping {
        &STANDARD
    }

    /// Builds a mapping from a table indexed by physical position.
    ///
    /// Entry 0 is ignored. Fails with [`GpioError::InvalidArgument`] if
    /// two positions map to the same channel or a channel is beyond 27.
    pub fn new(table: [Option<u8>; HEADER_PINS + 1]) -> Result<Self, GpioError> {
        let mut to_channel = table;
        to_channel[0] = None;
        match invert(&to_channel) {
            Some(to_physical) => Ok(Self {
                to_channel,
                to_physical,
            }),
            None => Err(GpioError::InvalidArgument(
                "pin table maps two positions to one channel or names a channel beyond 27",
            )),
        }
    }

    /// Channel wired to `pin`.
    pub fn to_channel(&self, pin: PhysicalPin) -> Result<Channel, GpioError> {
        self.to_channel
            .get(pin.0 as usize)
            .copied()
            .flatten()
            .map(Channel)
            .ok_or(GpioError::UnmappedPin(pin))
    }

    /// Physical position of `channel`.
    pub fn to_physical(&self, channel: Channel) -> Result<PhysicalPin, GpioError> {
        self.to_physical
            .get(channel.0 as usize)
            .copied()
            .flatten()
            .map(PhysicalPin)
            .ok_or(GpioError::UnknownChannel(channel))
    }

    /// Iterates every mapped `(pin, channel)` pair in header order.
    pub fn mapped_pins(&self) -> impl Iterator<Item = (PhysicalPin, Channel)> + '_ {
        self.to_channel
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(pin, ch)| ch.map(|ch| (PhysicalPin(pin as u8), Channel(ch))))
    }
}

/// Translates a header position with the standard mapping.
pub fn to_channel(pin: PhysicalPin) -> Result<Channel, GpioError> {
    PinMapping::standard().to_channel(pin)
}

/// Translates a channel with the standard mapping.
pub fn to_physical(channel: Channel) -> Result<PhysicalPin, GpioError> {
    PinMapping::standard().to_physical(channel)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POWER_AND_GROUND: [u8; 12] = [1, 2, 4, 6, 9, 14, 17, 20, 25, 30, 34, 39];

    #[test]
    fn every_mapped_pin_round_trips() {
        let mapping = PinMapping::standard();
        let mut count = 0;
        for (pin, channel) in mapping.mapped_pins() {
            assert_eq!(mapping.to_channel(pin).unwrap(), channel);
            assert_eq!(mapping.to_physical(channel).unwrap(), pin);
            count += 1;
        }
        assert_eq!(count, 28);
    }

    #[test]
    fn power_and_ground_are_unmapped() {
        for pin in POWER_AND_GROUND {
            assert_eq!(
                to_channel(PhysicalPin(pin)),
                Err(GpioError::UnmappedPin(PhysicalPin(pin)))
            );
        }
    }

    #[test]
    fn off_header_positions_are_unmapped() {
        assert!(matches!(
            to_channel(PhysicalPin(0)),
            Err(GpioError::UnmappedPin(_))
        ));
        assert!(matches!(
            to_channel(PhysicalPin(41)),
            Err(GpioError::UnmappedPin(_))
        ));
    }

    #[test]
    fn unknown_channel_is_an_error() {
        assert_eq!(
            to_physical(Channel(28)),
            Err(GpioError::UnknownChannel(Channel(28)))
        );
        assert!(to_physical(Channel(200)).is_err());
    }

    #[test]
    fn well_known_positions() {
        assert_eq!(to_channel(PhysicalPin(3)).unwrap(), Channel(2));
        assert_eq!(to_channel(PhysicalPin(27)).unwrap(), Channel(0));
        assert_eq!(to_channel(PhysicalPin(40)).unwrap(), Channel(21));
        assert_eq!(to_physical(Channel(26)).unwrap(), PhysicalPin(37));
    }

    #[test]
    fn custom_table_rejects_duplicate_channel() {
        let mut table = [None; HEADER_PINS + 1];
        table[3] = Some(2);
        table[5] = Some(2);
        assert!(matches!(
            PinMapping::new(table),
            Err(GpioError::InvalidArgument(_))
        ));
    }

    #[test]
    fn custom_table_rejects_out_of_range_channel() {
        let mut table = [None; HEADER_PINS + 1];
        table[7] = Some(40);
        assert!(PinMapping::new(table).is_err());
    }

    #[test]
    fn custom_table_inverts_defined_entries_only() {
        let mut table = [None; HEADER_PINS + 1];
        table[0] = Some(9); // ignored
        table[7] = Some(4);
        let mapping = PinMapping::new(table).unwrap();
        assert_eq!(mapping.to_physical(Channel(4)).unwrap(), PhysicalPin(7));
        assert!(mapping.to_physical(Channel(9)).is_err());
        assert_eq!(mapping.mapped_pins().count(), 1);
    }
}
