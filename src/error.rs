//! Error type shared by pin translation, channel handles and drivers.

use thiserror::Error;

use crate::edge::{CallbackId, Edge};
use crate::pins::{Channel, PhysicalPin};

/// Errors raised by this crate.
///
/// Construction and configuration errors are returned to the caller.
/// Teardown ([`ChannelHandle::close`](crate::ChannelHandle::close)) never
/// returns one, and sensor faults are reported as absent values instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GpioError {
    /// The physical pin is a power/ground position or not on the header.
    #[error("physical pin {0} has no GPIO channel")]
    UnmappedPin(PhysicalPin),

    /// No physical pin maps to this channel.
    #[error("channel {0} is not routed to the header")]
    UnknownChannel(Channel),

    /// An argument was outside its valid domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The hardware layer reports the channel as already claimed.
    #[error("channel {0} is already claimed")]
    ChannelClaimConflict(Channel),

    /// A callback panicked while an edge was being dispatched.
    #[error("{edge} callback #{seq} panicked: {message}")]
    CallbackFault {
        /// Registry the callback belongs to.
        edge: Edge,
        /// Sequence number of the callback within that registry.
        seq: u32,
        /// Panic payload, if it was a string.
        message: String,
    },

    /// No callback is registered under this id.
    #[error("no callback registered as {0}")]
    CallbackNotFound(CallbackId),

    /// The handle was closed and no longer owns its channel.
    #[error("channel {0} has been released")]
    ChannelReleased(Channel),

    /// Any other failure reported by the hardware-access layer.
    #[error("hardware error: {0}")]
    Hardware(String),
}

impl embedded_hal::digital::Error for GpioError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_pin() {
        let err = GpioError::UnmappedPin(PhysicalPin(6));
        assert_eq!(err.to_string(), "physical pin 6 has no GPIO channel");

        let err = GpioError::UnknownChannel(Channel(28));
        assert_eq!(err.to_string(), "channel 28 is not routed to the header");
    }

    #[test]
    fn callback_fault_message() {
        let err = GpioError::CallbackFault {
            edge: Edge::Rising,
            seq: 2,
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "rising callback #2 panicked: boom");
    }

    #[test]
    fn embedded_hal_kind_is_other() {
        use embedded_hal::digital::{Error, ErrorKind};
        assert_eq!(
            GpioError::ChannelReleased(Channel(4)).kind(),
            ErrorKind::Other
        );
    }
}
