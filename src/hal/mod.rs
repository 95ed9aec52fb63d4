//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `rpi`: Raspberry Pi GPIO through `rppal` (requires `rpi` feature)
//! - [`StdDelay`]: wall-clock delay for any `std` target

pub mod mock;

#[cfg(feature = "rpi")]
pub mod rpi;

pub use mock::*;

#[cfg(feature = "rpi")]
pub use rpi::*;

use crate::traits::Delay;

/// Wall-clock delay backed by [`std::thread::sleep`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StdDelay;

impl Delay for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}

/// Blocks the calling thread for `ms` milliseconds.
pub fn wait_ms(ms: u32) {
    StdDelay.delay_ms(ms);
}
