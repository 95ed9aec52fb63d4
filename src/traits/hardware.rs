//! Hardware abstraction traits for GPIO access and blocking delays.
//!
//! This module defines the seam between the channel bookkeeping in this
//! crate and whatever library actually touches the hardware.
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`GpioBackend`] | Mode, level, PWM and edge-interrupt control of channels |
//! | [`Delay`] | Blocking millisecond delay used by the drivers |
//!
//! # Implementation
//!
//! For testing and desktop development, use the mock implementations
//! from [`crate::hal::mock`]. On a Raspberry Pi, use `hal::rpi::RpiGpio`
//! (requires the `rpi` feature).
//!
//! # Example
//!
//! ```rust
//! use pi_header::traits::{GpioBackend, Level, LineMode};
//! use pi_header::hal::MockGpio;
//! use pi_header::pins::Channel;
//!
//! let gpio = MockGpio::new();
//! let claim = gpio.acquire(Channel(17)).unwrap();
//! gpio.configure(Channel(17), LineMode::Output).unwrap();
//! gpio.write(Channel(17), Level::High).unwrap();
//!
//! assert_eq!(gpio.output_level(Channel(17)), Some(Level::High));
//!
//! gpio.release(Channel(17)).unwrap();
//! assert!(!claim.is_live());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::GpioError;
use crate::pins::Channel;

/// Logic level of a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Level {
    /// Driven or read as 0.
    #[default]
    Low,
    /// Driven or read as 1.
    High,
}

impl Level {
    /// Returns `true` for [`Level::High`].
    #[inline]
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Pull resistor applied to an input line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Pull {
    /// No bias; the line floats when undriven.
    #[default]
    Floating,
    /// Bias towards high.
    Up,
    /// Bias towards low.
    Down,
}

/// Direction a line is configured for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineMode {
    /// Push-pull output.
    Output,
    /// Input with the given pull resistor.
    Input(Pull),
}

/// Closure run by the backend's interrupt thread for every detected edge.
///
/// The handler reads the line itself to learn which way it went.
pub type EdgeHandler = Box<dyn FnMut() + Send + 'static>;

/// Proof of one successful [`GpioBackend::acquire`].
///
/// The backend keeps a clone and revokes it when the channel is released,
/// whether through [`release`](GpioBackend::release) or
/// [`release_all`](GpioBackend::release_all). A holder whose claim is no
/// longer live must not touch the channel again: it may belong to someone
/// else by now.
#[derive(Clone, Debug)]
pub struct Claim {
    live: Arc<AtomicBool>,
}

impl Claim {
    /// A fresh, live claim.
    pub fn new() -> Self {
        Self {
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Returns `true` until the backend releases the channel.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Marks the claim released. Called by backends.
    pub fn revoke(&self) {
        self.live.store(false, Ordering::Release);
    }
}

impl Default for Claim {
    fn default() -> Self {
        Self::new()
    }
}

/// Hardware-access collaborator.
///
/// A backend is a cheap, cloneable handle onto a process-wide GPIO
/// controller; every [`ChannelHandle`](crate::ChannelHandle) holds a clone.
/// Digital and PWM operations are synchronous. Edge delivery is
/// asynchronous: [`arm_edges`](Self::arm_edges) hands the backend a closure
/// that it calls from its own thread.
///
/// # Implementation Notes
///
/// - [`acquire`](Self::acquire) must fail with
///   [`GpioError::ChannelClaimConflict`] when the channel is already held.
/// - Releasing a channel must revoke the [`Claim`] handed out for it.
/// - [`release`](Self::release) on a channel that is not held is a no-op.
/// - The edge handler calls back into the backend (to read the line), so
///   a backend must not hold its own locks while waiting for a running
///   handler to finish.
/// - PWM duty is a fraction in 0.0-1.0; callers validate it beforehand.
pub trait GpioBackend: Clone + Send + 'static {
    /// Claims exclusive ownership of `channel`.
    fn acquire(&self, channel: Channel) -> Result<Claim, GpioError>;

    /// Sets the line direction and, for inputs, the pull resistor.
    fn configure(&self, channel: Channel, mode: LineMode) -> Result<(), GpioError>;

    /// Drives an output line.
    fn write(&self, channel: Channel, level: Level) -> Result<(), GpioError>;

    /// Samples the line.
    fn read(&self, channel: Channel) -> Result<Level, GpioError>;

    /// Starts PWM generation at `duty` (0.0-1.0) and `frequency_hz`.
    fn start_pwm(&self, channel: Channel, duty: f64, frequency_hz: f64) -> Result<(), GpioError>;

    /// Stops PWM generation, leaving the line as a plain output.
    fn stop_pwm(&self, channel: Channel) -> Result<(), GpioError>;

    /// Arms either-edge interrupt delivery with a debounce window.
    fn arm_edges(
        &self,
        channel: Channel,
        debounce_ms: u32,
        handler: EdgeHandler,
    ) -> Result<(), GpioError>;

    /// Disarms interrupt delivery for `channel`.
    fn disarm_edges(&self, channel: Channel) -> Result<(), GpioError>;

    /// Gives up ownership of `channel`, resetting it.
    fn release(&self, channel: Channel) -> Result<(), GpioError>;

    /// Releases every channel held through this backend.
    fn release_all(&self) -> Result<(), GpioError>;
}

/// Blocking delay used by the peripheral drivers.
///
/// Delays are whole milliseconds of wall-clock time and cannot be
/// cancelled once started.
pub trait Delay {
    /// Blocks the calling thread for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

impl<D: Delay + ?Sized> Delay for &mut D {
    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }
}
