//! Peripheral drivers built on borrowed channel handles.
//!
//! Drivers never open or release channels. They borrow handles from the
//! caller for their lifetime and translate a semantic request ("light up
//! at 80%", "beep at 440 Hz for 200 ms") into channel operations.
//!
//! | Driver | Channels | Purpose |
//! |--------|----------|---------|
//! | [`Led`] | 1 | On/off, dimming, flashing, animation |
//! | [`RgbLed`] | 3 | Colour mixing, flashing, animation |
//! | [`PassiveBuzzer`] | 1 | Tones and note sequences |
//! | [`ActiveBuzzer`] | 1 | Volume-only beeps |
//! | [`Dht11`] | sensor bus | Temperature and humidity |
//!
//! All waiting is done through a [`Delay`](crate::traits::Delay) and blocks
//! the calling thread.

mod buzzer;
mod dht11;
mod led;
mod rgb_led;

pub use buzzer::{ActiveBuzzer, Note, PassiveBuzzer};
pub use dht11::{Climate, Dht11};
pub use led::Led;
pub use rgb_led::{Rgb, RgbLed};

use crate::channel::ChannelHandle;
use crate::error::GpioError;
use crate::traits::{GpioBackend, Level};

/// One step of an animation.
///
/// Animation functions receive the elapsed time in milliseconds and return
/// the value to show next, or [`Frame::Stop`] to end the animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Frame<T> {
    /// Show this value for one step.
    Continue(T),
    /// End the animation.
    Stop,
}

/// Drives a fractional level.
///
/// With no frequency, 0 and 1 become plain digital levels and anything in
/// between uses PWM at `default_hz`. With a frequency, PWM is always used.
pub(crate) fn drive_fraction<B: GpioBackend>(
    channel: &mut ChannelHandle<B>,
    fraction: f64,
    frequency_hz: Option<f64>,
    default_hz: f64,
) -> Result<(), GpioError> {
    match frequency_hz {
        Some(hz) => channel.drive_pwm(fraction, hz),
        None if fraction == 0.0 => channel.drive_digital(Level::Low),
        None if fraction == 1.0 => channel.drive_digital(Level::High),
        None => channel.drive_pwm(fraction, default_hz),
    }
}

pub(crate) fn check_step(step_ms: u32) -> Result<(), GpioError> {
    if step_ms == 0 {
        Err(GpioError::InvalidArgument("animation step must be at least 1 ms"))
    } else {
        Ok(())
    }
}
