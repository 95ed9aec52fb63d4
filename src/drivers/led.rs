//! Single LED on one channel.

use crate::channel::ChannelHandle;
use crate::config::DEFAULT_PWM_HZ;
use crate::drivers::{check_step, drive_fraction, Frame};
use crate::error::GpioError;
use crate::traits::{Delay, GpioBackend, Level};

/// LED driver.
///
/// Borrows its channel for its lifetime and tracks whether the LED is lit
/// (last commanded brightness non-zero).
///
/// # Example
///
/// ```rust
/// use pi_header::drivers::{Frame, Led};
/// use pi_header::hal::{MockDelay, MockGpio};
/// use pi_header::pins::PhysicalPin;
/// use pi_header::ChannelHandle;
///
/// let gpio = MockGpio::new();
/// let mut pin = ChannelHandle::open_physical(gpio, PhysicalPin(12)).unwrap();
/// let mut led = Led::new(&mut pin, MockDelay::new()).unwrap();
///
/// led.set_brightness(0.8, None).unwrap();
/// assert!(led.is_lit());
///
/// // Fade in over 5 steps of 20 ms, then stop
/// led.animate(20, |t| {
///     if t < 100 { Frame::Continue(t as f64 / 100.0) } else { Frame::Stop }
/// }).unwrap();
/// ```
pub struct Led<'a, B: GpioBackend, D: Delay> {
    channel: &'a mut ChannelHandle<B>,
    delay: D,
    pwm_hz: f64,
    lit: bool,
}

impl<'a, B: GpioBackend, D: Delay> Led<'a, B, D> {
    /// Takes over `channel` and switches the LED off.
    pub fn new(channel: &'a mut ChannelHandle<B>, delay: D) -> Result<Self, GpioError> {
        channel.drive_digital(Level::Low)?;
        Ok(Self {
            channel,
            delay,
            pwm_hz: DEFAULT_PWM_HZ,
            lit: false,
        })
    }

    /// Sets the PWM frequency used for dimming and animation.
    pub fn with_pwm_frequency(mut self, hz: f64) -> Self {
        self.pwm_hz = hz;
        self
    }

    /// Returns `true` if the last commanded brightness was non-zero.
    #[inline]
    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// The borrowed channel.
    pub fn channel(&self) -> &ChannelHandle<B> {
        &*self.channel
    }

    /// Sets brightness as a fraction of full.
    ///
    /// Without a frequency, 0 and 1 switch the line digitally and other
    /// fractions dim with PWM at the configured frequency.
    pub fn set_brightness(
        &mut self,
        fraction: f64,
        frequency_hz: Option<f64>,
    ) -> Result<(), GpioError> {
        drive_fraction(&mut *self.channel, fraction, frequency_hz, self.pwm_hz)?;
        self.lit = fraction != 0.0;
        Ok(())
    }

    /// Full brightness.
    pub fn on(&mut self) -> Result<(), GpioError> {
        self.set_brightness(1.0, None)
    }

    /// Off.
    pub fn off(&mut self) -> Result<(), GpioError> {
        self.set_brightness(0.0, None)
    }

    /// Blinks `times` times: on for `duration_ms`, off for `duration_ms`.
    ///
    /// Blocks for `2 * times * duration_ms` and ends with the LED off.
    pub fn flash(&mut self, duration_ms: u32, times: u32) -> Result<(), GpioError> {
        for _ in 0..times {
            self.channel.drive_digital(Level::High)?;
            self.lit = true;
            self.delay.delay_ms(duration_ms);
            self.channel.drive_digital(Level::Low)?;
            self.lit = false;
            self.delay.delay_ms(duration_ms);
        }
        Ok(())
    }

    /// Runs a brightness animation.
    ///
    /// `intensity` is called with elapsed milliseconds 0, `step_ms`,
    /// `2 * step_ms`, ... Each [`Frame::Continue`] value is shown with PWM
    /// for one step; [`Frame::Stop`] ends the loop.
    pub fn animate<F>(&mut self, step_ms: u32, mut intensity: F) -> Result<(), GpioError>
    where
        F: FnMut(u64) -> Frame<f64>,
    {
        check_step(step_ms)?;
        let mut elapsed: u64 = 0;
        while let Frame::Continue(value) = intensity(elapsed) {
            self.channel.drive_pwm(value, self.pwm_hz)?;
            self.lit = value != 0.0;
            self.delay.delay_ms(step_ms);
            elapsed += u64::from(step_ms);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::DriveMode;
    use crate::hal::{MockCall, MockDelay, MockGpio};
    use crate::pins::Channel;

    #[test]
    fn new_switches_off() {
        let gpio = MockGpio::new();
        let mut ch = ChannelHandle::open_channel(gpio.clone(), Channel(18)).unwrap();
        let led = Led::new(&mut ch, MockDelay::new()).unwrap();
        assert!(!led.is_lit());
        assert_eq!(gpio.output_level(Channel(18)), Some(Level::Low));
    }

    #[test]
    fn brightness_tracks_lit_state() {
        let gpio = MockGpio::new();
        let mut ch = ChannelHandle::open_channel(gpio.clone(), Channel(18)).unwrap();
        let mut led = Led::new(&mut ch, MockDelay::new()).unwrap();

        led.on().unwrap();
        assert!(led.is_lit());
        led.set_brightness(0.0, Some(200.0)).unwrap();
        assert!(!led.is_lit());
        assert_eq!(gpio.pwm(Channel(18)), Some((0.0, 200.0)));
        led.set_brightness(0.5, None).unwrap();
        assert!(led.is_lit());
        assert_eq!(gpio.pwm(Channel(18)), Some((0.5, 100.0)));
    }

    #[test]
    fn invalid_brightness_keeps_state() {
        let gpio = MockGpio::new();
        let mut ch = ChannelHandle::open_channel(gpio, Channel(18)).unwrap();
        let mut led = Led::new(&mut ch, MockDelay::new()).unwrap();
        assert!(led.set_brightness(2.0, None).is_err());
        assert!(!led.is_lit());
    }

    #[test]
    fn animate_passes_elapsed_time() {
        let gpio = MockGpio::new();
        let delay = MockDelay::new();
        let mut ch = ChannelHandle::open_channel(gpio.clone(), Channel(18)).unwrap();
        let mut led = Led::new(&mut ch, delay.clone())
            .unwrap()
            .with_pwm_frequency(250.0);

        let mut seen = Vec::new();
        led.animate(40, |t| {
            seen.push(t);
            match t {
                0 => Frame::Continue(0.0),
                40 => Frame::Continue(0.5),
                80 => Frame::Continue(1.0),
                _ => Frame::Stop,
            }
        })
        .unwrap();

        assert_eq!(seen, vec![0, 40, 80, 120]);
        assert_eq!(delay.delays(), vec![40, 40, 40]);
        assert!(led.is_lit());
        assert_eq!(
            led.channel().mode(),
            DriveMode::Pwm {
                duty: 1.0,
                frequency_hz: 250.0
            }
        );
        let starts: Vec<_> = gpio
            .calls()
            .into_iter()
            .filter(|c| matches!(c, MockCall::StartPwm(..)))
            .collect();
        assert_eq!(starts.len(), 3);
    }

    #[test]
    fn animate_stop_immediately() {
        let gpio = MockGpio::new();
        let delay = MockDelay::new();
        let mut ch = ChannelHandle::open_channel(gpio, Channel(18)).unwrap();
        let mut led = Led::new(&mut ch, delay.clone()).unwrap();
        led.animate(10, |_| Frame::Stop).unwrap();
        assert!(delay.delays().is_empty());
        assert!(!led.is_lit());
    }

    #[test]
    fn animate_rejects_zero_step() {
        let gpio = MockGpio::new();
        let mut ch = ChannelHandle::open_channel(gpio, Channel(18)).unwrap();
        let mut led = Led::new(&mut ch, MockDelay::new()).unwrap();
        assert!(led.animate(0, |_| Frame::Stop).is_err());
    }
}
