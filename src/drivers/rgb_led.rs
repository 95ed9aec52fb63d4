//! RGB LED on three channels.

use crate::channel::ChannelHandle;
use crate::config::DEFAULT_PWM_HZ;
use crate::drivers::{check_step, drive_fraction, Frame};
use crate::error::GpioError;
use crate::traits::{Delay, GpioBackend, Level};

/// Brightness of each colour component, 0.0 to 1.0.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    /// Red component.
    pub red: f64,
    /// Green component.
    pub green: f64,
    /// Blue component.
    pub blue: f64,
}

impl Rgb {
    /// All components off.
    pub const OFF: Rgb = Rgb::new(0.0, 0.0, 0.0);
    /// All components at full brightness.
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    /// Creates a colour from its components.
    pub const fn new(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue }
    }

    fn components(self) -> [f64; 3] {
        [self.red, self.green, self.blue]
    }
}

/// RGB LED driver over three independently owned channels.
///
/// # Example
///
/// ```rust
/// use pi_header::drivers::{Rgb, RgbLed};
/// use pi_header::hal::{MockDelay, MockGpio};
/// use pi_header::pins::Channel;
/// use pi_header::ChannelHandle;
///
/// let gpio = MockGpio::new();
/// let mut r = ChannelHandle::open_channel(gpio.clone(), Channel(17)).unwrap();
/// let mut g = ChannelHandle::open_channel(gpio.clone(), Channel(27)).unwrap();
/// let mut b = ChannelHandle::open_channel(gpio.clone(), Channel(22)).unwrap();
///
/// let mut led = RgbLed::new(&mut r, &mut g, &mut b, MockDelay::new()).unwrap();
/// led.set_color(Rgb::new(1.0, 0.0, 0.25), None).unwrap();
/// assert_eq!(led.lit(), [true, false, true]);
/// ```
pub struct RgbLed<'a, B: GpioBackend, D: Delay> {
    channels: [&'a mut ChannelHandle<B>; 3],
    delay: D,
    pwm_hz: f64,
    lit: [bool; 3],
}

impl<'a, B: GpioBackend, D: Delay> RgbLed<'a, B, D> {
    /// Takes over the three channels and switches every component off.
    pub fn new(
        red: &'a mut ChannelHandle<B>,
        green: &'a mut ChannelHandle<B>,
        blue: &'a mut ChannelHandle<B>,
        delay: D,
    ) -> Result<Self, GpioError> {
        let mut channels = [red, green, blue];
        for channel in channels.iter_mut() {
            channel.drive_digital(Level::Low)?;
        }
        Ok(Self {
            channels,
            delay,
            pwm_hz: DEFAULT_PWM_HZ,
            lit: [false; 3],
        })
    }

    /// Sets the PWM frequency used for mixing and animation.
    pub fn with_pwm_frequency(mut self, hz: f64) -> Self {
        self.pwm_hz = hz;
        self
    }

    /// Lit state of the red, green and blue components.
    #[inline]
    pub fn lit(&self) -> [bool; 3] {
        self.lit
    }

    /// Returns `true` if any component is lit.
    pub fn is_lit(&self) -> bool {
        self.lit.iter().any(|&l| l)
    }

    /// Sets all three components, optionally at a shared PWM frequency.
    pub fn set_color(&mut self, color: Rgb, frequency_hz: Option<f64>) -> Result<(), GpioError> {
        for (i, value) in color.components().into_iter().enumerate() {
            drive_fraction(&mut *self.channels[i], value, frequency_hz, self.pwm_hz)?;
            self.lit[i] = value != 0.0;
        }
        Ok(())
    }

    /// Switches every component off.
    pub fn off(&mut self) -> Result<(), GpioError> {
        self.set_color(Rgb::OFF, None)
    }

    fn drive_all(&mut self, level: Level) -> Result<(), GpioError> {
        for (i, channel) in self.channels.iter_mut().enumerate() {
            channel.drive_digital(level)?;
            self.lit[i] = level.is_high();
        }
        Ok(())
    }

    /// Blinks all components together `times` times.
    ///
    /// Blocks for `2 * times * duration_ms` and ends with the LED off.
    pub fn flash(&mut self, duration_ms: u32, times: u32) -> Result<(), GpioError> {
        for _ in 0..times {
            self.drive_all(Level::High)?;
            self.delay.delay_ms(duration_ms);
            self.drive_all(Level::Low)?;
            self.delay.delay_ms(duration_ms);
        }
        Ok(())
    }

    /// Runs a colour animation.
    ///
    /// `color` is called with elapsed milliseconds 0, `step_ms`, ... and
    /// each [`Frame::Continue`] colour is shown with PWM for one step.
    pub fn animate<F>(&mut self, step_ms: u32, mut color: F) -> Result<(), GpioError>
    where
        F: FnMut(u64) -> Frame<Rgb>,
    {
        check_step(step_ms)?;
        let mut elapsed: u64 = 0;
        while let Frame::Continue(rgb) = color(elapsed) {
            let hz = self.pwm_hz;
            self.set_color(rgb, Some(hz))?;
            self.delay.delay_ms(step_ms);
            elapsed += u64::from(step_ms);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockDelay, MockGpio};
    use crate::pins::Channel;

    fn handles(gpio: &MockGpio) -> [ChannelHandle<MockGpio>; 3] {
        [17, 27, 22].map(|c| ChannelHandle::open_channel(gpio.clone(), Channel(c)).unwrap())
    }

    #[test]
    fn new_switches_all_off() {
        let gpio = MockGpio::new();
        let [mut r, mut g, mut b] = handles(&gpio);
        let led = RgbLed::new(&mut r, &mut g, &mut b, MockDelay::new()).unwrap();
        assert!(!led.is_lit());
        for c in [17, 27, 22] {
            assert_eq!(gpio.output_level(Channel(c)), Some(Level::Low));
        }
    }

    #[test]
    fn set_color_with_shared_frequency() {
        let gpio = MockGpio::new();
        let [mut r, mut g, mut b] = handles(&gpio);
        let mut led = RgbLed::new(&mut r, &mut g, &mut b, MockDelay::new()).unwrap();

        led.set_color(Rgb::new(0.2, 0.0, 1.0), Some(300.0)).unwrap();

        assert_eq!(gpio.pwm(Channel(17)), Some((0.2, 300.0)));
        assert_eq!(gpio.pwm(Channel(27)), Some((0.0, 300.0)));
        assert_eq!(gpio.pwm(Channel(22)), Some((1.0, 300.0)));
        assert_eq!(led.lit(), [true, false, true]);
    }

    #[test]
    fn flash_ends_off() {
        let gpio = MockGpio::new();
        let delay = MockDelay::new();
        let [mut r, mut g, mut b] = handles(&gpio);
        let mut led = RgbLed::new(&mut r, &mut g, &mut b, delay.clone()).unwrap();

        led.flash(25, 2).unwrap();

        assert_eq!(delay.delays(), vec![25; 4]);
        assert!(!led.is_lit());
        assert_eq!(gpio.output_level(Channel(22)), Some(Level::Low));
    }

    #[test]
    fn animate_until_stop() {
        let gpio = MockGpio::new();
        let delay = MockDelay::new();
        let [mut r, mut g, mut b] = handles(&gpio);
        let mut led = RgbLed::new(&mut r, &mut g, &mut b, delay.clone()).unwrap();

        led.animate(100, |t| {
            if t < 300 {
                Frame::Continue(Rgb::new(t as f64 / 300.0, 0.0, 0.0))
            } else {
                Frame::Stop
            }
        })
        .unwrap();

        assert_eq!(delay.total_ms(), 300);
        assert_eq!(led.lit(), [true, false, false]);
        let (duty, hz) = gpio.pwm(Channel(17)).unwrap();
        assert!((duty - 200.0 / 300.0).abs() < 1e-9);
        assert_eq!(hz, DEFAULT_PWM_HZ);
    }
}
