//! Passive and active buzzers.
//!
//! A passive buzzer needs a waveform, so its pitch follows the PWM
//! frequency. An active buzzer has its own oscillator and only needs
//! power; here "volume" is the PWM duty.

use crate::channel::ChannelHandle;
use crate::config::ACTIVE_BUZZER_PWM_HZ;
use crate::drivers::drive_fraction;
use crate::error::GpioError;
use crate::traits::{Delay, GpioBackend, Level};

/// One note of a passive buzzer sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    /// Pitch in hertz; 0 is a rest.
    pub frequency_hz: f64,
    /// PWM duty, 0.0 to 1.0.
    pub volume: f64,
    /// How long the note lasts.
    pub duration_ms: u32,
}

impl Note {
    /// A tone.
    pub const fn new(frequency_hz: f64, volume: f64, duration_ms: u32) -> Self {
        Self {
            frequency_hz,
            volume,
            duration_ms,
        }
    }

    /// Silence for `duration_ms`.
    pub const fn rest(duration_ms: u32) -> Self {
        Self::new(0.0, 0.0, duration_ms)
    }

    /// Returns `true` for a rest.
    pub fn is_rest(&self) -> bool {
        self.frequency_hz == 0.0
    }
}

/// Passive buzzer driver.
///
/// # Example
///
/// ```rust
/// use pi_header::drivers::{Note, PassiveBuzzer};
/// use pi_header::hal::{MockDelay, MockGpio};
/// use pi_header::pins::Channel;
/// use pi_header::ChannelHandle;
///
/// let gpio = MockGpio::new();
/// let delay = MockDelay::new();
/// let mut pin = ChannelHandle::open_channel(gpio, Channel(18)).unwrap();
/// let mut buzzer = PassiveBuzzer::new(&mut pin, delay.clone()).unwrap();
///
/// buzzer.play_sequence(&[
///     Note::new(262.0, 0.5, 200),
///     Note::rest(100),
///     Note::new(392.0, 0.5, 200),
/// ]).unwrap();
///
/// assert_eq!(delay.total_ms(), 500);
/// assert!(!buzzer.is_active());
/// ```
pub struct PassiveBuzzer<'a, B: GpioBackend, D: Delay> {
    channel: &'a mut ChannelHandle<B>,
    delay: D,
    active: bool,
}

impl<'a, B: GpioBackend, D: Delay> PassiveBuzzer<'a, B, D> {
    /// Takes over `channel` and silences it.
    pub fn new(channel: &'a mut ChannelHandle<B>, delay: D) -> Result<Self, GpioError> {
        channel.drive_digital(Level::Low)?;
        Ok(Self {
            channel,
            delay,
            active: false,
        })
    }

    /// Returns `true` while a tone is being driven.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    fn sound(&mut self, note: &Note) -> Result<(), GpioError> {
        if note.is_rest() {
            self.channel.drive_digital(Level::Low)?;
            self.active = false;
        } else {
            self.channel.drive_pwm(note.volume, note.frequency_hz)?;
            self.active = note.volume != 0.0;
        }
        Ok(())
    }

    /// Plays one tone, blocking for `duration_ms`, then silences.
    ///
    /// A frequency of 0 holds the line low for the duration without
    /// starting PWM.
    pub fn beep(
        &mut self,
        frequency_hz: f64,
        volume: f64,
        duration_ms: u32,
    ) -> Result<(), GpioError> {
        self.sound(&Note::new(frequency_hz, volume, duration_ms))?;
        self.delay.delay_ms(duration_ms);
        self.stop()
    }

    /// Plays each note back to back, then silences.
    ///
    /// Blocks for the sum of the note durations.
    pub fn play_sequence(&mut self, notes: &[Note]) -> Result<(), GpioError> {
        for note in notes {
            self.sound(note)?;
            self.delay.delay_ms(note.duration_ms);
        }
        self.stop()
    }

    /// Silences the buzzer.
    pub fn stop(&mut self) -> Result<(), GpioError> {
        self.channel.drive_digital(Level::Low)?;
        self.active = false;
        Ok(())
    }
}

/// Active buzzer driver.
///
/// Volume 0 and 1 switch the line digitally. Any other volume is produced
/// with PWM at a fixed fallback frequency (1000 Hz unless configured).
/// An active buzzer has no controllable pitch, so that frequency only
/// shapes the duty cycle and can beat audibly against the buzzer's own
/// oscillator.
pub struct ActiveBuzzer<'a, B: GpioBackend, D: Delay> {
    channel: &'a mut ChannelHandle<B>,
    delay: D,
    fallback_hz: f64,
    active: bool,
}

impl<'a, B: GpioBackend, D: Delay> ActiveBuzzer<'a, B, D> {
    /// Takes over `channel` and silences it.
    pub fn new(channel: &'a mut ChannelHandle<B>, delay: D) -> Result<Self, GpioError> {
        channel.drive_digital(Level::Low)?;
        Ok(Self {
            channel,
            delay,
            fallback_hz: ACTIVE_BUZZER_PWM_HZ,
            active: false,
        })
    }

    /// Sets the PWM frequency used for intermediate volumes.
    pub fn with_fallback_frequency(mut self, hz: f64) -> Self {
        self.fallback_hz = hz;
        self
    }

    /// Returns `true` while the buzzer is powered.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Sounds at `volume` for `duration_ms`, then silences.
    pub fn beep(&mut self, volume: f64, duration_ms: u32) -> Result<(), GpioError> {
        if volume != 0.0 && volume != 1.0 {
            log::debug!(
                "active buzzer on channel {}: volume {volume} uses {} Hz PWM",
                self.channel.channel(),
                self.fallback_hz
            );
        }
        drive_fraction(&mut *self.channel, volume, None, self.fallback_hz)?;
        self.active = volume != 0.0;
        self.delay.delay_ms(duration_ms);
        self.stop()
    }

    /// Plays `(volume, duration_ms)` pairs in order.
    pub fn play_sequence(&mut self, beeps: &[(f64, u32)]) -> Result<(), GpioError> {
        for &(volume, duration_ms) in beeps {
            self.beep(volume, duration_ms)?;
        }
        Ok(())
    }

    /// Silences the buzzer.
    pub fn stop(&mut self) -> Result<(), GpioError> {
        self.channel.drive_digital(Level::Low)?;
        self.active = false;
        Ok(())
    }
}
