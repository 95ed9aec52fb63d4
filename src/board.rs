//! Whole-board entry point.
//!
//! A [`Board`] bundles one backend, one delay source and the [`Config`].
//! It opens channel handles, builds drivers with the configured defaults,
//! and tears the header down in one call.
//!
//! # Usage
//!
//! ```rust
//! use pi_header::config::Config;
//! use pi_header::hal::{MockDelay, MockGpio};
//! use pi_header::pins::PhysicalPin;
//! use pi_header::Board;
//!
//! let gpio = MockGpio::new();
//! let board = Board::new(gpio.clone(), MockDelay::new(), Config::default()).unwrap();
//!
//! let mut pin = board.open_physical(PhysicalPin(12)).unwrap();
//! let mut led = board.led(&mut pin).unwrap();
//! led.flash(100, 2).unwrap();
//! drop(led);
//! drop(pin);
//!
//! board.cleanup();
//! assert!(!gpio.is_claimed(pi_header::pins::Channel(18)));
//! ```

use crate::channel::{ChannelHandle, PinSelection};
use crate::config::Config;
use crate::drivers::{ActiveBuzzer, Led, PassiveBuzzer, RgbLed};
use crate::error::GpioError;
use crate::pins::{Channel, PhysicalPin};
use crate::traits::{Delay, GpioBackend};

/// One GPIO header with its configuration.
pub struct Board<B: GpioBackend, D: Delay + Clone> {
    /// Hardware access shared by every handle opened here
    backend: B,
    /// Delay source cloned into each driver
    delay: D,
    /// Validated configuration
    config: Config,
}

impl<B: GpioBackend, D: Delay + Clone> Board<B, D> {
    /// Creates a board after validating `config`.
    pub fn new(backend: B, delay: D, config: Config) -> Result<Self, GpioError> {
        config.validate()?;
        log::info!("board '{}' ready", config.board.label);
        Ok(Self {
            backend,
            delay,
            config,
        })
    }

    /// The configuration in use.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The backend shared by this board's handles.
    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Default animation step from the configuration.
    #[inline]
    pub fn animation_step_ms(&self) -> u32 {
        self.config.animation.default_step_ms
    }

    // ========================================================================
    // Channels
    // ========================================================================

    /// Opens a channel handle.
    pub fn open(&self, selection: impl Into<PinSelection>) -> Result<ChannelHandle<B>, GpioError> {
        ChannelHandle::open(self.backend.clone(), selection)
    }

    /// Opens a channel handle by physical header position.
    pub fn open_physical(&self, pin: PhysicalPin) -> Result<ChannelHandle<B>, GpioError> {
        self.open(pin)
    }

    /// Opens a channel handle by channel number.
    pub fn open_channel(&self, channel: Channel) -> Result<ChannelHandle<B>, GpioError> {
        self.open(channel)
    }

    /// Arms an edge watch with the configured pull and debounce.
    pub fn watch_edges(&self, handle: &mut ChannelHandle<B>) -> Result<(), GpioError> {
        handle.start_edge_watch(self.config.edge.pull, self.config.edge.debounce_ms)
    }

    // ========================================================================
    // Drivers
    // ========================================================================

    /// Builds an LED driver using the configured PWM frequency.
    pub fn led<'a>(&self, handle: &'a mut ChannelHandle<B>) -> Result<Led<'a, B, D>, GpioError> {
        Ok(Led::new(handle, self.delay.clone())?
            .with_pwm_frequency(self.config.pwm.default_frequency_hz))
    }

    /// Builds an RGB LED driver using the configured PWM frequency.
    pub fn rgb_led<'a>(
        &self,
        red: &'a mut ChannelHandle<B>,
        green: &'a mut ChannelHandle<B>,
        blue: &'a mut ChannelHandle<B>,
    ) -> Result<RgbLed<'a, B, D>, GpioError> {
        Ok(RgbLed::new(red, green, blue, self.delay.clone())?
            .with_pwm_frequency(self.config.pwm.default_frequency_hz))
    }

    /// Builds a passive buzzer driver.
    pub fn passive_buzzer<'a>(
        &self,
        handle: &'a mut ChannelHandle<B>,
    ) -> Result<PassiveBuzzer<'a, B, D>, GpioError> {
        PassiveBuzzer::new(handle, self.delay.clone())
    }

    /// Builds an active buzzer driver using the configured fallback frequency.
    pub fn active_buzzer<'a>(
        &self,
        handle: &'a mut ChannelHandle<B>,
    ) -> Result<ActiveBuzzer<'a, B, D>, GpioError> {
        Ok(ActiveBuzzer::new(handle, self.delay.clone())?
            .with_fallback_frequency(self.config.pwm.active_buzzer_frequency_hz))
    }

    /// Releases every channel claimed through this board's backend.
    ///
    /// Meant for shutdown. Never fails; a backend error is logged. Handles
    /// still alive afterwards count as closed and leave their channel to
    /// whoever claims it next.
    pub fn cleanup(&self) {
        match self.backend.release_all() {
            Ok(()) => log::info!("board '{}' released", self.config.board.label),
            Err(e) => log::warn!("board '{}': cleanup failed: {e}", self.config.board.label),
        }
    }
}

impl<B: GpioBackend, D: Delay + Clone> core::fmt::Debug for Board<B, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Board")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EdgeConfig, PwmConfig};
    use crate::hal::{MockCall, MockDelay, MockGpio};
    use crate::traits::{Level, LineMode, Pull};

    fn board(config: Config) -> (MockGpio, Board<MockGpio, MockDelay>) {
        let gpio = MockGpio::new();
        let board = Board::new(gpio.clone(), MockDelay::new(), config).unwrap();
        (gpio, board)
    }

    #[test]
    fn rejects_invalid_config() {
        let config =
            Config::default().with_pwm(PwmConfig::default().with_default_frequency_hz(-5.0));
        assert!(Board::new(MockGpio::new(), MockDelay::new(), config).is_err());
    }

    #[test]
    fn led_uses_configured_frequency() {
        let (gpio, board) = board(
            Config::default().with_pwm(PwmConfig::default().with_default_frequency_hz(400.0)),
        );
        let mut pin = board.open_channel(Channel(18)).unwrap();
        let mut led = board.led(&mut pin).unwrap();
        led.set_brightness(0.5, None).unwrap();
        assert_eq!(gpio.pwm(Channel(18)), Some((0.5, 400.0)));
    }

    #[test]
    fn active_buzzer_uses_configured_fallback() {
        let (gpio, board) = board(
            Config::default()
                .with_pwm(PwmConfig::default().with_active_buzzer_frequency_hz(2500.0)),
        );
        let mut pin = board.open_channel(Channel(23)).unwrap();
        let mut buzzer = board.active_buzzer(&mut pin).unwrap();
        buzzer.beep(0.5, 10).unwrap();
        assert!(gpio
            .calls()
            .contains(&MockCall::StartPwm(Channel(23), 0.5, 2500.0)));
    }

    #[test]
    fn watch_edges_uses_edge_config() {
        let (gpio, board) = board(
            Config::default()
                .with_edge(EdgeConfig::default().with_pull(Pull::Up).with_debounce_ms(15)),
        );
        let mut pin = board.open_physical(PhysicalPin(11)).unwrap();
        board.watch_edges(&mut pin).unwrap();
        assert!(pin.is_watching());
        assert_eq!(gpio.armed_debounce(Channel(17)), Some(15));
        assert_eq!(gpio.mode(Channel(17)), Some(LineMode::Input(Pull::Up)));
    }

    #[test]
    fn open_conflict_is_reported() {
        let (_gpio, board) = board(Config::default());
        let _first = board.open_channel(Channel(5)).unwrap();
        assert_eq!(
            board.open_physical(PhysicalPin(29)).unwrap_err(),
            GpioError::ChannelClaimConflict(Channel(5))
        );
    }

    #[test]
    fn cleanup_releases_everything() {
        let (gpio, board) = board(Config::default());
        let mut a = board.open_channel(Channel(17)).unwrap();
        let _b = board.open_channel(Channel(27)).unwrap();
        a.drive_digital(Level::High).unwrap();

        board.cleanup();

        assert!(!gpio.is_claimed(Channel(17)));
        assert!(!gpio.is_claimed(Channel(27)));
    }

    #[test]
    fn handle_outliving_cleanup_leaves_new_owner_alone() {
        let (gpio, board) = board(Config::default());
        let stale = board.open_channel(Channel(18)).unwrap();

        board.cleanup();
        let mut fresh = board.open_channel(Channel(18)).unwrap();
        fresh.drive_digital(Level::High).unwrap();
        drop(stale);

        assert!(gpio.is_claimed(Channel(18)));
        assert_eq!(gpio.output_level(Channel(18)), Some(Level::High));
        fresh.drive_digital(Level::Low).unwrap();
        assert!(!fresh.is_closed());
    }

    #[test]
    fn cleanup_swallows_backend_errors() {
        let (gpio, board) = board(Config::default());
        gpio.set_failing(true);
        board.cleanup();
    }
}
