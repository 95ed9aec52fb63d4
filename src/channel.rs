//! Per-channel handle: drive state bookkeeping plus edge callbacks.
//!
//! A [`ChannelHandle`] claims one channel from a [`GpioBackend`] when it
//! is opened and gives it back when it is closed or dropped. In between it
//! remembers what it last asked the line to do ([`DriveMode`]) and owns
//! the [`EdgeRegistry`] used by its edge watch.
//!
//! # Example
//!
//! ```rust
//! use pi_header::{ChannelHandle, DriveMode, Level, Pull};
//! use pi_header::edge::Edge;
//! use pi_header::hal::MockGpio;
//! use pi_header::pins::{Channel, PhysicalPin};
//!
//! let gpio = MockGpio::new();
//! let mut button = ChannelHandle::open_physical(gpio.clone(), PhysicalPin(16)).unwrap();
//! assert_eq!(button.channel(), Channel(23));
//!
//! button.register_edge_callback(Edge::Rising, Box::new(|| println!("pressed")));
//! button.start_edge_watch(Pull::Down, 50).unwrap();
//! assert_eq!(button.mode(), DriveMode::Input(Pull::Down));
//!
//! button.close();
//! assert!(!gpio.is_claimed(Channel(23)));
//! ```

use alloc::vec::Vec;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::edge::{CallbackId, Edge, EdgeCallback, EdgeRegistry};
use crate::error::GpioError;
use crate::pins::{Channel, PhysicalPin, PinMapping};
use crate::traits::{Claim, EdgeHandler, GpioBackend, Level, LineMode, Pull};

/// What the handle last asked the line to do.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DriveMode {
    /// Not configured since it was opened, released or had PWM stopped.
    #[default]
    Undriven,
    /// Digital output at a fixed level.
    Digital(Level),
    /// PWM output.
    Pwm {
        /// Duty fraction, 0.0 to 1.0.
        duty: f64,
        /// Frequency in hertz.
        frequency_hz: f64,
    },
    /// Input with a pull resistor.
    Input(Pull),
}

impl DriveMode {
    /// Returns `true` if the last command drives the line with a non-zero
    /// level.
    pub fn is_active(&self) -> bool {
        match *self {
            DriveMode::Digital(level) => level.is_high(),
            DriveMode::Pwm { duty, .. } => duty > 0.0,
            DriveMode::Undriven | DriveMode::Input(_) => false,
        }
    }
}

/// Which channel to open: by physical position or by channel number.
///
/// Exactly one of the two must be given.
///
/// # Example
///
/// ```rust
/// use pi_header::channel::PinSelection;
/// use pi_header::pins::{Channel, PhysicalPin, PinMapping};
///
/// let mapping = PinMapping::standard();
/// let by_pin = PinSelection::new().with_physical(PhysicalPin(7));
/// assert_eq!(by_pin.resolve(mapping).unwrap(), (PhysicalPin(7), Channel(4)));
///
/// let both = by_pin.with_channel(Channel(4));
/// assert!(both.resolve(mapping).is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PinSelection {
    physical: Option<PhysicalPin>,
    channel: Option<Channel>,
}

impl PinSelection {
    /// Empty selection; set one identifier before opening.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select by physical header position.
    pub fn with_physical(mut self, pin: PhysicalPin) -> Self {
        self.physical = Some(pin);
        self
    }

    /// Select by channel number.
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Resolves the selection to both identifiers.
    pub fn resolve(&self, mapping: &PinMapping) -> Result<(PhysicalPin, Channel), GpioError> {
        match (self.physical, self.channel) {
            (Some(pin), None) => Ok((pin, mapping.to_channel(pin)?)),
            (None, Some(channel)) => Ok((mapping.to_physical(channel)?, channel)),
            (Some(_), Some(_)) => Err(GpioError::InvalidArgument(
                "give either a physical pin or a channel, not both",
            )),
            (None, None) => Err(GpioError::InvalidArgument(
                "a physical pin or a channel is required",
            )),
        }
    }
}

impl From<PhysicalPin> for PinSelection {
    fn from(pin: PhysicalPin) -> Self {
        Self::new().with_physical(pin)
    }
}

impl From<Channel> for PinSelection {
    fn from(channel: Channel) -> Self {
        Self::new().with_channel(channel)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Exclusive logical ownership of one channel.
///
/// All hardware work goes through the backend `B`; the handle keeps the
/// bookkeeping. The channel is released by [`close`](Self::close), which
/// also runs on drop.
///
/// If the backend releases the channel behind the handle's back (for
/// example [`Board::cleanup`](crate::Board::cleanup)), the handle notices
/// through its [`Claim`], counts itself closed and never touches the
/// channel again, even if someone else has claimed it since.
///
/// # Thread Safety
///
/// The handle itself is used from one thread. Edge callbacks run on the
/// backend's interrupt thread.
pub struct ChannelHandle<B: GpioBackend> {
    backend: B,
    channel: Channel,
    physical: PhysicalPin,
    claim: Claim,
    mode: DriveMode,
    watching: bool,
    closed: bool,
    registry: Arc<Mutex<EdgeRegistry>>,
    faults: Arc<Mutex<Vec<GpioError>>>,
}

impl<B: GpioBackend> ChannelHandle<B> {
    /// Opens a channel using the standard header mapping.
    ///
    /// Fails with [`GpioError::InvalidArgument`] unless exactly one
    /// identifier is selected, with [`GpioError::UnmappedPin`] or
    /// [`GpioError::UnknownChannel`] if it does not translate, and with
    /// whatever the backend reports if the claim fails.
    pub fn open(backend: B, selection: impl Into<PinSelection>) -> Result<Self, GpioError> {
        Self::open_with_mapping(backend, selection, PinMapping::standard())
    }

    /// Opens a channel by physical header position.
    pub fn open_physical(backend: B, pin: PhysicalPin) -> Result<Self, GpioError> {
        Self::open(backend, pin)
    }

    /// Opens a channel by channel number.
    pub fn open_channel(backend: B, channel: Channel) -> Result<Self, GpioError> {
        Self::open(backend, channel)
    }

    /// Opens a channel using a custom header mapping.
    pub fn open_with_mapping(
        backend: B,
        selection: impl Into<PinSelection>,
        mapping: &PinMapping,
    ) -> Result<Self, GpioError> {
        let (physical, channel) = selection.into().resolve(mapping)?;
        let claim = backend.acquire(channel)?;
        log::debug!("claimed channel {channel} (pin {physical})");

        Ok(Self {
            backend,
            channel,
            physical,
            claim,
            mode: DriveMode::Undriven,
            watching: false,
            closed: false,
            registry: Arc::new(Mutex::new(EdgeRegistry::new())),
            faults: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Channel this handle owns.
    #[inline]
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Physical header position of the channel.
    #[inline]
    pub fn physical_pin(&self) -> PhysicalPin {
        self.physical
    }

    /// What the line was last asked to do.
    #[inline]
    pub fn mode(&self) -> DriveMode {
        self.mode
    }

    /// Returns `true` while an edge watch is armed.
    #[inline]
    pub fn is_watching(&self) -> bool {
        self.watching
    }

    /// Returns `true` once the channel has been released, by this handle
    /// or by the backend.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed || !self.claim.is_live()
    }

    /// Forgets hardware state after the backend released the channel.
    fn abandon(&mut self) {
        log::debug!("channel {} was released by the backend", self.channel);
        self.closed = true;
        self.watching = false;
        self.mode = DriveMode::Undriven;
    }

    fn ensure_open(&mut self) -> Result<(), GpioError> {
        if !self.closed && !self.claim.is_live() {
            self.abandon();
        }
        if self.closed {
            Err(GpioError::ChannelReleased(self.channel))
        } else {
            Ok(())
        }
    }

    /// Stops the running PWM session, if any.
    fn end_pwm(&mut self) -> Result<(), GpioError> {
        if let DriveMode::Pwm { .. } = self.mode {
            self.backend.stop_pwm(self.channel)?;
            self.mode = DriveMode::Undriven;
        }
        Ok(())
    }

    fn disarm(&mut self) -> Result<(), GpioError> {
        if self.watching {
            self.backend.disarm_edges(self.channel)?;
            self.watching = false;
        }
        Ok(())
    }

    /// Drives the line to a fixed level.
    ///
    /// Any PWM session is stopped first and an armed edge watch is
    /// disarmed; registered callbacks are kept.
    pub fn drive_digital(&mut self, level: Level) -> Result<(), GpioError> {
        self.ensure_open()?;
        self.end_pwm()?;
        self.disarm()?;
        if !matches!(self.mode, DriveMode::Digital(_)) {
            self.backend.configure(self.channel, LineMode::Output)?;
        }
        self.backend.write(self.channel, level)?;
        self.mode = DriveMode::Digital(level);
        Ok(())
    }

    /// Starts PWM at `duty` (0.0-1.0) and `frequency_hz`.
    ///
    /// Arguments are checked before any hardware call: `duty` must be a
    /// finite value in [0, 1] and `frequency_hz` finite and positive.
    pub fn drive_pwm(&mut self, duty: f64, frequency_hz: f64) -> Result<(), GpioError> {
        if !duty.is_finite() || !(0.0..=1.0).contains(&duty) {
            return Err(GpioError::InvalidArgument("duty must be within 0.0..=1.0"));
        }
        if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
            return Err(GpioError::InvalidArgument("PWM frequency must be positive"));
        }
        self.ensure_open()?;
        self.end_pwm()?;
        self.disarm()?;
        self.backend.configure(self.channel, LineMode::Output)?;
        self.backend.start_pwm(self.channel, duty, frequency_hz)?;
        self.mode = DriveMode::Pwm { duty, frequency_hz };
        Ok(())
    }

    /// Configures the line as an input and samples it.
    ///
    /// Every call samples the hardware again. An armed edge watch with the
    /// same pull stays armed; otherwise it is disarmed.
    pub fn read_digital(&mut self, pull: Pull) -> Result<Level, GpioError> {
        self.ensure_open()?;
        self.end_pwm()?;
        if self.mode != DriveMode::Input(pull) {
            self.disarm()?;
            self.backend.configure(self.channel, LineMode::Input(pull))?;
            self.mode = DriveMode::Input(pull);
        }
        self.backend.read(self.channel)
    }

    /// Adds `callback` to the registry for `edge`.
    ///
    /// This is bookkeeping only; it does not arm interrupt delivery.
    pub fn register_edge_callback(&mut self, edge: Edge, callback: EdgeCallback) -> CallbackId {
        lock(&self.registry).register(edge, callback)
    }

    /// Removes the callback registered as `id`.
    ///
    /// Fails with [`GpioError::CallbackNotFound`] if `id` is not present.
    pub fn deregister_edge_callback(&mut self, id: CallbackId) -> Result<(), GpioError> {
        lock(&self.registry).deregister(id)
    }

    /// Empties every registry and resets the id counters.
    pub fn clear_callbacks(&mut self) {
        lock(&self.registry).clear();
    }

    /// Number of callbacks registered for `edge`.
    pub fn callback_count(&self, edge: Edge) -> usize {
        lock(&self.registry).len(edge)
    }

    /// Arms a single either-edge interrupt on the line.
    ///
    /// Each delivered edge reads the line again on the interrupt thread and
    /// dispatches to the registered callbacks according to that level. An
    /// edge whose read fails is logged and skipped. A panicking callback is
    /// logged and kept for [`take_callback_faults`](Self::take_callback_faults);
    /// it does not stop delivery to other callbacks or of later edges.
    pub fn start_edge_watch(&mut self, pull: Pull, debounce_ms: u32) -> Result<(), GpioError> {
        self.ensure_open()?;
        self.end_pwm()?;
        self.disarm()?;
        self.backend.configure(self.channel, LineMode::Input(pull))?;
        self.mode = DriveMode::Input(pull);

        let backend = self.backend.clone();
        let channel = self.channel;
        let registry = Arc::clone(&self.registry);
        let faults = Arc::clone(&self.faults);
        let handler: EdgeHandler = Box::new(move || {
            let level = match backend.read(channel) {
                Ok(level) => level,
                Err(e) => {
                    log::warn!("channel {channel}: edge dropped, reading the line failed: {e}");
                    return;
                }
            };
            let report = lock(&registry).dispatch(level);
            if !report.faults.is_empty() {
                lock(&faults).extend(report.faults);
            }
        });
        self.backend.arm_edges(self.channel, debounce_ms, handler)?;
        self.watching = true;
        log::debug!(
            "edge watch armed on channel {} (debounce {debounce_ms} ms)",
            self.channel
        );
        Ok(())
    }

    /// Disarms interrupt delivery. Registered callbacks are kept.
    pub fn stop_edge_watch(&mut self) -> Result<(), GpioError> {
        self.ensure_open()?;
        self.disarm()
    }

    /// Returns and forgets the callback faults collected by the edge watch.
    pub fn take_callback_faults(&self) -> Vec<GpioError> {
        core::mem::take(&mut *lock(&self.faults))
    }

    /// Releases the channel.
    ///
    /// Disarms the edge watch, stops PWM, drives the line low and gives the
    /// channel back to the backend. Never fails: each teardown step that
    /// errors is logged and the remaining steps still run. Calling it again
    /// after a successful release does nothing; after a failed release it
    /// retries.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        if !self.claim.is_live() {
            self.abandon();
            return;
        }
        let channel = self.channel;

        if self.watching {
            if let Err(e) = self.backend.disarm_edges(channel) {
                log::warn!("channel {channel}: disarming edge watch failed: {e}");
            }
            self.watching = false;
        }
        if let DriveMode::Pwm { .. } = self.mode {
            if let Err(e) = self.backend.stop_pwm(channel) {
                log::warn!("channel {channel}: stopping PWM failed: {e}");
            }
        }
        let drive_low = self
            .backend
            .configure(channel, LineMode::Output)
            .and_then(|()| self.backend.write(channel, Level::Low));
        if let Err(e) = drive_low {
            log::warn!("channel {channel}: driving low failed: {e}");
        }
        self.mode = DriveMode::Undriven;

        match self.backend.release(channel) {
            Ok(()) => {
                self.closed = true;
                log::debug!("released channel {channel}");
            }
            Err(e) => log::warn!("channel {channel}: release failed: {e}"),
        }
    }
}

impl<B: GpioBackend> Drop for ChannelHandle<B> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<B: GpioBackend> core::fmt::Debug for ChannelHandle<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChannelHandle")
            .field("channel", &self.channel)
            .field("physical", &self.physical)
            .field("mode", &self.mode)
            .field("watching", &self.watching)
            .field("closed", &self.closed)
            .finish()
    }
}

// ============================================================================
// embedded-hal
// ============================================================================

impl<B: GpioBackend> embedded_hal::digital::ErrorType for ChannelHandle<B> {
    type Error = GpioError;
}

impl<B: GpioBackend> embedded_hal::digital::OutputPin for ChannelHandle<B> {
    fn set_low(&mut self) -> Result<(), GpioError> {
        self.drive_digital(Level::Low)
    }

    fn set_high(&mut self) -> Result<(), GpioError> {
        self.drive_digital(Level::High)
    }
}

impl<B: GpioBackend> embedded_hal::digital::StatefulOutputPin for ChannelHandle<B> {
    fn is_set_high(&mut self) -> Result<bool, GpioError> {
        Ok(self.mode == DriveMode::Digital(Level::High))
    }

    fn is_set_low(&mut self) -> Result<bool, GpioError> {
        Ok(self.mode == DriveMode::Digital(Level::Low))
    }
}

impl<B: GpioBackend> embedded_hal::digital::InputPin for ChannelHandle<B> {
    fn is_high(&mut self) -> Result<bool, GpioError> {
        let pull = match self.mode {
            DriveMode::Input(pull) => pull,
            _ => Pull::Floating,
        };
        Ok(self.read_digital(pull)?.is_high())
    }

    fn is_low(&mut self) -> Result<bool, GpioError> {
        self.is_high().map(|high| !high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockCall, MockGpio};

    fn open(gpio: &MockGpio, channel: u8) -> ChannelHandle<MockGpio> {
        ChannelHandle::open_channel(gpio.clone(), Channel(channel)).unwrap()
    }

    #[test]
    fn open_caches_physical_pin() {
        let gpio = MockGpio::new();
        let handle = open(&gpio, 18);
        assert_eq!(handle.physical_pin(), PhysicalPin(12));
        assert_eq!(handle.mode(), DriveMode::Undriven);
        assert!(gpio.is_claimed(Channel(18)));
    }

    #[test]
    fn open_rejects_unrouted_channel_without_claiming() {
        let gpio = MockGpio::new();
        let err = ChannelHandle::open_channel(gpio.clone(), Channel(30)).unwrap_err();
        assert_eq!(err, GpioError::UnknownChannel(Channel(30)));
        assert!(gpio.calls().is_empty());
    }

    #[test]
    fn second_open_conflicts() {
        let gpio = MockGpio::new();
        let _first = open(&gpio, 17);
        let err = ChannelHandle::open_physical(gpio.clone(), PhysicalPin(11)).unwrap_err();
        assert_eq!(err, GpioError::ChannelClaimConflict(Channel(17)));
    }

    #[test]
    fn pwm_rejects_bad_arguments_before_touching_hardware() {
        let gpio = MockGpio::new();
        let mut handle = open(&gpio, 12);
        gpio.clear_calls();

        let bad = [
            (1.5, 100.0),
            (-0.1, 100.0),
            (f64::NAN, 100.0),
            (0.5, 0.0),
            (0.5, -5.0),
            (0.5, f64::INFINITY),
        ];
        for (duty, freq) in bad {
            assert!(matches!(
                handle.drive_pwm(duty, freq),
                Err(GpioError::InvalidArgument(_))
            ));
        }
        assert!(gpio.calls().is_empty());
    }

    #[test]
    fn pwm_restart_stops_previous_session() {
        let gpio = MockGpio::new();
        let mut handle = open(&gpio, 13);
        handle.drive_pwm(0.25, 200.0).unwrap();
        gpio.clear_calls();

        handle.drive_pwm(0.75, 400.0).unwrap();

        assert_eq!(
            gpio.calls(),
            vec![
                MockCall::StopPwm(Channel(13)),
                MockCall::Configure(Channel(13), LineMode::Output),
                MockCall::StartPwm(Channel(13), 0.75, 400.0),
            ]
        );
        assert_eq!(gpio.pwm(Channel(13)), Some((0.75, 400.0)));
    }

    #[test]
    fn digital_drive_is_idempotent() {
        let gpio = MockGpio::new();
        let mut handle = open(&gpio, 5);
        handle.drive_digital(Level::High).unwrap();
        handle.drive_digital(Level::High).unwrap();
        assert_eq!(handle.mode(), DriveMode::Digital(Level::High));
        assert_eq!(gpio.output_level(Channel(5)), Some(Level::High));

        let configures = gpio
            .calls()
            .iter()
            .filter(|c| matches!(c, MockCall::Configure(..)))
            .count();
        assert_eq!(configures, 1);
    }

    #[test]
    fn read_resamples_every_call() {
        let gpio = MockGpio::new();
        let mut handle = open(&gpio, 6);
        gpio.set_input_level(Channel(6), Level::High);
        assert_eq!(handle.read_digital(Pull::Floating).unwrap(), Level::High);
        gpio.set_input_level(Channel(6), Level::Low);
        assert_eq!(handle.read_digital(Pull::Floating).unwrap(), Level::Low);
    }

    #[test]
    fn read_after_pwm_stops_it() {
        let gpio = MockGpio::new();
        let mut handle = open(&gpio, 19);
        handle.drive_pwm(0.5, 50.0).unwrap();
        handle.read_digital(Pull::Up).unwrap();
        assert_eq!(gpio.pwm(Channel(19)), None);
        assert_eq!(handle.mode(), DriveMode::Input(Pull::Up));
    }

    #[test]
    fn operations_after_close_fail() {
        let gpio = MockGpio::new();
        let mut handle = open(&gpio, 20);
        handle.close();
        assert!(handle.is_closed());
        assert_eq!(
            handle.drive_digital(Level::High),
            Err(GpioError::ChannelReleased(Channel(20)))
        );
        assert_eq!(
            handle.start_edge_watch(Pull::Up, 10),
            Err(GpioError::ChannelReleased(Channel(20)))
        );
    }

    #[test]
    fn close_tears_down_in_order() {
        let gpio = MockGpio::new();
        let mut handle = open(&gpio, 21);
        handle.start_edge_watch(Pull::Up, 20).unwrap();
        gpio.clear_calls();

        handle.close();

        assert_eq!(
            gpio.calls(),
            vec![
                MockCall::DisarmEdges(Channel(21)),
                MockCall::Configure(Channel(21), LineMode::Output),
                MockCall::Write(Channel(21), Level::Low),
                MockCall::Release(Channel(21)),
            ]
        );
    }

    #[test]
    fn close_survives_backend_failure_and_retries() {
        let gpio = MockGpio::new();
        let mut handle = open(&gpio, 26);
        handle.drive_pwm(0.5, 100.0).unwrap();

        gpio.set_failing(true);
        handle.close();
        assert!(!handle.is_closed());
        assert!(gpio.is_claimed(Channel(26)));

        gpio.set_failing(false);
        handle.close();
        assert!(handle.is_closed());
        assert!(!gpio.is_claimed(Channel(26)));
    }

    #[test]
    fn released_claim_is_never_touched_again() {
        let gpio = MockGpio::new();
        let mut stale = open(&gpio, 18);
        stale.drive_digital(Level::High).unwrap();

        gpio.release_all().unwrap();
        let mut fresh = open(&gpio, 18);
        fresh.drive_digital(Level::High).unwrap();
        gpio.clear_calls();

        assert!(stale.is_closed());
        assert_eq!(
            stale.drive_digital(Level::Low),
            Err(GpioError::ChannelReleased(Channel(18)))
        );
        drop(stale);

        assert!(gpio.calls().is_empty());
        assert!(gpio.is_claimed(Channel(18)));
        assert_eq!(gpio.output_level(Channel(18)), Some(Level::High));
        fresh.drive_digital(Level::Low).unwrap();
    }

    #[test]
    fn edge_dispatch_reads_the_line() {
        let gpio = MockGpio::new();
        let mut handle = open(&gpio, 17);
        handle.register_edge_callback(Edge::Rising, Box::new(|| {}));
        handle.start_edge_watch(Pull::Down, 0).unwrap();
        gpio.clear_calls();

        gpio.trigger_edge(Channel(17), Level::High);
        gpio.trigger_edge(Channel(17), Level::Low);

        assert_eq!(
            gpio.calls(),
            vec![MockCall::Read(Channel(17)), MockCall::Read(Channel(17))]
        );
    }

    #[test]
    fn edge_with_failed_read_is_skipped() {
        let gpio = MockGpio::new();
        let mut handle = open(&gpio, 17);
        let hits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&hits);
        handle.register_edge_callback(
            Edge::Either,
            Box::new(move || *counter.lock().unwrap() += 1),
        );
        handle.start_edge_watch(Pull::Down, 0).unwrap();

        gpio.set_failing(true);
        assert!(gpio.trigger_edge(Channel(17), Level::High));
        gpio.set_failing(false);
        assert!(gpio.trigger_edge(Channel(17), Level::Low));

        assert_eq!(*hits.lock().unwrap(), 1);
        assert!(handle.take_callback_faults().is_empty());
    }

    #[test]
    fn drop_releases_channel() {
        let gpio = MockGpio::new();
        {
            let mut handle = open(&gpio, 16);
            handle.drive_digital(Level::High).unwrap();
        }
        assert!(!gpio.is_claimed(Channel(16)));
    }

    #[test]
    fn embedded_hal_output_and_input() {
        use embedded_hal::digital::{InputPin, OutputPin, StatefulOutputPin};

        let gpio = MockGpio::new();
        let mut handle = open(&gpio, 24);
        handle.set_high().unwrap();
        assert!(handle.is_set_high().unwrap());
        handle.set_low().unwrap();
        assert!(handle.is_set_low().unwrap());

        gpio.set_input_level(Channel(24), Level::High);
        assert!(handle.is_high().unwrap());
        assert_eq!(handle.mode(), DriveMode::Input(Pull::Floating));
    }

    #[test]
    fn drive_mode_activity() {
        assert!(DriveMode::Digital(Level::High).is_active());
        assert!(!DriveMode::Digital(Level::Low).is_active());
        assert!(DriveMode::Pwm { duty: 0.1, frequency_hz: 1.0 }.is_active());
        assert!(!DriveMode::Pwm { duty: 0.0, frequency_hz: 1.0 }.is_active());
        assert!(!DriveMode::Input(Pull::Up).is_active());
        assert!(!DriveMode::Undriven.is_active());
    }
}
