//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for every collaborator trait,
//! enabling development and testing on desktop without a Raspberry Pi.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockGpio`] | [`GpioBackend`] | Tracks claims, modes, levels, PWM and armed edges |
//! | [`MockDelay`] | [`Delay`] | Records requested delays without sleeping |
//! | [`MockSensor`] | [`HumiditySensor`] | Queued readings and failures |
//!
//! # Example
//!
//! ```rust
//! use pi_header::{ChannelHandle, Level};
//! use pi_header::hal::MockGpio;
//! use pi_header::pins::{Channel, PhysicalPin};
//!
//! let gpio = MockGpio::new();
//! let mut pin = ChannelHandle::open_physical(gpio.clone(), PhysicalPin(11)).unwrap();
//! pin.drive_digital(Level::High).unwrap();
//!
//! assert_eq!(gpio.output_level(Channel(17)), Some(Level::High));
//! ```
//!
//! [`GpioBackend`]: crate::traits::GpioBackend
//! [`Delay`]: crate::traits::Delay
//! [`HumiditySensor`]: crate::traits::HumiditySensor

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::GpioError;
use crate::pins::Channel;
use crate::traits::{
    Claim, ClimateSample, Delay, EdgeHandler, GpioBackend, HumiditySensor, Level, LineMode,
    Pull, SensorError,
};

// ============================================================================
// GPIO Mock
// ============================================================================

/// One backend operation, as recorded by [`MockGpio`].
#[derive(Clone, Debug, PartialEq)]
pub enum MockCall {
    /// `acquire(channel)`
    Acquire(Channel),
    /// `configure(channel, mode)`
    Configure(Channel, LineMode),
    /// `write(channel, level)`
    Write(Channel, Level),
    /// `read(channel)`
    Read(Channel),
    /// `start_pwm(channel, duty, frequency_hz)`
    StartPwm(Channel, f64, f64),
    /// `stop_pwm(channel)`
    StopPwm(Channel),
    /// `arm_edges(channel, debounce_ms)`
    ArmEdges(Channel, u32),
    /// `disarm_edges(channel)`
    DisarmEdges(Channel),
    /// `release(channel)`
    Release(Channel),
}

impl MockCall {
    /// Channel the call targeted.
    pub fn channel(&self) -> Channel {
        match *self {
            MockCall::Acquire(c)
            | MockCall::Configure(c, _)
            | MockCall::Write(c, _)
            | MockCall::Read(c)
            | MockCall::StartPwm(c, _, _)
            | MockCall::StopPwm(c)
            | MockCall::ArmEdges(c, _)
            | MockCall::DisarmEdges(c)
            | MockCall::Release(c) => c,
        }
    }
}

/// State of one claimed line.
#[derive(Default)]
struct MockLine {
    claim: Claim,
    mode: Option<LineMode>,
    output: Level,
    input: Level,
    pwm: Option<(f64, f64)>,
    edges: Option<(u32, EdgeHandler)>,
}

#[derive(Default)]
struct MockState {
    lines: BTreeMap<Channel, MockLine>,
    /// Input levels set before a channel is claimed.
    pending_inputs: BTreeMap<Channel, Level>,
    calls: Vec<MockCall>,
    failing: bool,
}

impl MockState {
    fn line(&mut self, channel: Channel) -> Result<&mut MockLine, GpioError> {
        if self.failing {
            return Err(GpioError::Hardware("injected fault".into()));
        }
        self.lines
            .get_mut(&channel)
            .ok_or_else(|| GpioError::Hardware(format!("channel {channel} not acquired")))
    }
}

/// Mock GPIO backend for testing.
///
/// Clones share the same state, so a test keeps one clone to inspect
/// what the code under test did with another. Every operation is appended
/// to a call log available through [`calls`](Self::calls).
///
/// # Example
///
/// ```rust
/// use pi_header::hal::{MockCall, MockGpio};
/// use pi_header::pins::Channel;
/// use pi_header::traits::GpioBackend;
/// use pi_header::GpioError;
///
/// let gpio = MockGpio::new();
/// gpio.acquire(Channel(4)).unwrap();
///
/// // A second claim on the same channel conflicts
/// assert_eq!(
///     gpio.acquire(Channel(4)),
///     Err(GpioError::ChannelClaimConflict(Channel(4)))
/// );
///
/// gpio.release(Channel(4)).unwrap();
/// assert!(!gpio.is_claimed(Channel(4)));
/// assert_eq!(gpio.calls().last(), Some(&MockCall::Release(Channel(4))));
/// ```
#[derive(Clone, Default)]
pub struct MockGpio {
    state: Arc<Mutex<MockState>>,
}

impl core::fmt::Debug for MockGpio {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.lock();
        f.debug_struct("MockGpio")
            .field("claimed", &state.lines.keys().collect::<Vec<_>>())
            .field("calls", &state.calls.len())
            .finish()
    }
}

impl MockGpio {
    /// Creates a mock with no claimed channels.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes every subsequent operation fail with [`GpioError::Hardware`].
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Sets the level that reads on `channel` will return.
    pub fn set_input_level(&self, channel: Channel, level: Level) {
        let mut state = self.lock();
        match state.lines.get_mut(&channel) {
            Some(line) => line.input = level,
            None => {
                state.pending_inputs.insert(channel, level);
            }
        }
    }

    /// Simulates the line settling at `level` and the interrupt thread
    /// delivering the edge.
    ///
    /// The handler runs without the mock's lock held, so it can read the
    /// line back through the backend. Returns `false` if no edge watch is
    /// armed on `channel`.
    pub fn trigger_edge(&self, channel: Channel, level: Level) -> bool {
        let (debounce, mut handler) = {
            let mut state = self.lock();
            let Some(line) = state.lines.get_mut(&channel) else {
                return false;
            };
            line.input = level;
            let Some(armed) = line.edges.take() else {
                return false;
            };
            armed
        };

        handler();

        let mut state = self.lock();
        if let Some(line) = state.lines.get_mut(&channel) {
            if line.edges.is_none() {
                line.edges = Some((debounce, handler));
            }
        }
        true
    }

    /// Returns every recorded call in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Returns the recorded calls that targeted `channel`.
    pub fn calls_for(&self, channel: Channel) -> Vec<MockCall> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.channel() == channel)
            .cloned()
            .collect()
    }

    /// Forgets the recorded calls.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Returns `true` if `channel` is currently claimed.
    pub fn is_claimed(&self, channel: Channel) -> bool {
        self.lock().lines.contains_key(&channel)
    }

    /// Current direction of a claimed line, if configured.
    pub fn mode(&self, channel: Channel) -> Option<LineMode> {
        self.lock().lines.get(&channel).and_then(|l| l.mode)
    }

    /// Last level written to a claimed output line.
    pub fn output_level(&self, channel: Channel) -> Option<Level> {
        let state = self.lock();
        let line = state.lines.get(&channel)?;
        match line.mode {
            Some(LineMode::Output) => Some(line.output),
            _ => None,
        }
    }

    /// Active PWM session as `(duty, frequency_hz)`.
    pub fn pwm(&self, channel: Channel) -> Option<(f64, f64)> {
        self.lock().lines.get(&channel).and_then(|l| l.pwm)
    }

    /// Debounce of the armed edge watch, if one is armed.
    pub fn armed_debounce(&self, channel: Channel) -> Option<u32> {
        self.lock()
            .lines
            .get(&channel)
            .and_then(|l| l.edges.as_ref().map(|(d, _)| *d))
    }

    /// Returns `true` if any PWM session was ever started on `channel`.
    pub fn pwm_started(&self, channel: Channel) -> bool {
        self.calls_for(channel)
            .iter()
            .any(|c| matches!(c, MockCall::StartPwm(..)))
    }
}

impl GpioBackend for MockGpio {
    fn acquire(&self, channel: Channel) -> Result<Claim, GpioError> {
        let mut state = self.lock();
        state.calls.push(MockCall::Acquire(channel));
        if state.failing {
            return Err(GpioError::Hardware("injected fault".into()));
        }
        if state.lines.contains_key(&channel) {
            return Err(GpioError::ChannelClaimConflict(channel));
        }
        let input = state.pending_inputs.remove(&channel).unwrap_or_default();
        let claim = Claim::new();
        state.lines.insert(
            channel,
            MockLine {
                claim: claim.clone(),
                input,
                ..MockLine::default()
            },
        );
        Ok(claim)
    }

    fn configure(&self, channel: Channel, mode: LineMode) -> Result<(), GpioError> {
        let mut state = self.lock();
        state.calls.push(MockCall::Configure(channel, mode));
        let line = state.line(channel)?;
        line.mode = Some(mode);
        if let LineMode::Input(pull) = mode {
            match pull {
                Pull::Up => line.input = Level::High,
                Pull::Down => line.input = Level::Low,
                Pull::Floating => {}
            }
        }
        Ok(())
    }

    fn write(&self, channel: Channel, level: Level) -> Result<(), GpioError> {
        let mut state = self.lock();
        state.calls.push(MockCall::Write(channel, level));
        let line = state.line(channel)?;
        if line.mode != Some(LineMode::Output) {
            return Err(GpioError::Hardware(format!(
                "channel {channel} is not an output"
            )));
        }
        line.output = level;
        Ok(())
    }

    fn read(&self, channel: Channel) -> Result<Level, GpioError> {
        let mut state = self.lock();
        state.calls.push(MockCall::Read(channel));
        let line = state.line(channel)?;
        Ok(match line.mode {
            Some(LineMode::Output) => line.output,
            _ => line.input,
        })
    }

    fn start_pwm(&self, channel: Channel, duty: f64, frequency_hz: f64) -> Result<(), GpioError> {
        let mut state = self.lock();
        state
            .calls
            .push(MockCall::StartPwm(channel, duty, frequency_hz));
        let line = state.line(channel)?;
        line.pwm = Some((duty, frequency_hz));
        Ok(())
    }

    fn stop_pwm(&self, channel: Channel) -> Result<(), GpioError> {
        let mut state = self.lock();
        state.calls.push(MockCall::StopPwm(channel));
        state.line(channel)?.pwm = None;
        Ok(())
    }

    fn arm_edges(
        &self,
        channel: Channel,
        debounce_ms: u32,
        handler: EdgeHandler,
    ) -> Result<(), GpioError> {
        let mut state = self.lock();
        state.calls.push(MockCall::ArmEdges(channel, debounce_ms));
        state.line(channel)?.edges = Some((debounce_ms, handler));
        Ok(())
    }

    fn disarm_edges(&self, channel: Channel) -> Result<(), GpioError> {
        let mut state = self.lock();
        state.calls.push(MockCall::DisarmEdges(channel));
        state.line(channel)?.edges = None;
        Ok(())
    }

    fn release(&self, channel: Channel) -> Result<(), GpioError> {
        let mut state = self.lock();
        state.calls.push(MockCall::Release(channel));
        if state.failing {
            return Err(GpioError::Hardware("injected fault".into()));
        }
        if let Some(line) = state.lines.remove(&channel) {
            line.claim.revoke();
        }
        Ok(())
    }

    fn release_all(&self) -> Result<(), GpioError> {
        let mut state = self.lock();
        if state.failing {
            return Err(GpioError::Hardware("injected fault".into()));
        }
        let channels: Vec<Channel> = state.lines.keys().copied().collect();
        for channel in channels {
            state.calls.push(MockCall::Release(channel));
        }
        for (_, line) in std::mem::take(&mut state.lines) {
            line.claim.revoke();
        }
        Ok(())
    }
}

// ============================================================================
// Delay Mock
// ============================================================================

/// Mock delay for testing.
///
/// Records every requested delay instead of sleeping. Clones share the
/// record, so a test can keep one clone and hand another to a driver.
///
/// # Example
///
/// ```rust
/// use pi_header::hal::MockDelay;
/// use pi_header::traits::Delay;
///
/// let delay = MockDelay::new();
/// let mut d = delay.clone();
/// d.delay_ms(50);
/// d.delay_ms(25);
///
/// assert_eq!(delay.total_ms(), 75);
/// assert_eq!(delay.delays(), vec![50, 25]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MockDelay {
    delays: Arc<Mutex<Vec<u32>>>,
}

impl MockDelay {
    /// Creates a mock delay with an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every delay requested so far, in order.
    pub fn delays(&self) -> Vec<u32> {
        self.delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Sum of all requested delays.
    pub fn total_ms(&self) -> u64 {
        self.delays().iter().map(|&ms| u64::from(ms)).sum()
    }
}

impl Delay for MockDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ms);
    }
}

// ============================================================================
// Sensor Mock
// ============================================================================

/// Mock temperature/humidity sensor.
///
/// Returns queued results in FIFO order, then repeats `fallback`.
#[derive(Debug, Default)]
pub struct MockSensor {
    queued: VecDeque<Result<ClimateSample, SensorError>>,
    /// Result returned once the queue is empty.
    pub fallback: Option<ClimateSample>,
    /// Number of reads performed.
    pub reads: usize,
}

impl MockSensor {
    /// Creates a sensor that fails with a transient error until fed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sensor that always reads `sample`.
    pub fn reading(temperature_c: f32, humidity_pct: f32) -> Self {
        Self {
            fallback: Some(ClimateSample {
                temperature_c,
                humidity_pct,
            }),
            ..Self::default()
        }
    }

    /// Queues one result.
    pub fn queue(&mut self, result: Result<ClimateSample, SensorError>) {
        self.queued.push_back(result);
    }
}

impl HumiditySensor for MockSensor {
    fn read(&mut self) -> Result<ClimateSample, SensorError> {
        self.reads += 1;
        match self.queued.pop_front() {
            Some(result) => result,
            None => self
                .fallback
                .ok_or_else(|| SensorError::Transient("no data".into())),
        }
    }
}
