//! Raspberry Pi implementations using `rppal`.
//!
//! [`RpiGpio`] implements [`GpioBackend`] on the BCM controller through
//! `/dev/gpiomem`. PWM is rppal's software PWM, so any channel can use it.
//! Edge delivery runs on rppal's interrupt thread, and each edge reads the
//! line back through the shared claim table.
//!
//! [`RpiDht11`] reads a DHT11 through `embedded-dht-rs`.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rppal::gpio::{self, Event, Gpio, InputPin, IoPin, Mode, OutputPin, Pin, PullUpDown, Trigger};

use crate::error::GpioError;
use crate::pins::Channel;
use crate::traits::{
    Claim, ClimateSample, EdgeHandler, GpioBackend, HumiditySensor, Level, LineMode, Pull,
    SensorError,
};

fn map_err(err: gpio::Error) -> GpioError {
    match err {
        gpio::Error::PinUsed(n) => GpioError::ChannelClaimConflict(Channel(n)),
        other => GpioError::Hardware(other.to_string()),
    }
}

fn to_rppal(level: Level) -> gpio::Level {
    match level {
        Level::Low => gpio::Level::Low,
        Level::High => gpio::Level::High,
    }
}

fn from_rppal(level: gpio::Level) -> Level {
    Level::from(level == gpio::Level::High)
}

// ============================================================================
// GPIO
// ============================================================================

/// A claimed line in whichever mode rppal currently holds it.
enum Line {
    Idle(Pin),
    Output(OutputPin),
    Input(InputPin),
}

/// One entry in the claim table.
struct Claimed {
    claim: Claim,
    line: Line,
}

struct RpiState {
    gpio: Gpio,
    lines: HashMap<u8, Claimed>,
}

impl RpiState {
    fn line(&mut self, channel: Channel) -> Result<&mut Line, GpioError> {
        self.lines
            .get_mut(&channel.0)
            .map(|c| &mut c.line)
            .ok_or_else(|| not_acquired(channel))
    }

    fn take(&mut self, channel: Channel) -> Result<Claimed, GpioError> {
        self.lines.remove(&channel.0).ok_or_else(|| not_acquired(channel))
    }

    fn put_back(&mut self, channel: Channel, claimed: Claimed) -> Result<(), GpioError> {
        match self.lines.entry(channel.0) {
            Entry::Occupied(_) => Err(GpioError::ChannelClaimConflict(channel)),
            Entry::Vacant(slot) => {
                slot.insert(claimed);
                Ok(())
            }
        }
    }
}

fn not_acquired(channel: Channel) -> GpioError {
    GpioError::Hardware(format!("channel {channel} not acquired"))
}

/// GPIO backend on the Raspberry Pi's BCM controller.
///
/// Clones share the same controller and claim table. Dropping an input pin
/// or clearing its interrupt joins rppal's interrupt thread, which may be
/// waiting on the table to read the line. Those steps therefore run with
/// the table unlocked, after the line has been taken out of it.
#[derive(Clone)]
pub struct RpiGpio {
    state: Arc<Mutex<RpiState>>,
}

impl RpiGpio {
    /// Opens the GPIO controller.
    pub fn new() -> Result<Self, GpioError> {
        let gpio = Gpio::new().map_err(map_err)?;
        log::info!("opened GPIO controller");
        Ok(Self {
            state: Arc::new(Mutex::new(RpiState {
                gpio,
                lines: HashMap::new(),
            })),
        })
    }

    fn lock(&self) -> MutexGuard<'_, RpiState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl core::fmt::Debug for RpiGpio {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.lock();
        let mut claimed: Vec<u8> = state.lines.keys().copied().collect();
        claimed.sort_unstable();
        f.debug_struct("RpiGpio").field("claimed", &claimed).finish()
    }
}

impl GpioBackend for RpiGpio {
    fn acquire(&self, channel: Channel) -> Result<Claim, GpioError> {
        let mut state = self.lock();
        if state.lines.contains_key(&channel.0) {
            return Err(GpioError::ChannelClaimConflict(channel));
        }
        let pin = state.gpio.get(channel.0).map_err(map_err)?;
        let claim = Claim::new();
        state.lines.insert(
            channel.0,
            Claimed {
                claim: claim.clone(),
                line: Line::Idle(pin),
            },
        );
        Ok(claim)
    }

    fn configure(&self, channel: Channel, mode: LineMode) -> Result<(), GpioError> {
        let Claimed { claim, line } = self.lock().take(channel)?;
        // rppal converts a pin by value, so a configured line is dropped
        // (unlocked) and the pin taken again.
        let pin = match line {
            Line::Idle(pin) => pin,
            other => {
                drop(other);
                match self.lock().gpio.get(channel.0) {
                    Ok(pin) => pin,
                    Err(e) => {
                        claim.revoke();
                        return Err(map_err(e));
                    }
                }
            }
        };
        let line = match mode {
            LineMode::Output => Line::Output(pin.into_output_low()),
            LineMode::Input(Pull::Floating) => Line::Input(pin.into_input()),
            LineMode::Input(Pull::Up) => Line::Input(pin.into_input_pullup()),
            LineMode::Input(Pull::Down) => Line::Input(pin.into_input_pulldown()),
        };
        self.lock().put_back(channel, Claimed { claim, line })
    }

    fn write(&self, channel: Channel, level: Level) -> Result<(), GpioError> {
        match self.lock().line(channel)? {
            Line::Output(pin) => {
                pin.write(to_rppal(level));
                Ok(())
            }
            _ => Err(GpioError::Hardware(format!(
                "channel {channel} is not an output"
            ))),
        }
    }

    fn read(&self, channel: Channel) -> Result<Level, GpioError> {
        Ok(match self.lock().line(channel)? {
            Line::Idle(pin) => from_rppal(pin.read()),
            Line::Input(pin) => from_rppal(pin.read()),
            Line::Output(pin) => Level::from(pin.is_set_high()),
        })
    }

    fn start_pwm(&self, channel: Channel, duty: f64, frequency_hz: f64) -> Result<(), GpioError> {
        match self.lock().line(channel)? {
            Line::Output(pin) => pin.set_pwm_frequency(frequency_hz, duty).map_err(map_err),
            _ => Err(GpioError::Hardware(format!(
                "channel {channel} is not an output"
            ))),
        }
    }

    fn stop_pwm(&self, channel: Channel) -> Result<(), GpioError> {
        match self.lock().line(channel)? {
            Line::Output(pin) => pin.clear_pwm().map_err(map_err),
            _ => Ok(()),
        }
    }

    fn arm_edges(
        &self,
        channel: Channel,
        debounce_ms: u32,
        mut handler: EdgeHandler,
    ) -> Result<(), GpioError> {
        let debounce = (debounce_ms > 0).then(|| Duration::from_millis(u64::from(debounce_ms)));
        match self.lock().line(channel)? {
            Line::Input(pin) => pin
                .set_async_interrupt(Trigger::Both, debounce, move |_: Event| handler())
                .map_err(map_err),
            _ => Err(GpioError::Hardware(format!(
                "channel {channel} is not an input"
            ))),
        }
    }

    fn disarm_edges(&self, channel: Channel) -> Result<(), GpioError> {
        let mut claimed = {
            let mut state = self.lock();
            if !matches!(state.line(channel)?, Line::Input(_)) {
                return Ok(());
            }
            state.take(channel)?
        };
        // Edges arriving while the line is out of the table fail their read
        // and are dropped.
        let cleared = match &mut claimed.line {
            Line::Input(pin) => pin.clear_async_interrupt().map_err(map_err),
            _ => Ok(()),
        };
        self.lock().put_back(channel, claimed)?;
        cleared
    }

    fn release(&self, channel: Channel) -> Result<(), GpioError> {
        let removed = self.lock().lines.remove(&channel.0);
        if let Some(claimed) = removed {
            claimed.claim.revoke();
        }
        Ok(())
    }

    fn release_all(&self) -> Result<(), GpioError> {
        let drained: Vec<Claimed> = self.lock().lines.drain().map(|(_, c)| c).collect();
        for claimed in &drained {
            claimed.claim.revoke();
        }
        log::debug!("released {} channels", drained.len());
        drop(drained);
        Ok(())
    }
}

// ============================================================================
// DHT11
// ============================================================================

/// Single-wire data line for the DHT11.
///
/// Driving low pulls the bus down. Driving high releases it to the pull-up
/// so the sensor can answer on the same line.
pub struct DhtLine {
    pin: IoPin,
}

impl embedded_hal::digital::ErrorType for DhtLine {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for DhtLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.pin.set_mode(Mode::Output);
        self.pin.set_low();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pin.set_mode(Mode::Input);
        Ok(())
    }
}

impl embedded_hal::digital::InputPin for DhtLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pin.is_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pin.is_low())
    }
}

/// DHT11 on one GPIO channel.
///
/// Claims the channel directly from the controller, so it conflicts with
/// any [`ChannelHandle`](crate::ChannelHandle) on the same channel.
pub struct RpiDht11 {
    sensor: embedded_dht_rs::dht11::Dht11<DhtLine, rppal::hal::Delay>,
}

impl RpiDht11 {
    /// Claims `channel` for the sensor's data line.
    pub fn open(gpio: &RpiGpio, channel: Channel) -> Result<Self, GpioError> {
        let mut pin = {
            let state = gpio.lock();
            if state.lines.contains_key(&channel.0) {
                return Err(GpioError::ChannelClaimConflict(channel));
            }
            state.gpio.get(channel.0).map_err(map_err)?.into_io(Mode::Input)
        };
        pin.set_pullupdown(PullUpDown::PullUp);
        log::debug!("DHT11 on channel {channel}");
        Ok(Self {
            sensor: embedded_dht_rs::dht11::Dht11::new(DhtLine { pin }, rppal::hal::Delay::new()),
        })
    }
}

impl HumiditySensor for RpiDht11 {
    fn read(&mut self) -> Result<ClimateSample, SensorError> {
        let reading = self
            .sensor
            .read()
            .map_err(|e| SensorError::Transient(format!("{e:?}")))?;
        Ok(ClimateSample {
            temperature_c: f32::from(reading.temperature),
            humidity_pct: f32::from(reading.humidity),
        })
    }
}
