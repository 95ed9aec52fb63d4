//! # pi-header
//!
//! Pin translation, channel handles and small peripheral drivers for the
//! Raspberry Pi 40-pin GPIO header.
//!
//! ## Features
//!
//! - **Pin translation**: physical header positions to controller channels and back
//! - **Channel handles**: exclusive ownership of a line with digital, PWM and input modes
//! - **Edge callbacks**: rising/falling/either callbacks dispatched from one interrupt
//! - **Drivers**: LED, RGB LED, passive and active buzzers, DHT11
//! - **Deterministic release**: handles drive their line low and give it back on drop
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `pins` - Static header mapping
//! - `traits` - Hardware, delay and sensor abstractions
//! - `channel` - Channel handle and its lifecycle
//! - `edge` - Per-handle callback registry and dispatch
//! - `drivers` - Peripheral drivers on borrowed handles
//! - `board` - Backend, delay and config bundled together
//! - `hal` - Concrete implementations (mock for testing, rpi for hardware)
//!
//! ## Example
//!
//! ```rust
//! use pi_header::{ChannelHandle, DriveMode, Edge, GpioError, Level, Pull};
//! use pi_header::hal::MockGpio;
//! use pi_header::pins::{Channel, PhysicalPin};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let gpio = MockGpio::new();
//!
//! // Physical pin 12 is channel 18
//! let mut out = ChannelHandle::open_physical(gpio.clone(), PhysicalPin(12)).unwrap();
//! out.drive_pwm(0.25, 200.0).unwrap();
//! assert_eq!(out.mode(), DriveMode::Pwm { duty: 0.25, frequency_hz: 200.0 });
//!
//! // A second claim on the same line fails
//! assert_eq!(
//!     ChannelHandle::open_channel(gpio.clone(), Channel(18)).unwrap_err(),
//!     GpioError::ChannelClaimConflict(Channel(18))
//! );
//!
//! // Count rising edges on channel 17
//! let mut button = ChannelHandle::open_channel(gpio.clone(), Channel(17)).unwrap();
//! let rising = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&rising);
//! button.register_edge_callback(Edge::Rising, Box::new(move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! }));
//! button.start_edge_watch(Pull::Down, 20).unwrap();
//!
//! gpio.trigger_edge(Channel(17), Level::High);
//! gpio.trigger_edge(Channel(17), Level::Low);
//! assert_eq!(rising.load(Ordering::SeqCst), 1);
//! ```

#![warn(missing_docs)]

extern crate alloc;

/// Whole-board entry point bundling backend, delay and configuration.
pub mod board;
/// Channel handles: exclusive ownership and control of one line.
pub mod channel;
/// Board configuration with validated defaults.
pub mod config;
/// Peripheral drivers built on borrowed channel handles.
pub mod drivers;
/// Edge kinds, callback ids and the per-handle callback registry.
pub mod edge;
/// Error type shared by every fallible operation.
pub mod error;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Physical header position to channel translation.
pub mod pins;
/// Core traits for hardware, delay and sensor access.
pub mod traits;

// Re-exports for convenience
pub use board::Board;
pub use channel::{ChannelHandle, DriveMode, PinSelection};
pub use config::Config;
pub use edge::{CallbackId, Edge, EdgeCallback};
pub use error::GpioError;
pub use pins::{Channel, PhysicalPin, PinMapping};
pub use traits::{
    // Sensor
    ClimateSample,
    // Hardware
    Claim,
    Delay,
    EdgeHandler,
    GpioBackend,
    HumiditySensor,
    Level,
    LineMode,
    Pull,
    SensorError,
};
