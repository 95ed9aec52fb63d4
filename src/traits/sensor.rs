//! Sensor bus collaborator for temperature/humidity sensors.
//!
//! The bus protocol itself lives outside this crate. A [`HumiditySensor`]
//! only has to produce a [`ClimateSample`] or say why it could not.

use thiserror::Error;

/// One successful temperature/humidity reading.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClimateSample {
    /// Temperature in degrees Celsius.
    pub temperature_c: f32,
    /// Relative humidity in percent.
    pub humidity_pct: f32,
}

/// Why a sensor read failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SensorError {
    /// The read timed out or failed its checksum; retrying may succeed.
    #[error("transient read failure: {0}")]
    Transient(String),
    /// The bus or pin could not be used at all.
    #[error("sensor bus failure: {0}")]
    Bus(String),
}

/// A temperature/humidity sensor on some bus.
pub trait HumiditySensor {
    /// Performs one blocking read.
    fn read(&mut self) -> Result<ClimateSample, SensorError>;
}

impl<S: HumiditySensor + ?Sized> HumiditySensor for Box<S> {
    fn read(&mut self) -> Result<ClimateSample, SensorError> {
        (**self).read()
    }
}
