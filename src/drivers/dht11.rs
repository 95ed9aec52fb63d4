//! DHT11 temperature/humidity reader.

use crate::traits::{HumiditySensor, SensorError};

/// Result of one read. A failed read leaves both fields empty.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Climate {
    /// Temperature in degrees Celsius.
    pub temperature_c: Option<f32>,
    /// Relative humidity in percent.
    pub humidity_pct: Option<f32>,
}

impl Climate {
    /// Returns `true` if the read produced values.
    pub fn is_valid(&self) -> bool {
        self.temperature_c.is_some() && self.humidity_pct.is_some()
    }
}

/// DHT11 driver over a sensor bus.
///
/// Read failures never propagate: they are logged and reported as an empty
/// [`Climate`], since the sensor routinely misses a read and the caller
/// simply tries again later.
///
/// # Example
///
/// ```rust
/// use pi_header::drivers::Dht11;
/// use pi_header::hal::MockSensor;
///
/// let mut dht = Dht11::new(MockSensor::reading(21.0, 40.0));
/// assert_eq!(dht.temperature(), Some(21.0));
/// assert_eq!(dht.humidity(), Some(40.0));
/// ```
#[derive(Debug)]
pub struct Dht11<S: HumiditySensor> {
    sensor: S,
}

impl<S: HumiditySensor> Dht11<S> {
    /// Wraps a sensor bus.
    pub fn new(sensor: S) -> Self {
        Self { sensor }
    }

    /// Reads temperature and humidity together.
    pub fn read(&mut self) -> Climate {
        match self.sensor.read() {
            Ok(sample) => Climate {
                temperature_c: Some(sample.temperature_c),
                humidity_pct: Some(sample.humidity_pct),
            },
            Err(SensorError::Transient(e)) => {
                log::warn!("DHT11 read missed: {e}");
                Climate::default()
            }
            Err(SensorError::Bus(e)) => {
                log::warn!("DHT11 bus error: {e}");
                Climate::default()
            }
        }
    }

    /// Temperature in degrees Celsius, or `None` if the read failed.
    pub fn temperature(&mut self) -> Option<f32> {
        self.read().temperature_c
    }

    /// Relative humidity in percent, or `None` if the read failed.
    pub fn humidity(&mut self) -> Option<f32> {
        self.read().humidity_pct
    }

    /// Gives back the sensor bus.
    pub fn into_inner(self) -> S {
        self.sensor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::MockSensor;
    use crate::traits::ClimateSample;

    #[test]
    fn successful_read() {
        let mut dht = Dht11::new(MockSensor::reading(23.5, 55.0));
        let climate = dht.read();
        assert!(climate.is_valid());
        assert_eq!(climate.temperature_c, Some(23.5));
        assert_eq!(climate.humidity_pct, Some(55.0));
    }

    #[test]
    fn failures_become_empty() {
        let mut sensor = MockSensor::new();
        sensor.queue(Err(SensorError::Transient("checksum".into())));
        sensor.queue(Err(SensorError::Bus("pin busy".into())));
        sensor.queue(Ok(ClimateSample {
            temperature_c: 19.0,
            humidity_pct: 30.0,
        }));
        let mut dht = Dht11::new(sensor);

        assert_eq!(dht.read(), Climate::default());
        assert_eq!(dht.humidity(), None);
        assert_eq!(dht.temperature(), Some(19.0));
        assert_eq!(dht.temperature(), None);
        assert_eq!(dht.into_inner().reads, 4);
    }
}
