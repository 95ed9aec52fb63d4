//! Board configuration: driver defaults, edge-watch and animation settings.
//!
//! Uses `heapless::String` for the board label so the config stays
//! fixed-size and cheap to clone.
//!
//! # Example
//!
//! ```rust
//! use pi_header::config::{Config, EdgeConfig, PwmConfig};
//! use pi_header::Pull;
//!
//! // Use defaults
//! let config = Config::default();
//! assert_eq!(config.pwm.default_frequency_hz, 100.0);
//!
//! // Or customize
//! let config = Config::default()
//!     .with_pwm(PwmConfig::default().with_default_frequency_hz(500.0))
//!     .with_edge(EdgeConfig::default().with_pull(Pull::Up).with_debounce_ms(20));
//! assert!(config.validate().is_ok());
//! ```

use heapless::String as HString;

use crate::error::GpioError;
use crate::traits::Pull;

/// Maximum length of the board label.
pub const MAX_LABEL: usize = 32;

/// Type alias for the board label.
pub type Label = HString<MAX_LABEL>;

/// PWM frequency used when a fractional level is requested without one.
pub const DEFAULT_PWM_HZ: f64 = 100.0;

/// Fixed PWM frequency an active buzzer uses for intermediate volumes.
pub const ACTIVE_BUZZER_PWM_HZ: f64 = 1000.0;

/// Debounce applied to edge watches unless configured otherwise.
pub const DEFAULT_DEBOUNCE_MS: u32 = 50;

/// Animation step used when none is given.
pub const DEFAULT_STEP_MS: u32 = 1000;

/// Create a Label from a &str, truncating if too long
pub fn label(s: &str) -> Label {
    let mut hs = Label::new();
    for c in s.chars() {
        if hs.push(c).is_err() {
            break;
        }
    }
    hs
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete board configuration
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Board identification
    pub board: BoardConfig,
    /// PWM defaults for the drivers
    pub pwm: PwmConfig,
    /// Edge watch defaults
    pub edge: EdgeConfig,
    /// Animation defaults
    pub animation: AnimationConfig,
}

impl Config {
    /// Set board configuration
    pub fn with_board(mut self, board: BoardConfig) -> Self {
        self.board = board;
        self
    }

    /// Set PWM configuration
    pub fn with_pwm(mut self, pwm: PwmConfig) -> Self {
        self.pwm = pwm;
        self
    }

    /// Set edge configuration
    pub fn with_edge(mut self, edge: EdgeConfig) -> Self {
        self.edge = edge;
        self
    }

    /// Set animation configuration
    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }

    /// Checks that every frequency is finite and positive and that the
    /// animation step is non-zero.
    pub fn validate(&self) -> Result<(), GpioError> {
        let positive = |hz: f64| hz.is_finite() && hz > 0.0;
        if !positive(self.pwm.default_frequency_hz) {
            return Err(GpioError::InvalidArgument(
                "pwm.default_frequency_hz must be positive",
            ));
        }
        if !positive(self.pwm.active_buzzer_frequency_hz) {
            return Err(GpioError::InvalidArgument(
                "pwm.active_buzzer_frequency_hz must be positive",
            ));
        }
        if self.animation.default_step_ms == 0 {
            return Err(GpioError::InvalidArgument(
                "animation.default_step_ms must be at least 1",
            ));
        }
        Ok(())
    }

    /// Parses and validates a JSON config. Missing fields take defaults.
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Board Config
// ============================================================================

/// Board identification
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoardConfig {
    /// Human-readable name used in log lines
    pub label: Label,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            label: label("raspberry-pi"),
        }
    }
}

impl BoardConfig {
    /// Set the board label
    pub fn with_label(mut self, name: &str) -> Self {
        self.label = label(name);
        self
    }
}

// ============================================================================
// PWM Config
// ============================================================================

/// PWM defaults for the peripheral drivers
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PwmConfig {
    /// Frequency for LED dimming and animation, in hertz
    pub default_frequency_hz: f64,
    /// Fixed frequency an active buzzer uses for intermediate volumes
    pub active_buzzer_frequency_hz: f64,
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            default_frequency_hz: DEFAULT_PWM_HZ,
            active_buzzer_frequency_hz: ACTIVE_BUZZER_PWM_HZ,
        }
    }
}

impl PwmConfig {
    /// Set the default LED PWM frequency
    pub fn with_default_frequency_hz(mut self, hz: f64) -> Self {
        self.default_frequency_hz = hz;
        self
    }

    /// Set the active buzzer fallback frequency
    pub fn with_active_buzzer_frequency_hz(mut self, hz: f64) -> Self {
        self.active_buzzer_frequency_hz = hz;
        self
    }
}

// ============================================================================
// Edge Config
// ============================================================================

/// Edge watch defaults
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EdgeConfig {
    /// Debounce window passed to the hardware, in milliseconds
    pub debounce_ms: u32,
    /// Pull resistor for watched inputs
    pub pull: Pull,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            pull: Pull::Floating,
        }
    }
}

impl EdgeConfig {
    /// Set the debounce window
    pub fn with_debounce_ms(mut self, ms: u32) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Set the pull resistor
    pub fn with_pull(mut self, pull: Pull) -> Self {
        self.pull = pull;
        self
    }
}

// ============================================================================
// Animation Config
// ============================================================================

/// Animation defaults
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnimationConfig {
    /// Time between animation frames, in milliseconds
    pub default_step_ms: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            default_step_ms: DEFAULT_STEP_MS,
        }
    }
}

impl AnimationConfig {
    /// Set the default step
    pub fn with_default_step_ms(mut self, ms: u32) -> Self {
        self.default_step_ms = ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.board.label.as_str(), "raspberry-pi");
        assert_eq!(config.pwm.default_frequency_hz, DEFAULT_PWM_HZ);
        assert_eq!(config.pwm.active_buzzer_frequency_hz, ACTIVE_BUZZER_PWM_HZ);
        assert_eq!(config.edge.debounce_ms, 50);
        assert_eq!(config.edge.pull, Pull::Floating);
        assert_eq!(config.animation.default_step_ms, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn label_truncates() {
        let long = "x".repeat(100);
        assert_eq!(label(&long).len(), MAX_LABEL);
        let config = BoardConfig::default().with_label("bench-pi");
        assert_eq!(config.label.as_str(), "bench-pi");
    }

    #[test]
    fn label_truncates_on_char_boundary() {
        let s = "é".repeat(20); // 40 bytes
        let l = label(&s);
        assert_eq!(l.len(), 32);
        assert!(l.chars().all(|c| c == 'é'));
    }

    #[test]
    fn validate_rejects_bad_frequencies() {
        let config =
            Config::default().with_pwm(PwmConfig::default().with_default_frequency_hz(0.0));
        assert!(config.validate().is_err());

        let config = Config::default()
            .with_pwm(PwmConfig::default().with_active_buzzer_frequency_hz(f64::NAN));
        assert!(config.validate().is_err());

        let config =
            Config::default().with_animation(AnimationConfig::default().with_default_step_ms(0));
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "json")]
    #[test]
    fn from_json_fills_defaults() {
        let config =
            Config::from_json(r#"{ "edge": { "debounce_ms": 10, "pull": "up" } }"#).unwrap();
        assert_eq!(config.edge.debounce_ms, 10);
        assert_eq!(config.edge.pull, Pull::Up);
        assert_eq!(config.pwm, PwmConfig::default());
    }

    #[cfg(feature = "json")]
    #[test]
    fn from_json_validates() {
        assert!(Config::from_json(r#"{ "pwm": { "default_frequency_hz": -1.0 } }"#).is_err());
    }
}
