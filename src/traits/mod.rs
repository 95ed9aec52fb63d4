//! Trait definitions for the external collaborators this crate drives.
//!
//! This module defines the abstractions that allow pi-header to:
//! - Run against real GPIO hardware or an in-memory mock
//! - Sleep on the wall clock or record delays in tests
//! - Read a temperature/humidity sensor without knowing its bus protocol
//!
//! # Submodules
//!
//! - `hardware`: GPIO backend and blocking delay
//! - `sensor`: temperature/humidity sensor

pub mod hardware;
pub mod sensor;

pub use hardware::*;
pub use sensor::*;
