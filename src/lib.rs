//! SHTC3 Sensor Driver for Embedded Rust
//!
//! This crate provides a platform-agnostic driver for the Sensirion SHTC3 temperature
//! and humidity sensor, built on top of the [`embedded-hal`] traits.
//!
//! # Features
//! - Blocking synchronous API using `embedded-hal` traits
//! - Designed for `no_std` environments
//! - CRC-8 validation of every word the sensor sends back
//! - The sensor is put back to sleep after every measurement, even a failed one
//! - Owned or borrowed I2C bus, with an optional lock around each transfer
//!
//! # Dependencies
//! This driver depends on the following `embedded-hal` traits:
//! - [`I2c`] for bus access
//! - [`DelayNs`] for accurate timing
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` and logs through `defmt`
//! - `log`: Logs through the `log` facade
//!
//! # Example
//!
//! ```ignore
//! use shtc3_sensor::{PowerMode, Shtc3};
//!
//! let mut sensor = Shtc3::new(i2c, delay);
//! sensor.init()?;
//!
//! let raw = sensor.read(PowerMode::Normal)?;
//! let temperature = raw.celsius();
//! let humidity = raw.relative_humidity();
//! ```
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`I2c`]: embedded_hal::i2c::I2c
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

// Must stay first so the logging macros are visible to the other modules.
#[macro_use]
mod fmt;

pub mod bus;
pub mod checksum;
pub mod command;
pub mod error;
pub mod measurement;
pub mod shtc3;

pub use bus::{Bus, BusLock, NoLock, Ownership};
pub use command::Command;
pub use error::Error;
pub use measurement::{RawMeasurement, Reading, to_celsius, to_fahrenheit, to_percentage};
pub use shtc3::{DEFAULT_ADDRESS, DEFAULT_POLL_ATTEMPTS, PowerMode, Shtc3};
