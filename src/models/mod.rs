//! Data models
//!
//! This module contains the parsed modem status and the sensor definitions
//! built on top of it.

pub mod sensor;
pub mod status;
