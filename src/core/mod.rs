//! Core application modules
//!
//! This module contains configuration, constants, logging, the modem client
//! and the status poller.

pub mod client;
pub mod config;
pub mod constants;
pub mod logging;
pub mod poller;
pub mod source;
