//! HTTP API consumed by the home-automation host

pub mod endpoints;
