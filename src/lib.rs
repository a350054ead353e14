//! Compile-time configuration and TLS credentials for an ESP32 device talking
//! to an MQTT broker over mutually-authenticated TLS.
//!
//! Values come from `cfg.toml` through `build.rs`; see [`config::CONFIG`] and
//! [`credentials::DEVICE`].

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod constants;
pub mod credentials;
pub mod cstr;
pub mod pem;
pub mod status;
pub mod telemetry;
pub mod topic;

#[cfg(feature = "firmware")]
pub mod probe;
#[cfg(feature = "firmware")]
pub mod wifi;
