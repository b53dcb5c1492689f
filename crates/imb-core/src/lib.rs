//! Core domain + application logic for the IMEI check bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and HTTP live behind
//! ports (traits) implemented in adapter crates.

pub mod config;
pub mod conversation;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod imei;
pub mod logging;
pub mod messaging;
pub mod ports;
pub mod provider;
pub mod registration;
pub mod report;

pub use errors::{Error, ProviderError, Result};
