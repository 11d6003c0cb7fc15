//! Collaborator layer for bundlewatch: the carrier web API client and
//! the local usage-monitor runner.
//!
//! Both collaborators produce the opaque inputs the accounting engine
//! consumes -- a [`bundlewatch_core::BalanceRecord`] and raw vnstat-style
//! usage text. Neither makes accounting decisions; any failure here
//! simply fails the refresh cycle.

pub mod client;
pub mod error;
pub mod monitor;

pub use client::{ApiGeneration, CarrierClient};
pub use error::Error;
pub use monitor::UsageMonitor;
