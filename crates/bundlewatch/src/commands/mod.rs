//! Command handlers for the `bundlewatch` CLI.

pub mod config_cmd;
pub mod summary;
pub mod watch;

mod refresh;
