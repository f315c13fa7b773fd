//! Command handlers.

pub mod check;
pub mod config_cmd;
