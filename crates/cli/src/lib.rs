//! gstasher CLI library
//!
//! This module exports the CLI components for use by the binary and in
//! integration tests.

pub mod commands;
pub mod exit_code;
pub mod output;
