#![forbid(unsafe_code)]

//! Command-line harness for the dashboard layout.
//!
//! `orbit-harness replay` drives the layout controller through the web gesture
//! adapter from a JSON script; `orbit-harness defaults` prints the shipped
//! bounds so they can be copied into a config file.

pub mod cli;
pub mod error;
pub mod logging;
pub mod replay;

pub use cli::{run, run_from_env};
pub use error::{HarnessError, Result};
