//! Display models for CLI output
//!
//! Turns reconciliation results into rows and lines for the terminal.

pub mod display;

pub use display::{Action, Describe, Report};
