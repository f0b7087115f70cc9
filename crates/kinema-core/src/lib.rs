//! # kinema-core
//!
//! Core types shared across all Kinema crates: colors and the named
//! palette, 3-D points and axis ranges, durations, error types, and the
//! structured diagnostics channel.

pub mod color;
pub mod diag;
pub mod error;
pub mod math;
pub mod time;

pub use color::Color;
pub use diag::{Diagnostic, Diagnostics, Severity, Stage};
pub use error::{KinemaError, KinemaResult};
pub use math::{Point3, StepRange};
pub use time::Duration;
