use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Virtual playback duration, stored as fractional seconds. The
/// interpreter has no wall clock; durations only advance the engine's
/// simulated timeline.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Duration {
    seconds: f64,
}

impl Duration {
    /// Create a duration from seconds. Negative input clamps to zero.
    pub fn from_seconds(s: f64) -> Self {
        Self {
            seconds: s.max(0.0),
        }
    }

    /// Create a zero duration.
    pub fn zero() -> Self {
        Self { seconds: 0.0 }
    }

    /// Get duration as seconds.
    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }
}

impl Default for Duration {
    fn default() -> Self {
        Duration::zero()
    }
}

impl Add for Duration {
    type Output = Duration;
    fn add(self, rhs: Duration) -> Duration {
        Duration::from_seconds(self.seconds + rhs.seconds)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.seconds < 1.0 {
            write!(f, "{:.0}ms", self.seconds * 1000.0)
        } else {
            write!(f, "{:.2}s", self.seconds)
        }
    }
}
