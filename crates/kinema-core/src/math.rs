use serde::{Deserialize, Serialize};

/// A 3-coordinate point, serialized as a `[x, y, z]` array in scene
/// documents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    // --- Named constants ---

    pub const ORIGIN: Point3 = Point3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const UP: Point3 = Point3 {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };
    pub const DOWN: Point3 = Point3 {
        x: 0.0,
        y: -1.0,
        z: 0.0,
    };
    pub const LEFT: Point3 = Point3 {
        x: -1.0,
        y: 0.0,
        z: 0.0,
    };
    pub const RIGHT: Point3 = Point3 {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    };
}

impl Default for Point3 {
    fn default() -> Self {
        Point3::ORIGIN
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(v: [f64; 3]) -> Self {
        Point3::new(v[0], v[1], v[2])
    }
}

impl From<Point3> for [f64; 3] {
    fn from(p: Point3) -> Self {
        [p.x, p.y, p.z]
    }
}

/// An axis range triple `[min, max, step]` as used by plane and axes
/// objects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct StepRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl StepRange {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }
}

impl From<[f64; 3]> for StepRange {
    fn from(v: [f64; 3]) -> Self {
        StepRange::new(v[0], v[1], v[2])
    }
}

impl From<StepRange> for [f64; 3] {
    fn from(r: StepRange) -> Self {
        [r.min, r.max, r.step]
    }
}
