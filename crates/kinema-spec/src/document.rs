use kinema_core::{Point3, StepRange};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Top-level scene document: drawable objects plus an animation timeline.
/// Both sequences default to empty when absent; their order is
/// semantically significant (construction order, playback order).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneSpec {
    #[serde(default)]
    pub objects: Vec<ObjectSpec>,
    #[serde(default)]
    pub animations: Vec<TimelineEntry>,
}

/// One timeline entry: a single animation record, or a sub-list played as
/// a simultaneous batch under one shared duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimelineEntry {
    Single(AnimationSpec),
    Batch(Vec<AnimationSpec>),
}

/// The closed enumeration of drawable object kinds. Parsed
/// case-insensitively from the document's `type` field; anything outside
/// the enumeration lands in `Unknown` carrying the raw string for
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectKind {
    Text,
    MathText,
    Circle,
    Square,
    Rectangle,
    Line,
    Arrow,
    Dot,
    NumberPlane,
    Axes,
    Group,
    Curve,
    Unknown(String),
}

impl ObjectKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => ObjectKind::Text,
            "mathtext" => ObjectKind::MathText,
            "circle" => ObjectKind::Circle,
            "square" => ObjectKind::Square,
            "rectangle" => ObjectKind::Rectangle,
            "line" => ObjectKind::Line,
            "arrow" => ObjectKind::Arrow,
            "dot" => ObjectKind::Dot,
            "numberplane" => ObjectKind::NumberPlane,
            "axes" => ObjectKind::Axes,
            "group" => ObjectKind::Group,
            "curve" => ObjectKind::Curve,
            _ => ObjectKind::Unknown(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ObjectKind::Text => "text",
            ObjectKind::MathText => "mathtext",
            ObjectKind::Circle => "circle",
            ObjectKind::Square => "square",
            ObjectKind::Rectangle => "rectangle",
            ObjectKind::Line => "line",
            ObjectKind::Arrow => "arrow",
            ObjectKind::Dot => "dot",
            ObjectKind::NumberPlane => "numberplane",
            ObjectKind::Axes => "axes",
            ObjectKind::Group => "group",
            ObjectKind::Curve => "curve",
            ObjectKind::Unknown(raw) => raw,
        }
    }
}

impl Default for ObjectKind {
    fn default() -> Self {
        ObjectKind::Unknown(String::new())
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ObjectKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ObjectKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ObjectKind::parse(&raw))
    }
}

/// One declared drawable object. Fields beyond `id`/`type`/`options` are
/// kind-dependent; absent fields take the builder's documented defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectSpec {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: ObjectKind,
    /// Text / math markup content.
    #[serde(default)]
    pub content: Option<String>,
    /// Circle radius.
    #[serde(default)]
    pub radius: Option<f64>,
    /// Square side length.
    #[serde(default)]
    pub side: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    /// Line/arrow start point.
    #[serde(default)]
    pub start: Option<Point3>,
    /// Line/arrow end point.
    #[serde(default)]
    pub end: Option<Point3>,
    /// Constructor position for dots; post-construction placement for
    /// every other kind.
    #[serde(default)]
    pub position: Option<Point3>,
    /// Parametric curve coordinate expressions in `t`.
    #[serde(default)]
    pub x: Option<String>,
    #[serde(default)]
    pub y: Option<String>,
    #[serde(default)]
    pub z: Option<String>,
    #[serde(default)]
    pub t_range: Option<StepRange>,
    #[serde(default)]
    pub options: ObjectOptions,
}

/// Free-form rendering hints attached to an object. Unknown keys are
/// ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectOptions {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub fill_opacity: Option<f64>,
    /// Dot radius.
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub x_range: Option<StepRange>,
    #[serde(default)]
    pub y_range: Option<StepRange>,
}

/// The closed enumeration of animation actions, parsed case-insensitively
/// with an `Unknown` variant for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Write,
    Create,
    FadeIn,
    FadeOut,
    Rotate,
    MoveTo,
    Shift,
    Scale,
    ChangeColor,
    Transform,
    Indicate,
    Circumscribe,
    Wait,
    Group,
    Unknown(String),
}

impl Action {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "write" => Action::Write,
            "create" => Action::Create,
            "fadein" => Action::FadeIn,
            "fadeout" => Action::FadeOut,
            "rotate" => Action::Rotate,
            "move_to" => Action::MoveTo,
            "shift" => Action::Shift,
            "scale" => Action::Scale,
            "changecolor" => Action::ChangeColor,
            "transform" => Action::Transform,
            "indicate" => Action::Indicate,
            "circumscribe" => Action::Circumscribe,
            "wait" => Action::Wait,
            "group" => Action::Group,
            _ => Action::Unknown(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Action::Write => "write",
            Action::Create => "create",
            Action::FadeIn => "fadein",
            Action::FadeOut => "fadeout",
            Action::Rotate => "rotate",
            Action::MoveTo => "move_to",
            Action::Shift => "shift",
            Action::Scale => "scale",
            Action::ChangeColor => "changecolor",
            Action::Transform => "transform",
            Action::Indicate => "indicate",
            Action::Circumscribe => "circumscribe",
            Action::Wait => "wait",
            Action::Group => "group",
            Action::Unknown(raw) => raw,
        }
    }
}

impl Default for Action {
    fn default() -> Self {
        Action::Unknown(String::new())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Action::parse(&raw))
    }
}

/// A rotation angle: a literal number of radians, or an arithmetic
/// expression string evaluated by [`crate::expr`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AngleSpec {
    Literal(f64),
    Expression(String),
}

/// A shift direction: an explicit 3-coordinate vector, or a named
/// direction (UP, DOWN, LEFT, RIGHT).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectionSpec {
    Vector(Point3),
    Named(String),
}

fn default_run_time() -> f64 {
    1.0
}

/// One animation record. `target` must resolve against the object
/// registry; action-specific fields beyond `target`/`action`/`run_time`
/// are optional with documented defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationSpec {
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub action: Action,
    #[serde(default = "default_run_time")]
    pub run_time: f64,
    #[serde(default)]
    pub angle: Option<AngleSpec>,
    #[serde(default)]
    pub about_point: Option<Point3>,
    #[serde(default)]
    pub position: Option<Point3>,
    #[serde(default)]
    pub direction: Option<DirectionSpec>,
    #[serde(default)]
    pub factor: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
    /// Morph target for the `transform` action.
    #[serde(default)]
    pub target_object: Option<String>,
    /// Pulse strength for the `indicate` action.
    #[serde(default)]
    pub scale_factor: Option<f64>,
    /// Member ids for the `group` action.
    #[serde(default)]
    pub members: Vec<String>,
    /// Timeline advance for the `wait` action.
    #[serde(default)]
    pub duration: Option<f64>,
}
