use kinema_core::{Color, Point3, StepRange};
use serde::{Deserialize, Serialize};

use crate::typeset::{self, TypesetError};

/// Grid-line opacity applied to number planes.
pub const GRID_LINE_OPACITY: f64 = 0.4;

/// The geometry/content of a drawable primitive — a tagged union over
/// the object kinds the builder can construct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Text {
        content: String,
        font_size: f64,
    },
    MathText {
        markup: String,
        font_size: f64,
    },
    Circle {
        radius: f64,
        fill_opacity: f64,
    },
    Square {
        side: f64,
        fill_opacity: f64,
    },
    Rectangle {
        width: f64,
        height: f64,
        fill_opacity: f64,
    },
    Line {
        start: Point3,
        end: Point3,
    },
    /// Arrow geometry spans exactly start..end (zero end-buffer).
    Arrow {
        start: Point3,
        end: Point3,
    },
    Dot {
        radius: f64,
    },
    NumberPlane {
        x_range: StepRange,
        y_range: StepRange,
        grid_opacity: f64,
    },
    Axes {
        x_range: StepRange,
        y_range: StepRange,
    },
    /// Aggregate container; membership is a list of registry ids.
    Group {
        members: Vec<String>,
    },
    /// Sampled parametric curve polyline.
    Curve {
        points: Vec<Point3>,
    },
}

/// A drawable primitive: shape content plus shared styling and
/// placement state. Owned by the registry for exactly one render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub shape: Shape,
    pub color: Color,
    pub position: Point3,
}

impl Primitive {
    pub fn new(shape: Shape, color: Color) -> Self {
        Self {
            shape,
            color,
            position: Point3::ORIGIN,
        }
    }

    pub fn text(content: impl Into<String>, color: Color, font_size: f64) -> Self {
        Self::new(
            Shape::Text {
                content: content.into(),
                font_size,
            },
            color,
        )
    }

    /// Construct a math-typeset primitive. Fails when the markup would
    /// not typeset; the caller is expected to fall back to [`Self::text`].
    pub fn math_text(
        markup: impl Into<String>,
        color: Color,
        font_size: f64,
    ) -> Result<Self, TypesetError> {
        let markup = markup.into();
        typeset::check(&markup)?;
        Ok(Self::new(Shape::MathText { markup, font_size }, color))
    }

    pub fn circle(radius: f64, color: Color, fill_opacity: f64) -> Self {
        Self::new(
            Shape::Circle {
                radius,
                fill_opacity,
            },
            color,
        )
    }

    pub fn square(side: f64, color: Color, fill_opacity: f64) -> Self {
        Self::new(Shape::Square { side, fill_opacity }, color)
    }

    pub fn rectangle(width: f64, height: f64, color: Color, fill_opacity: f64) -> Self {
        Self::new(
            Shape::Rectangle {
                width,
                height,
                fill_opacity,
            },
            color,
        )
    }

    pub fn line(start: Point3, end: Point3, color: Color) -> Self {
        Self::new(Shape::Line { start, end }, color)
    }

    pub fn arrow(start: Point3, end: Point3, color: Color) -> Self {
        Self::new(Shape::Arrow { start, end }, color)
    }

    pub fn dot(position: Point3, radius: f64, color: Color) -> Self {
        let mut primitive = Self::new(Shape::Dot { radius }, color);
        primitive.position = position;
        primitive
    }

    pub fn number_plane(x_range: StepRange, y_range: StepRange) -> Self {
        Self::new(
            Shape::NumberPlane {
                x_range,
                y_range,
                grid_opacity: GRID_LINE_OPACITY,
            },
            Color::WHITE,
        )
    }

    pub fn axes(x_range: StepRange, y_range: StepRange, color: Color) -> Self {
        Self::new(Shape::Axes { x_range, y_range }, color)
    }

    pub fn group() -> Self {
        Self::new(
            Shape::Group {
                members: Vec::new(),
            },
            Color::WHITE,
        )
    }

    pub fn curve(points: Vec<Point3>, color: Color) -> Self {
        Self::new(Shape::Curve { points }, color)
    }

    /// Short shape name for diagnostics and cue listings.
    pub fn kind_name(&self) -> &'static str {
        match &self.shape {
            Shape::Text { .. } => "text",
            Shape::MathText { .. } => "mathtext",
            Shape::Circle { .. } => "circle",
            Shape::Square { .. } => "square",
            Shape::Rectangle { .. } => "rectangle",
            Shape::Line { .. } => "line",
            Shape::Arrow { .. } => "arrow",
            Shape::Dot { .. } => "dot",
            Shape::NumberPlane { .. } => "numberplane",
            Shape::Axes { .. } => "axes",
            Shape::Group { .. } => "group",
            Shape::Curve { .. } => "curve",
        }
    }

    // --- Mutable-primitive API (the engine collaborator contract) ---

    /// Move the primitive to an absolute position.
    pub fn move_to(&mut self, position: Point3) {
        self.position = position;
    }

    /// Recolor the primitive in place.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn is_group(&self) -> bool {
        matches!(self.shape, Shape::Group { .. })
    }

    /// Add a member id to an aggregate. Returns false when the
    /// primitive is not a group.
    pub fn add_member(&mut self, id: impl Into<String>) -> bool {
        match &mut self.shape {
            Shape::Group { members } => {
                members.push(id.into());
                true
            }
            _ => false,
        }
    }

    pub fn members(&self) -> Option<&[String]> {
        match &self.shape {
            Shape::Group { members } => Some(members),
            _ => None,
        }
    }

    /// Morph this primitive into another: shape, color, and placement
    /// are taken from the source; the registry id stays the same.
    pub fn morph_into(&mut self, source: &Primitive) {
        self.shape = source.shape.clone();
        self.color = source.color;
        self.position = source.position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_consumes_position_at_construction() {
        let dot = Primitive::dot(Point3::new(1.0, 2.0, 0.0), 0.08, Color::WHITE);
        assert_eq!(dot.position, Point3::new(1.0, 2.0, 0.0));
        assert_eq!(dot.shape, Shape::Dot { radius: 0.08 });
    }

    #[test]
    fn test_math_text_falls_back_on_bad_markup() {
        assert!(Primitive::math_text(r"\frac{1}{2}", Color::WHITE, 36.0).is_ok());
        assert!(Primitive::math_text(r"\frac{1}{2", Color::WHITE, 36.0).is_err());
    }

    #[test]
    fn test_move_and_recolor() {
        let mut circle = Primitive::circle(1.0, Color::BLUE, 0.0);
        circle.move_to(Point3::new(0.0, 1.0, 0.0));
        circle.set_color(Color::RED);
        assert_eq!(circle.position, Point3::new(0.0, 1.0, 0.0));
        assert_eq!(circle.color, Color::RED);
    }

    #[test]
    fn test_group_membership() {
        let mut group = Primitive::group();
        assert!(group.is_group());
        assert!(group.add_member("c1"));
        assert!(group.add_member("c2"));
        assert_eq!(group.members().unwrap(), ["c1", "c2"]);

        let mut circle = Primitive::circle(1.0, Color::BLUE, 0.0);
        assert!(!circle.add_member("c1"));
        assert!(circle.members().is_none());
    }

    #[test]
    fn test_morph_into_keeps_nothing_of_target() {
        let mut square = Primitive::square(1.0, Color::YELLOW, 0.0);
        let mut circle = Primitive::circle(2.0, Color::BLUE, 0.5);
        circle.move_to(Point3::new(3.0, 0.0, 0.0));
        square.morph_into(&circle);
        assert_eq!(square.shape, circle.shape);
        assert_eq!(square.color, Color::BLUE);
        assert_eq!(square.position, Point3::new(3.0, 0.0, 0.0));
    }
}
