//! Object builder — scene-spec objects to registered drawable
//! primitives.

use kinema_core::{Color, Diagnostic, Diagnostics, Point3, Stage, StepRange};
use kinema_spec::expr::CompiledExpr;
use kinema_spec::{ObjectKind, ObjectSpec};
use kinema_stage::Primitive;

use crate::registry::Registry;

pub const DEFAULT_FONT_SIZE: f64 = 36.0;
pub const DEFAULT_FILL_OPACITY: f64 = 0.0;
pub const DEFAULT_DOT_RADIUS: f64 = 0.08;

const DEFAULT_X_RANGE: StepRange = StepRange {
    min: -7.0,
    max: 7.0,
    step: 1.0,
};
const DEFAULT_Y_RANGE: StepRange = StepRange {
    min: -4.0,
    max: 4.0,
    step: 1.0,
};

/// Resolve an optional document color string against the named palette,
/// falling back to the kind's default when absent.
pub(crate) fn resolve_color(raw: Option<&str>, default: Color) -> Color {
    match raw {
        Some(raw) => Color::resolve(raw),
        None => default,
    }
}

/// Build the object registry from the document's objects, in order.
/// Unrecognized kinds are skipped with a warning; a duplicate id
/// silently overwrites the earlier entry.
pub fn build_objects(objects: &[ObjectSpec], diags: &mut Diagnostics) -> Registry {
    let mut registry = Registry::new();

    for spec in objects {
        let Some(mut primitive) = build_primitive(spec, diags) else {
            continue;
        };

        // Line, arrow, and dot consume their geometry at construction;
        // everything else takes a declared position as post-build
        // placement.
        let consumes_position = matches!(
            spec.kind,
            ObjectKind::Line | ObjectKind::Arrow | ObjectKind::Dot
        );
        if !consumes_position {
            if let Some(position) = spec.position {
                primitive.move_to(position);
            }
        }

        if registry.register(&spec.id, primitive).is_some() {
            tracing::debug!("duplicate object id '{}' overwrites earlier entry", spec.id);
        }
    }

    registry
}

fn build_primitive(spec: &ObjectSpec, diags: &mut Diagnostics) -> Option<Primitive> {
    let opts = &spec.options;
    let content = spec.content.clone().unwrap_or_default();
    let font_size = opts.font_size.unwrap_or(DEFAULT_FONT_SIZE);
    let fill_opacity = opts.fill_opacity.unwrap_or(DEFAULT_FILL_OPACITY);
    let color = |default: Color| resolve_color(opts.color.as_deref(), default);

    let primitive = match &spec.kind {
        ObjectKind::Text => Primitive::text(content, color(Color::WHITE), font_size),
        ObjectKind::MathText => {
            match Primitive::math_text(content.clone(), color(Color::WHITE), font_size) {
                Ok(primitive) => primitive,
                Err(err) => {
                    diags.push(
                        Diagnostic::warning(
                            Stage::Build,
                            format!("math typesetting failed, falling back to plain text: {}", err),
                        )
                        .with_entry(&spec.id),
                    );
                    Primitive::text(content, color(Color::WHITE), font_size)
                }
            }
        }
        ObjectKind::Circle => Primitive::circle(
            spec.radius.unwrap_or(1.0),
            color(Color::BLUE),
            fill_opacity,
        ),
        ObjectKind::Square => {
            Primitive::square(spec.side.unwrap_or(1.0), color(Color::YELLOW), fill_opacity)
        }
        ObjectKind::Rectangle => Primitive::rectangle(
            spec.width.unwrap_or(2.0),
            spec.height.unwrap_or(1.0),
            color(Color::YELLOW),
            fill_opacity,
        ),
        ObjectKind::Line => Primitive::line(
            spec.start.unwrap_or(Point3::ORIGIN),
            spec.end.unwrap_or(Point3::RIGHT),
            color(Color::WHITE),
        ),
        ObjectKind::Arrow => Primitive::arrow(
            spec.start.unwrap_or(Point3::ORIGIN),
            spec.end.unwrap_or(Point3::RIGHT),
            color(Color::WHITE),
        ),
        ObjectKind::Dot => Primitive::dot(
            spec.position.unwrap_or(Point3::ORIGIN),
            opts.radius.unwrap_or(DEFAULT_DOT_RADIUS),
            color(Color::WHITE),
        ),
        ObjectKind::NumberPlane => Primitive::number_plane(
            opts.x_range.unwrap_or(DEFAULT_X_RANGE),
            opts.y_range.unwrap_or(DEFAULT_Y_RANGE),
        ),
        ObjectKind::Axes => Primitive::axes(
            opts.x_range.unwrap_or(DEFAULT_X_RANGE),
            opts.y_range.unwrap_or(DEFAULT_Y_RANGE),
            color(Color::WHITE),
        ),
        ObjectKind::Group => Primitive::group(),
        ObjectKind::Curve => return build_curve(spec, diags),
        ObjectKind::Unknown(raw) => {
            diags.push(
                Diagnostic::warning(Stage::Build, format!("unknown object type '{}'", raw))
                    .with_entry(&spec.id),
            );
            return None;
        }
    };

    Some(primitive)
}

/// Compile and sample a parametric curve. Any coordinate expression that
/// fails to parse or evaluate fails the whole object.
fn build_curve(spec: &ObjectSpec, diags: &mut Diagnostics) -> Option<Primitive> {
    let range = spec.t_range.unwrap_or(StepRange {
        min: 0.0,
        max: 1.0,
        step: 0.01,
    });
    if !(range.step > 0.0) {
        diags.push(
            Diagnostic::warning(
                Stage::Build,
                format!("curve t_range step must be positive, got {}", range.step),
            )
            .with_entry(&spec.id),
        );
        return None;
    }

    let mut coords = Vec::with_capacity(3);
    for (axis, source) in [("x", &spec.x), ("y", &spec.y), ("z", &spec.z)] {
        let source = source.as_deref().unwrap_or("0");
        match CompiledExpr::parse(source) {
            Ok(expr) => coords.push(expr),
            Err(err) => {
                diags.push(
                    Diagnostic::warning(
                        Stage::Build,
                        format!("invalid curve {} expression '{}': {}", axis, source, err),
                    )
                    .with_entry(&spec.id),
                );
                return None;
            }
        }
    }

    let mut points = Vec::new();
    let mut t = range.min;
    while t <= range.max + range.step * 0.5 {
        let mut sample = [0.0f64; 3];
        for (value, expr) in sample.iter_mut().zip(&coords) {
            match expr.eval_with("t", t) {
                Ok(v) => *value = v,
                Err(err) => {
                    diags.push(
                        Diagnostic::warning(
                            Stage::Build,
                            format!("curve evaluation failed at t={}: {}", t, err),
                        )
                        .with_entry(&spec.id),
                    );
                    return None;
                }
            }
        }
        points.push(Point3::new(sample[0], sample[1], sample[2]));
        t += range.step;
    }

    Some(Primitive::curve(
        points,
        resolve_color(spec.options.color.as_deref(), Color::WHITE),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinema_stage::Shape;

    fn object(json: &str) -> ObjectSpec {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_recognized_kinds_are_registered() {
        let objects = vec![
            object(r#"{"id": "t1", "type": "text", "content": "hello"}"#),
            object(r#"{"id": "c1", "type": "circle", "radius": 2.0}"#),
            object(r#"{"id": "g1", "type": "group"}"#),
        ];
        let mut diags = Diagnostics::new();
        let registry = build_objects(&objects, &mut diags);
        assert_eq!(registry.len(), 3);
        assert!(registry.contains("t1"));
        assert!(registry.contains("c1"));
        assert!(registry.contains("g1"));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_unknown_kind_warns_once_and_skips() {
        let objects = vec![
            object(r#"{"id": "b1", "type": "blob"}"#),
            object(r#"{"id": "c1", "type": "circle"}"#),
        ];
        let mut diags = Diagnostics::new();
        let registry = build_objects(&objects, &mut diags);
        assert!(!registry.contains("b1"));
        assert!(registry.contains("c1"));
        assert_eq!(diags.warning_count(), 1);
        let warning = diags.iter().next().unwrap();
        assert!(warning.message.contains("blob"));
        assert_eq!(warning.entry.as_deref(), Some("b1"));
    }

    #[test]
    fn test_duplicate_id_keeps_later_object() {
        let objects = vec![
            object(r#"{"id": "x", "type": "circle"}"#),
            object(r#"{"id": "x", "type": "square"}"#),
        ];
        let mut diags = Diagnostics::new();
        let registry = build_objects(&objects, &mut diags);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("x").unwrap().kind_name(), "square");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_defaults() {
        let objects = vec![
            object(r#"{"id": "c", "type": "circle"}"#),
            object(r#"{"id": "r", "type": "rectangle"}"#),
            object(r#"{"id": "d", "type": "dot"}"#),
            object(r#"{"id": "p", "type": "numberplane"}"#),
        ];
        let mut diags = Diagnostics::new();
        let registry = build_objects(&objects, &mut diags);

        match registry.get("c").unwrap().shape {
            Shape::Circle {
                radius,
                fill_opacity,
            } => {
                assert_eq!(radius, 1.0);
                assert_eq!(fill_opacity, 0.0);
            }
            _ => panic!("expected circle"),
        }
        assert_eq!(registry.get("c").unwrap().color, Color::BLUE);

        match registry.get("r").unwrap().shape {
            Shape::Rectangle { width, height, .. } => {
                assert_eq!(width, 2.0);
                assert_eq!(height, 1.0);
            }
            _ => panic!("expected rectangle"),
        }

        match registry.get("d").unwrap().shape {
            Shape::Dot { radius } => assert_eq!(radius, DEFAULT_DOT_RADIUS),
            _ => panic!("expected dot"),
        }

        match registry.get("p").unwrap().shape {
            Shape::NumberPlane { x_range, y_range, .. } => {
                assert_eq!(x_range, StepRange::new(-7.0, 7.0, 1.0));
                assert_eq!(y_range, StepRange::new(-4.0, 4.0, 1.0));
            }
            _ => panic!("expected numberplane"),
        }
    }

    #[test]
    fn test_unknown_color_falls_back_to_white() {
        let objects = vec![object(
            r#"{"id": "c", "type": "circle", "options": {"color": "banana"}}"#,
        )];
        let mut diags = Diagnostics::new();
        let registry = build_objects(&objects, &mut diags);
        assert_eq!(registry.get("c").unwrap().color, Color::WHITE);
    }

    #[test]
    fn test_position_is_post_build_placement() {
        let objects = vec![object(
            r#"{"id": "c", "type": "circle", "position": [1, 2, 0]}"#,
        )];
        let mut diags = Diagnostics::new();
        let registry = build_objects(&objects, &mut diags);
        assert_eq!(
            registry.get("c").unwrap().position,
            Point3::new(1.0, 2.0, 0.0)
        );
    }

    #[test]
    fn test_line_geometry_from_start_end() {
        let objects = vec![object(
            r#"{"id": "l", "type": "line", "start": [0, 0, 0], "end": [2, 2, 0]}"#,
        )];
        let mut diags = Diagnostics::new();
        let registry = build_objects(&objects, &mut diags);
        match registry.get("l").unwrap().shape {
            Shape::Line { start, end } => {
                assert_eq!(start, Point3::ORIGIN);
                assert_eq!(end, Point3::new(2.0, 2.0, 0.0));
            }
            _ => panic!("expected line"),
        }
    }

    #[test]
    fn test_mathtext_falls_back_to_text_with_warning() {
        let objects = vec![object(
            r#"{"id": "m", "type": "mathtext", "content": "\\frac{1}{2"}"#,
        )];
        let mut diags = Diagnostics::new();
        let registry = build_objects(&objects, &mut diags);
        assert!(matches!(
            registry.get("m").unwrap().shape,
            Shape::Text { .. }
        ));
        assert_eq!(diags.warning_count(), 1);
    }

    #[test]
    fn test_valid_mathtext_stays_mathtext() {
        let objects = vec![object(
            r#"{"id": "m", "type": "mathtext", "content": "x^2"}"#,
        )];
        let mut diags = Diagnostics::new();
        let registry = build_objects(&objects, &mut diags);
        assert!(matches!(
            registry.get("m").unwrap().shape,
            Shape::MathText { .. }
        ));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_curve_samples_expressions() {
        let objects = vec![object(
            r#"{"id": "k", "type": "curve", "x": "cos(t)", "y": "sin(t)", "t_range": [0, 6.283185, 0.1]}"#,
        )];
        let mut diags = Diagnostics::new();
        let registry = build_objects(&objects, &mut diags);
        match &registry.get("k").unwrap().shape {
            Shape::Curve { points } => {
                assert!(points.len() > 60);
                assert!((points[0].x - 1.0).abs() < 1e-9);
                assert!((points[0].y).abs() < 1e-9);
            }
            _ => panic!("expected curve"),
        }
        assert!(diags.is_empty());
    }

    #[test]
    fn test_curve_with_bad_expression_is_skipped() {
        let objects = vec![object(
            r#"{"id": "k", "type": "curve", "x": "cos(t", "y": "sin(t)"}"#,
        )];
        let mut diags = Diagnostics::new();
        let registry = build_objects(&objects, &mut diags);
        assert!(!registry.contains("k"));
        assert_eq!(diags.warning_count(), 1);
    }
}
