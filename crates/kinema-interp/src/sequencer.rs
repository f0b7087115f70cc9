//! Animation sequencer — walks the timeline in order, resolving targets
//! against the registry and playing cues against the engine.

use kinema_core::{Color, Diagnostic, Diagnostics, Duration, KinemaResult, Point3, Stage};
use kinema_spec::expr;
use kinema_spec::{Action, AnimationSpec, DirectionSpec, TimelineEntry};
use kinema_stage::{Cue, Effect, Timeline};

use crate::builder::resolve_color;
use crate::registry::Registry;

/// Settle hold appended after the last timeline entry.
pub const SETTLE_SECONDS: f64 = 2.0;

/// Process the timeline strictly in order. A malformed entry never
/// aborts the pass: unresolved targets and unknown actions are skipped
/// with a warning, and any playback error is recorded and stepped over.
pub fn run_timeline<T: Timeline>(
    entries: &[TimelineEntry],
    registry: &mut Registry,
    timeline: &mut T,
    diags: &mut Diagnostics,
) {
    for entry in entries {
        let result = match entry {
            TimelineEntry::Single(anim) => play_single(anim, registry, timeline, diags),
            TimelineEntry::Batch(batch) => play_batch(batch, registry, timeline, diags),
        };
        if let Err(err) = result {
            diags.error(Stage::Animate, format!("animation failed: {}", err));
        }
    }

    if let Err(err) = timeline.wait(Duration::from_seconds(SETTLE_SECONDS)) {
        diags.error(Stage::Animate, format!("settle wait failed: {}", err));
    }
}

fn play_single<T: Timeline>(
    anim: &AnimationSpec,
    registry: &mut Registry,
    timeline: &mut T,
    diags: &mut Diagnostics,
) -> KinemaResult<()> {
    if !registry.contains(&anim.target) {
        diags.push(
            Diagnostic::warning(Stage::Animate, format!("target '{}' not found", anim.target))
                .with_entry(&anim.target),
        );
        return Ok(());
    }

    match &anim.action {
        Action::Wait => timeline.wait(Duration::from_seconds(anim.duration.unwrap_or(1.0))),
        Action::Group => {
            apply_grouping(anim, registry, diags);
            Ok(())
        }
        Action::Unknown(raw) => {
            diags.push(
                Diagnostic::warning(
                    Stage::Animate,
                    format!("unknown animation action '{}'", raw),
                )
                .with_entry(&anim.target),
            );
            Ok(())
        }
        _ => {
            let Some(cue) = build_cue(anim, registry, diags) else {
                return Ok(());
            };
            apply_cue_mutation(&cue, registry);
            timeline.play(vec![cue], Duration::from_seconds(anim.run_time))
        }
    }
}

/// Play a simultaneous batch: every surviving cue shares one playback
/// call whose duration comes from the first sub-record's `run_time`;
/// the other sub-records' run times are ignored by design.
fn play_batch<T: Timeline>(
    batch: &[AnimationSpec],
    registry: &mut Registry,
    timeline: &mut T,
    diags: &mut Diagnostics,
) -> KinemaResult<()> {
    let run_time = batch.first().map(|sub| sub.run_time).unwrap_or(1.0);
    let mut cues = Vec::new();

    for sub in batch {
        if !registry.contains(&sub.target) {
            diags.push(
                Diagnostic::warning(
                    Stage::Animate,
                    format!("target '{}' not found (dropped from batch)", sub.target),
                )
                .with_entry(&sub.target),
            );
            continue;
        }
        match &sub.action {
            Action::Wait | Action::Group => {
                diags.push(
                    Diagnostic::warning(
                        Stage::Animate,
                        format!(
                            "'{}' cannot join a simultaneous batch (dropped)",
                            sub.action
                        ),
                    )
                    .with_entry(&sub.target),
                );
                continue;
            }
            Action::Unknown(raw) => {
                diags.push(
                    Diagnostic::warning(
                        Stage::Animate,
                        format!("unknown animation action '{}'", raw),
                    )
                    .with_entry(&sub.target),
                );
                continue;
            }
            _ => {}
        }
        if let Some(cue) = build_cue(sub, registry, diags) {
            apply_cue_mutation(&cue, registry);
            cues.push(cue);
        }
    }

    if cues.is_empty() {
        return Ok(());
    }
    timeline.play(cues, Duration::from_seconds(run_time))
}

/// Map one animation record to its unplayed cue. Returns None for the
/// non-cue actions and for a `transform` whose morph target does not
/// resolve (a silent no-op).
fn build_cue(
    anim: &AnimationSpec,
    registry: &Registry,
    diags: &mut Diagnostics,
) -> Option<Cue> {
    let effect = match &anim.action {
        Action::Write => Effect::Write,
        Action::Create => Effect::Create,
        Action::FadeIn => Effect::FadeIn,
        Action::FadeOut => Effect::FadeOut,
        Action::Rotate => Effect::Rotate {
            angle: anim.angle.as_ref().map(expr::angle_value).unwrap_or(0.0),
            about_point: anim.about_point.unwrap_or(Point3::ORIGIN),
        },
        Action::MoveTo => Effect::MoveTo {
            position: anim.position.unwrap_or(Point3::ORIGIN),
        },
        Action::Shift => Effect::Shift {
            delta: resolve_direction(anim.direction.as_ref(), &anim.target, diags),
        },
        Action::Scale => Effect::Scale {
            factor: anim.factor.unwrap_or(1.0),
        },
        Action::ChangeColor => Effect::Recolor {
            color: resolve_color(anim.color.as_deref(), Color::YELLOW),
        },
        Action::Transform => {
            let Some(into) = anim.target_object.as_deref() else {
                tracing::debug!("transform on '{}' has no target_object", anim.target);
                return None;
            };
            if !registry.contains(into) {
                tracing::debug!("transform target object '{}' not found", into);
                return None;
            }
            Effect::Morph { into: into.to_string() }
        }
        Action::Indicate => Effect::Indicate {
            scale_factor: anim.scale_factor.unwrap_or(1.2),
        },
        Action::Circumscribe => Effect::Circumscribe {
            color: resolve_color(anim.color.as_deref(), Color::YELLOW),
        },
        Action::Wait | Action::Group | Action::Unknown(_) => return None,
    };
    Some(Cue::new(anim.target.clone(), effect))
}

fn resolve_direction(
    direction: Option<&DirectionSpec>,
    target: &str,
    diags: &mut Diagnostics,
) -> Point3 {
    match direction {
        None => Point3::ORIGIN,
        Some(DirectionSpec::Vector(delta)) => *delta,
        Some(DirectionSpec::Named(name)) => match name.trim().to_ascii_uppercase().as_str() {
            "UP" => Point3::UP,
            "DOWN" => Point3::DOWN,
            "LEFT" => Point3::LEFT,
            "RIGHT" => Point3::RIGHT,
            _ => {
                diags.push(
                    Diagnostic::warning(
                        Stage::Animate,
                        format!("unknown direction '{}'", name),
                    )
                    .with_entry(target),
                );
                Point3::ORIGIN
            }
        },
    }
}

/// Registry mutations carried by cue effects: recolor and morph apply in
/// place so later entries observe the updated primitive.
fn apply_cue_mutation(cue: &Cue, registry: &mut Registry) {
    match &cue.effect {
        Effect::Recolor { color } => {
            if let Some(primitive) = registry.get_mut(&cue.target) {
                primitive.set_color(*color);
            }
        }
        Effect::Morph { into } => {
            let Some(source) = registry.get(into).cloned() else {
                return;
            };
            if let Some(target) = registry.get_mut(&cue.target) {
                target.morph_into(&source);
            }
        }
        _ => {}
    }
}

/// The `group` action: add each resolved member id to the target
/// aggregate. Unresolved members are skipped; a non-group target warns.
fn apply_grouping(anim: &AnimationSpec, registry: &mut Registry, diags: &mut Diagnostics) {
    let resolved: Vec<String> = anim
        .members
        .iter()
        .filter(|member| {
            let found = registry.contains(member);
            if !found {
                tracing::debug!("group member '{}' not found", member);
            }
            found
        })
        .cloned()
        .collect();

    let Some(target) = registry.get_mut(&anim.target) else {
        return;
    };
    for member in resolved {
        if !target.add_member(member) {
            diags.push(
                Diagnostic::warning(
                    Stage::Animate,
                    format!("target '{}' is not a group", anim.target),
                )
                .with_entry(&anim.target),
            );
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinema_core::Color;
    use kinema_stage::{Primitive, RecordedTimeline, TimelineEvent};

    fn anim(json: &str) -> AnimationSpec {
        serde_json::from_str(json).unwrap()
    }

    fn entry(json: &str) -> TimelineEntry {
        serde_json::from_str(json).unwrap()
    }

    fn registry_with(ids: &[&str]) -> Registry {
        let mut registry = Registry::new();
        for id in ids {
            registry.register(*id, Primitive::circle(1.0, Color::BLUE, 0.0));
        }
        registry
    }

    #[test]
    fn test_single_entry_plays_for_run_time() {
        let mut registry = registry_with(&["c1"]);
        let mut timeline = RecordedTimeline::new();
        let mut diags = Diagnostics::new();
        let entries = vec![entry(
            r#"{"target": "c1", "action": "create", "run_time": 2.5}"#,
        )];
        run_timeline(&entries, &mut registry, &mut timeline, &mut diags);

        match &timeline.events()[0] {
            TimelineEvent::Play { cues, run_time } => {
                assert_eq!(cues.len(), 1);
                assert_eq!(cues[0].effect, Effect::Create);
                assert!((run_time.as_seconds() - 2.5).abs() < 1e-9);
            }
            _ => panic!("expected play event"),
        }
    }

    #[test]
    fn test_unresolved_target_skips_and_continues() {
        let mut registry = registry_with(&["c1"]);
        let mut timeline = RecordedTimeline::new();
        let mut diags = Diagnostics::new();
        let entries = vec![
            entry(r#"{"target": "missing", "action": "write"}"#),
            entry(r#"{"target": "c1", "action": "fadein"}"#),
        ];
        run_timeline(&entries, &mut registry, &mut timeline, &mut diags);

        assert_eq!(diags.warning_count(), 1);
        // One play for c1 plus the settle wait.
        assert_eq!(timeline.events().len(), 2);
        assert!(matches!(
            &timeline.events()[0],
            TimelineEvent::Play { cues, .. } if cues[0].target == "c1"
        ));
    }

    #[test]
    fn test_unknown_action_warns_and_skips() {
        let mut registry = registry_with(&["c1"]);
        let mut timeline = RecordedTimeline::new();
        let mut diags = Diagnostics::new();
        let entries = vec![entry(r#"{"target": "c1", "action": "explode"}"#)];
        run_timeline(&entries, &mut registry, &mut timeline, &mut diags);

        assert_eq!(diags.warning_count(), 1);
        assert!(diags.iter().next().unwrap().message.contains("explode"));
        // Settle wait only.
        assert_eq!(timeline.events().len(), 1);
    }

    #[test]
    fn test_rotate_expression_angle() {
        let mut registry = registry_with(&["c1"]);
        let mut timeline = RecordedTimeline::new();
        let mut diags = Diagnostics::new();
        let entries = vec![entry(
            r#"{"target": "c1", "action": "rotate", "angle": "PI"}"#,
        )];
        run_timeline(&entries, &mut registry, &mut timeline, &mut diags);

        match &timeline.events()[0] {
            TimelineEvent::Play { cues, .. } => match cues[0].effect {
                Effect::Rotate { angle, about_point } => {
                    assert!((angle - std::f64::consts::PI).abs() < 1e-9);
                    assert_eq!(about_point, Point3::ORIGIN);
                }
                _ => panic!("expected rotate"),
            },
            _ => panic!("expected play event"),
        }
    }

    #[test]
    fn test_rotate_invalid_expression_defaults_to_zero() {
        let mut registry = registry_with(&["c1"]);
        let mut timeline = RecordedTimeline::new();
        let mut diags = Diagnostics::new();
        let entries = vec![entry(
            r#"{"target": "c1", "action": "rotate", "angle": "banana"}"#,
        )];
        run_timeline(&entries, &mut registry, &mut timeline, &mut diags);

        match &timeline.events()[0] {
            TimelineEvent::Play { cues, .. } => match cues[0].effect {
                Effect::Rotate { angle, .. } => assert_eq!(angle, 0.0),
                _ => panic!("expected rotate"),
            },
            _ => panic!("expected play event"),
        }
    }

    #[test]
    fn test_batch_shares_first_run_time() {
        let mut registry = registry_with(&["a", "b"]);
        let mut timeline = RecordedTimeline::new();
        let mut diags = Diagnostics::new();
        let entries = vec![entry(
            r#"[{"target": "a", "action": "move_to", "position": [1, 0, 0], "run_time": 2},
                {"target": "b", "action": "scale", "factor": 2, "run_time": 9}]"#,
        )];
        run_timeline(&entries, &mut registry, &mut timeline, &mut diags);

        match &timeline.events()[0] {
            TimelineEvent::Play { cues, run_time } => {
                assert_eq!(cues.len(), 2);
                assert!((run_time.as_seconds() - 2.0).abs() < 1e-9);
                assert_eq!(
                    cues[0].effect,
                    Effect::MoveTo {
                        position: Point3::RIGHT
                    }
                );
                assert_eq!(cues[1].effect, Effect::Scale { factor: 2.0 });
            }
            _ => panic!("expected play event"),
        }
    }

    #[test]
    fn test_batch_drops_unresolved_without_aborting() {
        let mut registry = registry_with(&["a"]);
        let mut timeline = RecordedTimeline::new();
        let mut diags = Diagnostics::new();
        let entries = vec![entry(
            r#"[{"target": "a", "action": "fadein"}, {"target": "ghost", "action": "fadein"}]"#,
        )];
        run_timeline(&entries, &mut registry, &mut timeline, &mut diags);

        assert_eq!(diags.warning_count(), 1);
        match &timeline.events()[0] {
            TimelineEvent::Play { cues, .. } => assert_eq!(cues.len(), 1),
            _ => panic!("expected play event"),
        }
    }

    #[test]
    fn test_empty_surviving_batch_plays_nothing() {
        let mut registry = registry_with(&[]);
        let mut timeline = RecordedTimeline::new();
        let mut diags = Diagnostics::new();
        let entries = vec![entry(r#"[{"target": "ghost", "action": "fadein"}]"#)];
        run_timeline(&entries, &mut registry, &mut timeline, &mut diags);

        // Settle wait only.
        assert_eq!(timeline.events().len(), 1);
        assert!(matches!(timeline.events()[0], TimelineEvent::Wait { .. }));
    }

    #[test]
    fn test_wait_advances_timeline_without_cues() {
        let mut registry = registry_with(&["c1"]);
        let mut timeline = RecordedTimeline::new();
        let mut diags = Diagnostics::new();
        let entries = vec![entry(
            r#"{"target": "c1", "action": "wait", "duration": 3}"#,
        )];
        run_timeline(&entries, &mut registry, &mut timeline, &mut diags);

        assert!(matches!(
            &timeline.events()[0],
            TimelineEvent::Wait { duration } if (duration.as_seconds() - 3.0).abs() < 1e-9
        ));
    }

    #[test]
    fn test_settle_hold_ends_every_pass() {
        let mut registry = registry_with(&[]);
        let mut timeline = RecordedTimeline::new();
        let mut diags = Diagnostics::new();
        run_timeline(&[], &mut registry, &mut timeline, &mut diags);

        assert_eq!(timeline.events().len(), 1);
        assert!(matches!(
            &timeline.events()[0],
            TimelineEvent::Wait { duration } if (duration.as_seconds() - SETTLE_SECONDS).abs() < 1e-9
        ));
    }

    #[test]
    fn test_changecolor_mutates_registry() {
        let mut registry = registry_with(&["c1"]);
        let mut timeline = RecordedTimeline::new();
        let mut diags = Diagnostics::new();
        let entries = vec![entry(
            r#"{"target": "c1", "action": "changecolor", "color": "RED"}"#,
        )];
        run_timeline(&entries, &mut registry, &mut timeline, &mut diags);

        assert_eq!(registry.get("c1").unwrap().color, Color::RED);
    }

    #[test]
    fn test_transform_morphs_target_in_place() {
        let mut registry = registry_with(&["a"]);
        registry.register("b", Primitive::square(2.0, Color::YELLOW, 0.0));
        let mut timeline = RecordedTimeline::new();
        let mut diags = Diagnostics::new();
        let entries = vec![entry(
            r#"{"target": "a", "action": "transform", "target_object": "b"}"#,
        )];
        run_timeline(&entries, &mut registry, &mut timeline, &mut diags);

        assert_eq!(registry.get("a").unwrap().kind_name(), "square");
        match &timeline.events()[0] {
            TimelineEvent::Play { cues, .. } => {
                assert_eq!(cues[0].effect, Effect::Morph { into: "b".into() });
            }
            _ => panic!("expected play event"),
        }
    }

    #[test]
    fn test_transform_with_unresolved_object_is_noop() {
        let mut registry = registry_with(&["a"]);
        let mut timeline = RecordedTimeline::new();
        let mut diags = Diagnostics::new();
        let entries = vec![entry(
            r#"{"target": "a", "action": "transform", "target_object": "ghost"}"#,
        )];
        run_timeline(&entries, &mut registry, &mut timeline, &mut diags);

        assert_eq!(registry.get("a").unwrap().kind_name(), "circle");
        // Settle wait only: the no-op produced no play event.
        assert_eq!(timeline.events().len(), 1);
        assert_eq!(diags.len(), 0);
    }

    #[test]
    fn test_group_action_populates_membership() {
        let mut registry = registry_with(&["c1", "c2"]);
        registry.register("g", Primitive::group());
        let mut timeline = RecordedTimeline::new();
        let mut diags = Diagnostics::new();
        let entries = vec![entry(
            r#"{"target": "g", "action": "group", "members": ["c1", "ghost", "c2"]}"#,
        )];
        run_timeline(&entries, &mut registry, &mut timeline, &mut diags);

        assert_eq!(registry.get("g").unwrap().members().unwrap(), ["c1", "c2"]);
        // No cue is produced for the structural mutation.
        assert_eq!(timeline.events().len(), 1);
    }

    #[test]
    fn test_group_action_on_non_group_warns() {
        let mut registry = registry_with(&["c1", "c2"]);
        let mut timeline = RecordedTimeline::new();
        let mut diags = Diagnostics::new();
        let entries = vec![entry(
            r#"{"target": "c1", "action": "group", "members": ["c2"]}"#,
        )];
        run_timeline(&entries, &mut registry, &mut timeline, &mut diags);

        assert_eq!(diags.warning_count(), 1);
        assert!(diags.iter().next().unwrap().message.contains("not a group"));
    }

    #[test]
    fn test_named_shift_direction() {
        let mut registry = registry_with(&["c1"]);
        let mut timeline = RecordedTimeline::new();
        let mut diags = Diagnostics::new();
        let entries = vec![entry(
            r#"{"target": "c1", "action": "shift", "direction": "UP"}"#,
        )];
        run_timeline(&entries, &mut registry, &mut timeline, &mut diags);

        match &timeline.events()[0] {
            TimelineEvent::Play { cues, .. } => {
                assert_eq!(cues[0].effect, Effect::Shift { delta: Point3::UP });
            }
            _ => panic!("expected play event"),
        }
    }

    #[test]
    fn test_unknown_direction_warns_and_shifts_nowhere() {
        let mut registry = registry_with(&["c1"]);
        let mut timeline = RecordedTimeline::new();
        let mut diags = Diagnostics::new();
        let entries = vec![entry(
            r#"{"target": "c1", "action": "shift", "direction": "SIDEWAYS"}"#,
        )];
        run_timeline(&entries, &mut registry, &mut timeline, &mut diags);

        assert_eq!(diags.warning_count(), 1);
        match &timeline.events()[0] {
            TimelineEvent::Play { cues, .. } => {
                assert_eq!(
                    cues[0].effect,
                    Effect::Shift {
                        delta: Point3::ORIGIN
                    }
                );
            }
            _ => panic!("expected play event"),
        }
    }

    #[test]
    fn test_batch_drops_wait_and_group_records() {
        let mut registry = registry_with(&["a", "b"]);
        let mut timeline = RecordedTimeline::new();
        let mut diags = Diagnostics::new();
        let entries = vec![entry(
            r#"[{"target": "a", "action": "fadein"},
                {"target": "b", "action": "wait"},
                {"target": "b", "action": "scale"}]"#,
        )];
        run_timeline(&entries, &mut registry, &mut timeline, &mut diags);

        assert_eq!(diags.warning_count(), 1);
        match &timeline.events()[0] {
            TimelineEvent::Play { cues, .. } => assert_eq!(cues.len(), 2),
            _ => panic!("expected play event"),
        }
    }
}
