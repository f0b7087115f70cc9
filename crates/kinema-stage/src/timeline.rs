use kinema_core::{Color, Duration, KinemaResult, Point3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The animation effect requested for one target — the closed mapping
/// from timeline actions to engine animation primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Reveal via stroke/text-writing animation.
    Write,
    /// Reveal via incremental-draw animation.
    Create,
    FadeIn,
    FadeOut,
    Rotate { angle: f64, about_point: Point3 },
    MoveTo { position: Point3 },
    Shift { delta: Point3 },
    Scale { factor: f64 },
    Recolor { color: Color },
    /// Morph into the primitive registered under the given id.
    Morph { into: String },
    Indicate { scale_factor: f64 },
    Circumscribe { color: Color },
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Write => "write",
            Effect::Create => "create",
            Effect::FadeIn => "fadein",
            Effect::FadeOut => "fadeout",
            Effect::Rotate { .. } => "rotate",
            Effect::MoveTo { .. } => "move_to",
            Effect::Shift { .. } => "shift",
            Effect::Scale { .. } => "scale",
            Effect::Recolor { .. } => "changecolor",
            Effect::Morph { .. } => "transform",
            Effect::Indicate { .. } => "indicate",
            Effect::Circumscribe { .. } => "circumscribe",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One unplayed animation handle: a target id plus the effect to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    pub target: String,
    pub effect: Effect,
}

impl Cue {
    pub fn new(target: impl Into<String>, effect: Effect) -> Self {
        Self {
            target: target.into(),
            effect,
        }
    }
}

/// The scene/timeline API consumed from the engine: play a batch of cues
/// for one shared duration, or advance the virtual timeline without
/// animating anything. Playback is synchronous from the interpreter's
/// point of view.
pub trait Timeline {
    fn play(&mut self, cues: Vec<Cue>, run_time: Duration) -> KinemaResult<()>;
    fn wait(&mut self, duration: Duration) -> KinemaResult<()>;
}

/// One recorded playback event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimelineEvent {
    Play { cues: Vec<Cue>, run_time: Duration },
    Wait { duration: Duration },
}

/// A [`Timeline`] that records the ordered cue script instead of
/// rendering. The default collaborator for tests and for emitting the
/// script to downstream tooling.
#[derive(Debug, Default)]
pub struct RecordedTimeline {
    events: Vec<TimelineEvent>,
}

impl RecordedTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<TimelineEvent> {
        self.events
    }

    /// Total virtual duration of the recorded script.
    pub fn total_duration(&self) -> Duration {
        self.events
            .iter()
            .map(|event| match event {
                TimelineEvent::Play { run_time, .. } => *run_time,
                TimelineEvent::Wait { duration } => *duration,
            })
            .fold(Duration::zero(), |acc, d| acc + d)
    }
}

impl Timeline for RecordedTimeline {
    fn play(&mut self, cues: Vec<Cue>, run_time: Duration) -> KinemaResult<()> {
        self.events.push(TimelineEvent::Play { cues, run_time });
        Ok(())
    }

    fn wait(&mut self, duration: Duration) -> KinemaResult<()> {
        self.events.push(TimelineEvent::Wait { duration });
        Ok(())
    }
}
