//! # kinema-interp
//!
//! The scene-spec interpreter proper: builds the typed object registry
//! from a scene document and sequences its animation timeline against an
//! engine [`Timeline`](kinema_stage::Timeline).

pub mod builder;
pub mod registry;
pub mod sequencer;

pub use builder::build_objects;
pub use registry::Registry;
pub use sequencer::{run_timeline, SETTLE_SECONDS};

use kinema_core::Diagnostics;
use kinema_spec::SceneSpec;
use kinema_stage::Timeline;

/// Run one full render pass: build the registry from the document's
/// objects, then sequence its timeline. Returns the final registry and
/// the diagnostics accumulated across both stages.
pub fn render_pass<T: Timeline>(spec: &SceneSpec, timeline: &mut T) -> (Registry, Diagnostics) {
    let mut diags = Diagnostics::new();
    let mut registry = build_objects(&spec.objects, &mut diags);
    run_timeline(&spec.animations, &mut registry, timeline, &mut diags);
    (registry, diags)
}
