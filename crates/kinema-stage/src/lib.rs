//! # kinema-stage
//!
//! The engine collaborator contract: the drawable [`Primitive`] model
//! with its mutation API, animation [`Cue`]s and [`Effect`]s, and the
//! [`Timeline`] trait the sequencer plays against. A
//! [`RecordedTimeline`] implementation captures the ordered cue script
//! of a render pass for inspection and testing.

pub mod primitive;
pub mod timeline;
pub mod typeset;

pub use primitive::{Primitive, Shape};
pub use timeline::{Cue, Effect, RecordedTimeline, Timeline, TimelineEvent};
pub use typeset::TypesetError;
