//! # kinema-spec
//!
//! The Kinema scene-spec document model: the serde representation of a
//! declarative scene (objects + animation timeline), the double-decoding
//! JSON loader, and the whitelisted arithmetic expression language used
//! for rotation angles and parametric curve coordinates.

pub mod document;
pub mod expr;
pub mod loader;

pub use document::{
    Action, AngleSpec, AnimationSpec, DirectionSpec, ObjectKind, ObjectOptions, ObjectSpec,
    SceneSpec, TimelineEntry,
};
pub use expr::CompiledExpr;
pub use loader::{load_from_path, parse_scene};
