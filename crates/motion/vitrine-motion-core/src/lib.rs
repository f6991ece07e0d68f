//! Vitrine Motion Core (host-agnostic)
//!
//! Timeline sequencing, easing and tweening for page choreography. The engine
//! renders into a [`Stage`] that journals every style, class and attribute
//! change; hosts replay those changes onto a live document.

pub mod config;
pub mod ease;
pub mod engine;
pub mod error;
pub mod ids;
pub mod outputs;
pub mod stage;
pub mod timeline;
pub mod value;

pub use config::MotionConfig;
pub use ease::{Dir, Ease};
pub use engine::MotionEngine;
pub use error::{MotionError, Result};
pub use ids::{TargetKey, TimelineId};
pub use outputs::{Change, MotionEvent, Outputs};
pub use stage::Stage;
pub use timeline::{
    Action, Cue, Defaults, Entry, IntoTargets, Position, Timeline, TweenKind, TweenSpec,
    DEFAULT_DURATION,
};
pub use value::{blend, lerp_f32, Prop, PropSet, Value};
