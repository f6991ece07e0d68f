//! Reduced-motion start path.

use log::info;
use serde::{Deserialize, Serialize};
use vitrine_motion_core::{MotionEngine, TargetKey};

use crate::controllers::Choreographer;
use crate::error::Result;
use crate::host::{Document, Platform};
use crate::scroll::ScrollTriggers;

/// Class put on the body so CSS transitions are disabled as well.
pub const NO_TRANSITION: &str = "no-transition";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionMode {
    #[default]
    Full,
    Reduced,
}

impl MotionMode {
    /// Ask the platform once. The answer holds for the life of the site.
    pub fn detect(platform: &dyn Platform) -> Self {
        if platform.prefers_reduced_motion() {
            MotionMode::Reduced
        } else {
            MotionMode::Full
        }
    }

    pub fn is_reduced(self) -> bool {
        self == MotionMode::Reduced
    }
}

/// Drop all scheduled motion, make every later timeline land instantly and
/// put the choreographed elements in their end state.
///
/// Reveals, gallery and nav apply their own no-animation branches when they
/// initialize with [`MotionMode::Reduced`].
pub fn apply_reduced_motion(
    engine: &mut MotionEngine,
    scroll: &mut ScrollTriggers,
    choreo: &mut Choreographer,
    doc: &dyn Document,
    body: &TargetKey,
) -> Result<()> {
    info!("reduced motion requested; applying final states");
    engine.kill_all();
    scroll.kill_all();
    engine.set_instant(true);
    engine.stage_mut().add_class(body, NO_TRANSITION);
    choreo.apply_final_states(engine, doc)
}
