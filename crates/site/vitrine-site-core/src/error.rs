use thiserror::Error;
use vitrine_motion_core::MotionError;

/// Errors surfaced by site controllers. Each startup step fails on its own;
/// see [`crate::Site::start`].
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("{component}: required element `{anchor}` is missing")]
    MissingAnchor {
        component: &'static str,
        anchor: String,
    },
    #[error("unknown gallery category `{0}`")]
    UnknownCategory(String),
    #[error("slide index {index} out of range for {len} slides")]
    SlideOutOfRange { index: usize, len: usize },
    #[error("carousel has no slides")]
    EmptyCarousel,
    #[error("invalid scroll trigger edge `{0}`")]
    InvalidTrigger(String),
    #[error("invalid site config: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Motion(#[from] MotionError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SiteError>;
