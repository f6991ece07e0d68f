//! vitrine-site
//!
//! Page behaviour for the Vitrine marketing site: the preloader and entrance
//! choreography, scroll reveals, hover effects, the category gallery, the
//! testimonial carousel, the theme switch and the mobile nav. Everything is
//! driven through a [`Site`], which owns a [`vitrine_motion_core::MotionEngine`]
//! and talks to the embedding page through the traits in [`host`].

pub mod bypass;
pub mod config;
pub mod controllers;
pub mod cue;
pub mod error;
pub mod host;
pub mod scroll;
pub mod site;
pub mod timers;

pub use crate::bypass::MotionMode;
pub use crate::config::SiteConfig;
pub use crate::controllers::{CarouselState, ChoreoStage, Followup, NavState, Theme};
pub use crate::cue::SiteCue;
pub use crate::error::{Result, SiteError};
pub use crate::host::{
    Bounds, Document, Host, MemoryPreferenceStore, Platform, PreferenceStore, StaticDocument,
    StaticElement, StaticPlatform,
};
pub use crate::site::{Component, Site, SiteFrame, StartupFailure, StartupReport, UiEvent};

pub use vitrine_motion_core as motion;
