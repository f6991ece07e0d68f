//! Light/dark theme switch persisted in the preference store.

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use vitrine_motion_core::MotionEngine;

use crate::config::ThemeConfig;
use crate::host::PreferenceStore;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Icon shown on the toggle while this theme is active.
    pub fn icon(self) -> &'static str {
        match self {
            Theme::Light => "sun",
            Theme::Dark => "moon",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug)]
pub struct ThemeToggle {
    cfg: ThemeConfig,
    current: Theme,
}

impl ThemeToggle {
    pub fn new(cfg: ThemeConfig) -> Self {
        let current = cfg.default_theme;
        Self { cfg, current }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    fn apply(&self, engine: &mut MotionEngine) {
        let stage = engine.stage_mut();
        stage.set_attr(&self.cfg.body, "data-theme", self.current.as_str());
        stage.set_attr(&self.cfg.toggle, "data-icon", self.current.icon());
    }

    /// Apply the stored theme, or the configured default when nothing usable
    /// is stored.
    pub fn init(&mut self, engine: &mut MotionEngine, store: &dyn PreferenceStore) {
        self.current = match store.get(&self.cfg.storage_key) {
            Some(saved) => saved.parse().unwrap_or_else(|bad| {
                warn!("ignoring stored theme `{bad}`");
                self.cfg.default_theme
            }),
            None => self.cfg.default_theme,
        };
        self.apply(engine);
    }

    pub fn toggle(&mut self, engine: &mut MotionEngine, store: &mut dyn PreferenceStore) -> Theme {
        self.current = self.current.toggled();
        store.set(&self.cfg.storage_key, self.current.as_str());
        self.apply(engine);
        debug!("theme -> {}", self.current);
        self.current
    }
}
