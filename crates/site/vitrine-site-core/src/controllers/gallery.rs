//! Category tabs: one active grid at a time, cross-faded on selection.

use log::debug;
use vitrine_motion_core::{Dir, Ease, MotionEngine, Prop, PropSet, TargetKey, TweenSpec};

use crate::config::{GalleryConfig, TabConfig};
use crate::controllers::Followup;
use crate::cue::SiteCue;
use crate::error::{Result, SiteError};

pub const ACTIVE_GRID: &str = "active-category";
pub const ACTIVE_TAB: &str = "active-tab";
pub const HIDDEN: &str = "hidden";

#[derive(Debug, Default)]
pub struct CategoryTabs {
    cfg: GalleryConfig,
    active: Option<String>,
}

impl CategoryTabs {
    pub fn new(cfg: GalleryConfig) -> Self {
        Self { cfg, active: None }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn tabs(&self) -> &[TabConfig] {
        &self.cfg.tabs
    }

    /// Category whose tab is `target`, for click routing.
    pub fn category_for_tab(&self, target: &TargetKey) -> Option<&str> {
        self.cfg
            .tabs
            .iter()
            .find(|t| &t.tab == target)
            .map(|t| t.category.as_str())
    }

    fn tab(&self, category: &str) -> Result<&TabConfig> {
        self.cfg
            .tabs
            .iter()
            .find(|t| t.category == category)
            .ok_or_else(|| SiteError::UnknownCategory(category.to_string()))
    }

    /// Show the configured category (or the first tab) without animating.
    /// A gallery with no tabs has nothing to do.
    pub fn init(&mut self, engine: &mut MotionEngine) -> Result<Option<Followup>> {
        let initial = match (&self.cfg.initial, self.cfg.tabs.first()) {
            (Some(c), _) => c.clone(),
            (None, Some(first)) => first.category.clone(),
            (None, None) => return Ok(None),
        };
        self.select(&initial, false, engine)
    }

    /// Make `category` the active grid. The new grid is marked active at once;
    /// the old one fades out and is hidden when its fade completes.
    pub fn select(
        &mut self,
        category: &str,
        animate: bool,
        engine: &mut MotionEngine,
    ) -> Result<Option<Followup>> {
        let target = self.tab(category)?.clone();
        debug!("gallery -> {category} (animate: {animate})");

        for tab in self.cfg.tabs.iter().filter(|t| t.grid != target.grid) {
            let stage = engine.stage();
            let was_active = stage.has_class(&tab.grid, ACTIVE_GRID);
            let was_hidden = stage.has_class(&tab.grid, HIDDEN);
            engine.stage_mut().remove_class(&tab.grid, ACTIVE_GRID);
            if was_active && animate {
                engine.tween(
                    TweenSpec::to(&tab.grid, PropSet::new().with(Prop::Opacity, 0.0))
                        .duration(0.3)
                        .overwrite()
                        .on_complete(SiteCue::GalleryHidden(tab.category.clone()).into()),
                );
            } else if was_active || !was_hidden {
                engine.set(
                    &tab.grid,
                    &PropSet::new().with(Prop::Opacity, 0.0).with(Prop::Display, "none"),
                );
                engine.stage_mut().add_class(&tab.grid, HIDDEN);
            }
        }

        let stage = engine.stage_mut();
        stage.remove_class(&target.grid, HIDDEN);
        stage.add_class(&target.grid, ACTIVE_GRID);
        for tab in &self.cfg.tabs {
            stage.remove_class(&tab.tab, ACTIVE_TAB);
        }
        stage.add_class(&target.tab, ACTIVE_TAB);
        self.active = Some(target.category.clone());

        if animate {
            engine.tween(
                TweenSpec::from_to(
                    &target.grid,
                    PropSet::new().with(Prop::Opacity, 0.0).with(Prop::Display, "block"),
                    PropSet::new().with(Prop::Opacity, 1.0),
                )
                .duration(0.5)
                .ease(Ease::Power(3, Dir::Out))
                .overwrite()
                .on_complete(SiteCue::GalleryShown(target.category).into()),
            );
            Ok(None)
        } else {
            engine.set(
                &target.grid,
                &PropSet::new().with(Prop::Opacity, 1.0).with(Prop::Display, "block"),
            );
            Ok(Some(Followup::RefreshLayout))
        }
    }

    /// Fade-out completion for a grid that is no longer active.
    pub fn on_hidden(&self, category: &str, engine: &mut MotionEngine) {
        if self.active.as_deref() == Some(category) {
            debug!("ignoring stale fade-out of {category}");
            return;
        }
        let Ok(tab) = self.tab(category) else {
            return;
        };
        engine.stage_mut().add_class(&tab.grid, HIDDEN);
        engine.clear_props(&tab.grid, &[Prop::Display, Prop::Opacity]);
    }

    /// Fade-in completion: layout changed, so triggers and hovers need refreshing.
    pub fn on_shown(&self, category: &str) -> Option<Followup> {
        (self.active.as_deref() == Some(category)).then_some(Followup::RefreshLayout)
    }
}
