//! Slide-in mobile navigation panel.

use log::debug;
use vitrine_motion_core::{
    Dir, Ease, MotionEngine, Position, Prop, PropSet, TargetKey, Timeline, TweenSpec,
};

use crate::bypass::MotionMode;
use crate::config::NavConfig;
use crate::cue::SiteCue;
use crate::error::{Result, SiteError};
use crate::host::Document;

pub const HIDDEN: &str = "hidden";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum NavState {
    #[default]
    Closed,
    Open,
}

#[derive(Debug)]
pub struct MobileNav {
    cfg: NavConfig,
    state: NavState,
    mode: MotionMode,
}

impl MobileNav {
    pub fn new(cfg: NavConfig) -> Self {
        Self {
            cfg,
            state: NavState::Closed,
            mode: MotionMode::Full,
        }
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn init(&mut self, engine: &mut MotionEngine, doc: &dyn Document, mode: MotionMode) -> Result<()> {
        if !doc.contains(&self.cfg.panel) {
            return Err(SiteError::MissingAnchor {
                component: "mobile nav",
                anchor: self.cfg.panel.to_string(),
            });
        }
        self.mode = mode;
        self.state = NavState::Closed;
        if mode.is_reduced() {
            engine.set(
                &self.cfg.panel,
                &PropSet::new()
                    .with(Prop::XPercent, 0.0)
                    .with(Prop::Opacity, 1.0)
                    .with(Prop::Display, "none"),
            );
            engine.set(
                &self.cfg.links,
                &PropSet::new().with(Prop::Opacity, 1.0).with(Prop::Y, 0.0),
            );
        } else {
            engine.set(
                &self.cfg.panel,
                &PropSet::new()
                    .with(Prop::XPercent, 100.0)
                    .with(Prop::Display, "none"),
            );
        }
        engine.stage_mut().add_class(&self.cfg.panel, HIDDEN);
        Ok(())
    }

    /// Route a click. Returns whether the target belongs to the nav.
    pub fn on_click(&mut self, target: &TargetKey, engine: &mut MotionEngine) -> bool {
        if target == &self.cfg.open_button {
            match (self.mode, self.state) {
                (MotionMode::Reduced, NavState::Open) => self.close(engine),
                _ => self.open(engine),
            }
        } else if target == &self.cfg.close_button || self.cfg.links.contains(target) {
            self.close(engine);
        } else {
            return false;
        }
        true
    }

    pub fn open(&mut self, engine: &mut MotionEngine) {
        if self.state == NavState::Open {
            return;
        }
        self.state = NavState::Open;
        debug!("mobile nav opening");
        engine.stage_mut().remove_class(&self.cfg.panel, HIDDEN);
        engine.set(&self.cfg.body, &PropSet::new().with(Prop::Overflow, "hidden"));

        if self.mode.is_reduced() {
            engine.set(&self.cfg.panel, &PropSet::new().with(Prop::Display, "flex"));
            return;
        }
        let mut tl = Timeline::new().on_complete(SiteCue::NavOpened.into());
        tl.add(
            TweenSpec::from_to(
                &self.cfg.panel,
                PropSet::new()
                    .with(Prop::XPercent, 100.0)
                    .with(Prop::Display, "none"),
                PropSet::new()
                    .with(Prop::XPercent, 0.0)
                    .with(Prop::Display, "flex"),
            )
            .duration(0.6)
            .ease(Ease::Power(3, Dir::InOut))
            .overwrite(),
            0.0,
        );
        tl.add(
            TweenSpec::from_to(
                &self.cfg.links,
                PropSet::new().with(Prop::Opacity, 0.0).with(Prop::Y, 20.0),
                PropSet::new().with(Prop::Opacity, 1.0).with(Prop::Y, 0.0),
            )
            .stagger(0.1)
            .duration(0.4)
            .ease(Ease::Power(2, Dir::Out))
            .overwrite(),
            Position::default(),
        );
        engine.play(tl);
    }

    pub fn close(&mut self, engine: &mut MotionEngine) {
        if self.state == NavState::Closed {
            return;
        }
        self.state = NavState::Closed;
        debug!("mobile nav closing");
        engine.clear_props(&self.cfg.body, &[Prop::Overflow]);

        if self.mode.is_reduced() {
            self.finish_close(engine);
            return;
        }
        let mut tl = Timeline::new().on_complete(SiteCue::NavClosed.into());
        tl.add(
            TweenSpec::to(
                &self.cfg.links,
                PropSet::new().with(Prop::Opacity, 0.0).with(Prop::Y, -20.0),
            )
            .stagger(0.05)
            .duration(0.3)
            .ease(Ease::Power(2, Dir::In))
            .overwrite(),
            0.0,
        );
        tl.add(
            TweenSpec::to(&self.cfg.panel, PropSet::new().with(Prop::XPercent, 100.0))
                .delay(0.2)
                .duration(0.6)
                .ease(Ease::Power(3, Dir::InOut))
                .overwrite(),
            0.0,
        );
        engine.play(tl);
    }

    fn finish_close(&self, engine: &mut MotionEngine) {
        engine.stage_mut().add_class(&self.cfg.panel, HIDDEN);
        engine.set(&self.cfg.panel, &PropSet::new().with(Prop::Display, "none"));
        if !self.mode.is_reduced() {
            engine.clear_props(&self.cfg.links, &[Prop::Opacity, Prop::Y]);
        }
    }

    pub fn on_opened(&self) {
        if self.state == NavState::Open {
            debug!("mobile nav open");
        }
    }

    /// Close-timeline completion. Dropped if the panel was reopened meanwhile.
    pub fn on_closed(&self, engine: &mut MotionEngine) {
        if self.state == NavState::Closed {
            self.finish_close(engine);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::StaticDocument;

    fn setup(mode: MotionMode) -> (MobileNav, MotionEngine, NavConfig) {
        let cfg = NavConfig::default();
        let doc = StaticDocument::new().with_ids([&cfg.panel]);
        let mut nav = MobileNav::new(cfg.clone());
        let mut engine = MotionEngine::default();
        nav.init(&mut engine, &doc, mode).unwrap();
        (nav, engine, cfg)
    }

    fn cues(engine: &mut MotionEngine, dt: f32) -> Vec<SiteCue> {
        engine.update(dt).cues().filter_map(SiteCue::parse).collect()
    }

    #[test]
    fn missing_panel_fails_init() {
        let mut nav = MobileNav::new(NavConfig::default());
        let mut engine = MotionEngine::default();
        let err = nav
            .init(&mut engine, &StaticDocument::new(), MotionMode::Full)
            .unwrap_err();
        assert!(matches!(err, SiteError::MissingAnchor { .. }));
    }

    #[test]
    fn open_then_close_round_trip() {
        let (mut nav, mut engine, cfg) = setup(MotionMode::Full);
        assert!(nav.on_click(&cfg.open_button, &mut engine));
        assert!(!engine.stage().has_class(&cfg.panel, HIDDEN));
        assert_eq!(engine.stage().style(&cfg.body, Prop::Overflow).as_text(), Some("hidden"));
        assert_eq!(engine.stage().style(&cfg.panel, Prop::Display).as_text(), Some("flex"));
        assert_eq!(cues(&mut engine, 2.0), vec![SiteCue::NavOpened]);
        assert_eq!(engine.stage().float(&cfg.panel, Prop::XPercent), 0.0);
        assert_eq!(engine.stage().float(&cfg.links[3], Prop::Opacity), 1.0);

        assert!(nav.on_click(&cfg.links[1], &mut engine));
        assert_eq!(nav.state(), NavState::Closed);
        assert!(engine.stage().inline(&cfg.body, Prop::Overflow).is_none());
        assert_eq!(cues(&mut engine, 2.0), vec![SiteCue::NavClosed]);
        nav.on_closed(&mut engine);
        assert!(engine.stage().has_class(&cfg.panel, HIDDEN));
        assert_eq!(engine.stage().style(&cfg.panel, Prop::Display).as_text(), Some("none"));
        assert!(engine.stage().inline(&cfg.links[0], Prop::Opacity).is_none());
    }

    #[test]
    fn reopening_mid_close_ignores_the_stale_completion() {
        let (mut nav, mut engine, cfg) = setup(MotionMode::Full);
        nav.open(&mut engine);
        engine.update(2.0);
        nav.close(&mut engine);
        engine.update(0.3);
        nav.open(&mut engine);
        for cue in cues(&mut engine, 2.0) {
            if cue == SiteCue::NavClosed {
                nav.on_closed(&mut engine);
            }
        }
        assert_eq!(nav.state(), NavState::Open);
        assert!(!engine.stage().has_class(&cfg.panel, HIDDEN));
        assert_eq!(engine.stage().float(&cfg.panel, Prop::XPercent), 0.0);
    }

    #[test]
    fn reduced_mode_toggles_immediately() {
        let (mut nav, mut engine, cfg) = setup(MotionMode::Reduced);
        nav.on_click(&cfg.open_button, &mut engine);
        assert_eq!(engine.active_count(), 0);
        assert_eq!(engine.stage().style(&cfg.panel, Prop::Display).as_text(), Some("flex"));
        assert_eq!(engine.stage().float(&cfg.panel, Prop::XPercent), 0.0);

        nav.on_click(&cfg.open_button, &mut engine);
        assert_eq!(nav.state(), NavState::Closed);
        assert!(engine.stage().has_class(&cfg.panel, HIDDEN));
        assert_eq!(engine.stage().float(&cfg.links[0], Prop::Opacity), 1.0);
    }

    #[test]
    fn unrelated_clicks_are_not_claimed() {
        let (mut nav, mut engine, _) = setup(MotionMode::Full);
        assert!(!nav.on_click(&TargetKey::from("elsewhere"), &mut engine));
    }
}
