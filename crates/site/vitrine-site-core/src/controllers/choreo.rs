//! Preloader and entrance choreography.
//!
//! Two stages that never overlap: the preloader timeline plays first and its
//! completion cue is the only way into the entrance timeline.

use log::debug;
use vitrine_motion_core::{
    Defaults, Dir, Ease, MotionEngine, Position, Prop, PropSet, TargetKey, Timeline, TweenSpec,
};

use crate::config::{EntranceConfig, PreloaderConfig};
use crate::cue::SiteCue;
use crate::error::{Result, SiteError};
use crate::host::Document;

const COMPONENT: &str = "choreography";

/// Split text into the words that get one span each.
pub fn split_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(String::from).collect()
}

fn fade(target: &TargetKey, opacity: f32, duration: f32, curve: Ease) -> TweenSpec {
    TweenSpec::to(target, PropSet::new().with(Prop::Opacity, opacity))
        .duration(duration)
        .ease(curve)
}

/// Brand reveal, word cycle, brand exit and overlay fade. Completes with
/// [`SiteCue::PreloaderDone`]. An empty word list still reveals and dismisses.
pub fn build_preloader(cfg: &PreloaderConfig) -> Timeline {
    let mut tl = Timeline::new().on_complete(SiteCue::PreloaderDone.into());
    tl.add(
        TweenSpec::from(
            &cfg.brand,
            PropSet::new().with(Prop::Opacity, 0.0).with(Prop::Y, 20.0),
        )
        .duration(0.8)
        .ease(Ease::Power(3, Dir::Out)),
        Position::default(),
    );

    for (i, word) in cfg.words.iter().enumerate() {
        // The first word waits for the brand; later ones overlap the previous exit.
        let at = if i == 0 {
            Position::End(0.5)
        } else {
            Position::PrevStart(0.1)
        };
        tl.add(fade(&cfg.dynamic_text, 0.0, 0.3, Ease::Power(2, Dir::In)), at);
        tl.set(
            &cfg.dynamic_text,
            PropSet::new().with(Prop::Text, word.as_str()),
            Position::PrevEnd(0.0),
        );
        tl.add(fade(&cfg.dynamic_text, 1.0, 0.5, Ease::Power(2, Dir::Out)), Position::default());
        tl.add(
            fade(&cfg.dynamic_text, 0.0, 0.5, Ease::Power(2, Dir::In)).delay(0.8),
            Position::default(),
        );
    }

    tl.add(
        TweenSpec::to(
            &cfg.brand,
            PropSet::new().with(Prop::Opacity, 0.0).with(Prop::Y, -20.0),
        )
        .duration(0.5)
        .ease(Ease::Power(2, Dir::In)),
        Position::End(-0.5),
    );
    tl.add(fade(&cfg.overlay, 0.0, 1.5, Ease::Power(3, Dir::InOut)), Position::End(-0.8));
    tl
}

/// Header, background, title words, subtitle spans and call to action.
pub fn build_entrance(cfg: &EntranceConfig, subtitle_spans: &[TargetKey]) -> Timeline {
    let mut tl = Timeline::with_defaults(Defaults {
        ease: Some(Ease::Power(3, Dir::Out)),
        duration: None,
    })
    .on_complete(SiteCue::EntranceDone.into());

    tl.add(
        TweenSpec::from_to(
            &cfg.header,
            PropSet::new().with(Prop::YPercent, -100.0).with(Prop::Opacity, 0.0),
            PropSet::new().with(Prop::YPercent, 0.0).with(Prop::Opacity, 1.0),
        )
        .duration(1.2),
        0.0,
    );
    tl.add(
        TweenSpec::to(&cfg.main, PropSet::new().with(Prop::Opacity, 1.0)).duration(1.2),
        0.0,
    );

    tl.set(
        &cfg.hero_background,
        PropSet::new()
            .with(Prop::Scale, 1.2)
            .with(Prop::Blur, 10.0)
            .with(Prop::Opacity, 0.5),
        0.0,
    );
    tl.add(
        TweenSpec::to(
            &cfg.hero_background,
            PropSet::new()
                .with(Prop::Scale, 1.0)
                .with(Prop::Blur, 0.0)
                .with(Prop::Opacity, 1.0),
        )
        .duration(2.5)
        .ease(Ease::Power(4, Dir::Out)),
        0.0,
    );

    for (i, word) in cfg.title_words.iter().enumerate() {
        tl.add(
            TweenSpec::from(
                word,
                PropSet::new()
                    .with(Prop::Opacity, 0.0)
                    .with(Prop::Y, 100.0)
                    .with(Prop::RotationX, -90.0)
                    .with(Prop::TransformOrigin, "center bottom"),
            )
            .duration(1.8)
            .ease(Ease::Power(4, Dir::Out)),
            1.0 + 0.4 * i as f32,
        );
    }

    tl.add(
        TweenSpec::from(
            subtitle_spans,
            PropSet::new().with(Prop::Opacity, 0.0).with(Prop::Y, 30.0),
        )
        .stagger(0.08)
        .duration(0.8),
        2.2,
    );
    tl.add(
        TweenSpec::from(
            &cfg.cta,
            PropSet::new()
                .with(Prop::Opacity, 0.0)
                .with(Prop::Y, 50.0)
                .with(Prop::Scale, 0.8),
        )
        .duration(1.2)
        .ease(Ease::BackOut(1.7)),
        2.8,
    );
    tl
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChoreoStage {
    Idle,
    Preloading,
    Revealing,
    Done,
}

#[derive(Debug)]
pub struct Choreographer {
    preloader: PreloaderConfig,
    entrance: EntranceConfig,
    stage: ChoreoStage,
}

impl Choreographer {
    pub fn new(preloader: PreloaderConfig, entrance: EntranceConfig) -> Self {
        Self {
            preloader,
            entrance,
            stage: ChoreoStage::Idle,
        }
    }

    pub fn stage(&self) -> ChoreoStage {
        self.stage
    }

    fn require(doc: &dyn Document, anchor: &TargetKey) -> Result<()> {
        if doc.contains(anchor) {
            Ok(())
        } else {
            Err(SiteError::MissingAnchor {
                component: COMPONENT,
                anchor: anchor.to_string(),
            })
        }
    }

    /// Every element either stage touches must exist before anything moves.
    fn check_anchors(&self, doc: &dyn Document) -> Result<()> {
        let p = &self.preloader;
        let e = &self.entrance;
        for anchor in [
            &p.overlay,
            &p.brand,
            &p.dynamic_text,
            &e.header,
            &e.main,
            &e.hero_background,
            &e.subtitle,
            &e.cta,
        ]
        .into_iter()
        .chain(&e.title_words)
        {
            Self::require(doc, anchor)?;
        }
        Ok(())
    }

    fn split_subtitle(&self, engine: &mut MotionEngine, doc: &dyn Document) -> Vec<TargetKey> {
        let text = doc.text_content(&self.entrance.subtitle).unwrap_or_default();
        let spans = engine
            .stage_mut()
            .split_words(&self.entrance.subtitle, split_words(&text));
        engine.set(&spans, &PropSet::new().with(Prop::Display, "inline-block"));
        spans
    }

    /// Hide the page behind the overlay and start the preloader.
    pub fn start(&mut self, engine: &mut MotionEngine, doc: &dyn Document) -> Result<()> {
        self.check_anchors(doc)?;
        let hidden = PropSet::new().with(Prop::Opacity, 0.0);
        engine.set(vec![self.entrance.header.clone(), self.entrance.main.clone()], &hidden);
        engine.set(&self.preloader.dynamic_text, &hidden);
        engine.play(build_preloader(&self.preloader));
        self.stage = ChoreoStage::Preloading;
        debug!("preloader started with {} words", self.preloader.words.len());
        Ok(())
    }

    /// Transition function between the two stages. Ignored unless the
    /// preloader is the stage currently running.
    pub fn on_preloader_done(&mut self, engine: &mut MotionEngine, doc: &dyn Document) {
        if self.stage != ChoreoStage::Preloading {
            return;
        }
        engine.set(
            &self.preloader.overlay,
            &PropSet::new()
                .with(Prop::Display, "none")
                .with(Prop::PointerEvents, "none"),
        );
        let spans = self.split_subtitle(engine, doc);
        engine.play(build_entrance(&self.entrance, &spans));
        self.stage = ChoreoStage::Revealing;
        debug!("entrance started");
    }

    pub fn on_entrance_done(&mut self) {
        if self.stage == ChoreoStage::Revealing {
            self.stage = ChoreoStage::Done;
            debug!("choreography done");
        }
    }

    /// Put every choreographed element in its end state without animating.
    pub fn apply_final_states(&mut self, engine: &mut MotionEngine, doc: &dyn Document) -> Result<()> {
        self.check_anchors(doc)?;
        let e = &self.entrance;
        engine.set(&self.preloader.overlay, &PropSet::new().with(Prop::Display, "none"));
        engine.set(
            &e.header,
            &PropSet::new().with(Prop::Opacity, 1.0).with(Prop::YPercent, 0.0),
        );
        engine.set(&e.main, &PropSet::new().with(Prop::Opacity, 1.0));
        engine.set(
            &e.hero_background,
            &PropSet::new()
                .with(Prop::Scale, 1.0)
                .with(Prop::Blur, 0.0)
                .with(Prop::Opacity, 1.0),
        );
        engine.set(
            &e.title_words,
            &PropSet::new()
                .with(Prop::Opacity, 1.0)
                .with(Prop::Y, 0.0)
                .with(Prop::RotationX, 0.0),
        );
        let spans = self.split_subtitle(engine, doc);
        engine.set(&spans, &PropSet::new().with(Prop::Opacity, 1.0).with(Prop::Y, 0.0));
        engine.set(
            &self.entrance.cta,
            &PropSet::new()
                .with(Prop::Opacity, 1.0)
                .with(Prop::Scale, 1.0)
                .with(Prop::Y, 0.0),
        );
        self.stage = ChoreoStage::Done;
        Ok(())
    }
}

/// End-state values of the entrance, keyed by target, for checks in tests and
/// hosts that render a static page.
pub fn entrance_end_state(cfg: &EntranceConfig, spans: &[TargetKey]) -> Vec<(TargetKey, PropSet)> {
    let shown = PropSet::new().with(Prop::Opacity, 1.0).with(Prop::Y, 0.0);
    let mut out = vec![
        (
            cfg.header.clone(),
            PropSet::new().with(Prop::Opacity, 1.0).with(Prop::YPercent, 0.0),
        ),
        (cfg.main.clone(), PropSet::new().with(Prop::Opacity, 1.0)),
        (
            cfg.hero_background.clone(),
            PropSet::new()
                .with(Prop::Scale, 1.0)
                .with(Prop::Blur, 0.0)
                .with(Prop::Opacity, 1.0),
        ),
        (cfg.cta.clone(), shown.clone().with(Prop::Scale, 1.0)),
    ];
    out.extend(cfg.title_words.iter().map(|w| (w.clone(), shown.clone())));
    out.extend(spans.iter().map(|s| (s.clone(), shown.clone())));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_motion_core::{Action, Cue, MotionEvent};

    fn words(n: usize) -> PreloaderConfig {
        PreloaderConfig {
            words: (0..n).map(|i| format!("w{i}")).collect(),
            ..PreloaderConfig::default()
        }
    }

    #[test]
    fn split_words_drops_empty_runs() {
        assert_eq!(split_words("  Crafted  for generations "), vec!["Crafted", "for", "generations"]);
        assert!(split_words("").is_empty());
    }

    #[test]
    fn preloader_sets_each_word_in_order() {
        let tl = build_preloader(&words(3));
        let texts: Vec<String> = tl
            .entries()
            .iter()
            .filter_map(|e| match &e.action {
                Action::Set { props, .. } => props.get(Prop::Text).and_then(|v| v.as_text()).map(String::from),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["w0", "w1", "w2"]);
    }

    #[test]
    fn preloader_builds_are_deterministic() {
        assert_eq!(build_preloader(&words(5)), build_preloader(&words(5)));
    }

    #[test]
    fn empty_word_list_still_reveals_and_dismisses() {
        let tl = build_preloader(&words(0));
        assert_eq!(tl.entries().len(), 3);
        let total = tl.duration();
        assert!((total - 1.5).abs() < 1e-5);

        let mut engine = MotionEngine::default();
        engine.play(tl);
        let out = engine.update(total + 0.1);
        let done: Vec<&Cue> = out.cues().collect();
        assert_eq!(done, vec![&Cue::from(SiteCue::PreloaderDone)]);
        assert!(out
            .events
            .iter()
            .any(|e| matches!(e, MotionEvent::TimelineCompleted { .. })));
    }

    #[test]
    fn entrance_places_title_words_and_staggers_spans() {
        let cfg = EntranceConfig::default();
        let spans: Vec<TargetKey> = (0..3).map(|i| cfg.subtitle.span(i)).collect();
        let tl = build_entrance(&cfg, &spans);
        let start_of = |key: &TargetKey| {
            tl.entries()
                .iter()
                .find(|e| matches!(&e.action, Action::Tween { target, .. } if target == key))
                .map(|e| e.start)
        };
        let near = |key: &TargetKey, t: f32| (start_of(key).unwrap() - t).abs() < 1e-5;
        assert!(near(&cfg.title_words[0], 1.0));
        assert!(near(&cfg.title_words[1], 1.4));
        assert!(near(&spans[2], 2.36));
        assert!(near(&cfg.cta, 2.8));
    }

    #[test]
    fn curves_are_the_named_ones() {
        let ease_of = |tl: &Timeline, key: &TargetKey| {
            tl.entries().iter().find_map(|e| match &e.action {
                Action::Tween { target, ease, .. } if target == key => Some(*ease),
                _ => None,
            })
        };
        let pre = PreloaderConfig::default();
        let tl = build_preloader(&pre);
        assert_eq!(ease_of(&tl, &pre.brand), Some(Ease::Power(3, Dir::Out)));
        assert_eq!(ease_of(&tl, &pre.overlay), Some(Ease::Power(3, Dir::InOut)));

        let cfg = EntranceConfig::default();
        let tl = build_entrance(&cfg, &[cfg.subtitle.span(0)]);
        assert_eq!(ease_of(&tl, &cfg.title_words[0]), Some(Ease::Power(4, Dir::Out)));
        assert_eq!(ease_of(&tl, &cfg.cta), Some(Ease::BackOut(1.7)));
    }
}
