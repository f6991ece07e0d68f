//! Auto-advancing testimonial carousel.
//!
//! The index only moves through [`Carousel::show_slide`]; the hidden-class
//! swap only happens when the fade-out of the previous slide completes.

use log::debug;
use vitrine_motion_core::{Dir, Ease, MotionEngine, Prop, PropSet, TargetKey, TweenSpec};

use crate::config::CarouselConfig;
use crate::controllers::TimerTag;
use crate::cue::SiteCue;
use crate::error::{Result, SiteError};
use crate::timers::{TimerHandle, TimerQueue};

pub const HIDDEN: &str = "hidden";
pub const ACTIVE_DOT: &str = "active-dot";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CarouselState {
    Running(usize),
    Paused(usize),
}

impl CarouselState {
    pub fn index(self) -> usize {
        match self {
            CarouselState::Running(i) | CarouselState::Paused(i) => i,
        }
    }

    fn with_index(self, i: usize) -> Self {
        match self {
            CarouselState::Running(_) => CarouselState::Running(i),
            CarouselState::Paused(_) => CarouselState::Paused(i),
        }
    }
}

#[derive(Debug)]
pub struct Carousel {
    cfg: CarouselConfig,
    state: CarouselState,
    timer: Option<TimerHandle>,
}

impl Carousel {
    pub fn new(cfg: CarouselConfig) -> Self {
        Self {
            cfg,
            state: CarouselState::Running(0),
            timer: None,
        }
    }

    pub fn state(&self) -> CarouselState {
        self.state
    }

    pub fn index(&self) -> usize {
        self.state.index()
    }

    pub fn len(&self) -> usize {
        self.cfg.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cfg.slides.is_empty()
    }

    pub fn timer(&self) -> Option<TimerHandle> {
        self.timer
    }

    pub fn slider(&self) -> &TargetKey {
        &self.cfg.slider
    }

    /// Index of the dot `target`, if it is one of ours.
    pub fn dot_index(&self, target: &TargetKey) -> Option<usize> {
        self.cfg.dots.iter().position(|d| d == target)
    }

    /// Show the first slide and start the timer. The first slide fades in
    /// unless the engine is in instant mode.
    pub fn init(&mut self, engine: &mut MotionEngine, timers: &mut TimerQueue<TimerTag>) -> Result<()> {
        if self.is_empty() {
            return Err(SiteError::EmptyCarousel);
        }
        self.state = CarouselState::Running(0);
        let stage = engine.stage_mut();
        for (i, slide) in self.cfg.slides.iter().enumerate() {
            if i == 0 {
                stage.remove_class(slide, HIDDEN);
            } else {
                stage.add_class(slide, HIDDEN);
            }
        }
        self.update_dots(engine);
        if !engine.is_instant() {
            self.show_slide(0, engine)?;
        }
        self.restart_timer(timers);
        Ok(())
    }

    fn update_dots(&self, engine: &mut MotionEngine) {
        let stage = engine.stage_mut();
        for (i, dot) in self.cfg.dots.iter().enumerate() {
            if i == self.index() {
                stage.add_class(dot, ACTIVE_DOT);
            } else {
                stage.remove_class(dot, ACTIVE_DOT);
            }
        }
    }

    fn restart_timer(&mut self, timers: &mut TimerQueue<TimerTag>) {
        if let Some(old) = self.timer.take() {
            timers.clear(old);
        }
        self.timer = Some(timers.set_interval(self.cfg.interval_secs(), TimerTag::CarouselAdvance));
    }

    fn stop_timer(&mut self, timers: &mut TimerQueue<TimerTag>) {
        if let Some(old) = self.timer.take() {
            timers.clear(old);
        }
    }

    /// Make slide `i` current: dots update now, every slide fades out, and
    /// [`SiteCue::CarouselFaded`] brings the new one in.
    pub fn show_slide(&mut self, i: usize, engine: &mut MotionEngine) -> Result<()> {
        let len = self.len();
        if len == 0 {
            return Err(SiteError::EmptyCarousel);
        }
        if i >= len {
            return Err(SiteError::SlideOutOfRange { index: i, len });
        }
        debug!("carousel -> slide {i}");
        self.state = self.state.with_index(i);
        self.update_dots(engine);
        engine.tween(
            TweenSpec::to(&self.cfg.slides, PropSet::new().with(Prop::Opacity, 0.0))
                .duration(0.5)
                .overwrite()
                .on_complete(SiteCue::CarouselFaded(i).into()),
        );
        Ok(())
    }

    pub fn next_slide(&mut self, engine: &mut MotionEngine) -> Result<()> {
        let len = self.len();
        if len == 0 {
            return Err(SiteError::EmptyCarousel);
        }
        self.show_slide((self.index() + 1) % len, engine)
    }

    /// Dot selection: jump to `j` and restart the interval from zero. A
    /// paused carousel resumes running.
    pub fn select(
        &mut self,
        j: usize,
        engine: &mut MotionEngine,
        timers: &mut TimerQueue<TimerTag>,
    ) -> Result<()> {
        self.show_slide(j, engine)?;
        self.state = CarouselState::Running(j);
        self.restart_timer(timers);
        Ok(())
    }

    pub fn pointer_enter(&mut self, timers: &mut TimerQueue<TimerTag>) {
        self.stop_timer(timers);
        self.state = CarouselState::Paused(self.index());
    }

    pub fn pointer_leave(&mut self, timers: &mut TimerQueue<TimerTag>) {
        self.state = CarouselState::Running(self.index());
        self.restart_timer(timers);
    }

    /// Interval expiry. Fires from a replaced handle do nothing.
    pub fn on_timer(&mut self, handle: TimerHandle, engine: &mut MotionEngine) -> Result<()> {
        if self.timer != Some(handle) {
            return Ok(());
        }
        self.next_slide(engine)
    }

    /// Fade-out completion: swap hidden classes and bring slide `i` in. A
    /// completion for a slide that is no longer current is dropped.
    pub fn on_faded(&mut self, i: usize, engine: &mut MotionEngine) {
        if i != self.index() {
            return;
        }
        let Some(current) = self.cfg.slides.get(i).cloned() else {
            return;
        };
        let stage = engine.stage_mut();
        for slide in &self.cfg.slides {
            if *slide == current {
                stage.remove_class(slide, HIDDEN);
            } else {
                stage.add_class(slide, HIDDEN);
            }
        }
        engine.tween(
            TweenSpec::from_to(
                &current,
                PropSet::new().with(Prop::Opacity, 0.0).with(Prop::Y, 20.0),
                PropSet::new().with(Prop::Opacity, 1.0).with(Prop::Y, 0.0),
            )
            .duration(0.8)
            .ease(Ease::Power(3, Dir::Out))
            .overwrite(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timers::Fired;

    fn carousel(n: usize) -> Carousel {
        Carousel::new(CarouselConfig {
            slides: (0..n).map(|i| TargetKey(format!("s{i}"))).collect(),
            dots: (0..n).map(|i| TargetKey(format!("d{i}"))).collect(),
            ..CarouselConfig::default()
        })
    }

    fn fire(c: &mut Carousel, fired: Vec<Fired<TimerTag>>, engine: &mut MotionEngine) {
        for f in fired {
            c.on_timer(f.handle, engine).unwrap();
        }
    }

    #[test]
    fn empty_carousel_refuses_to_start() {
        let mut c = carousel(0);
        let mut engine = MotionEngine::default();
        let mut timers = TimerQueue::new();
        assert!(matches!(c.init(&mut engine, &mut timers), Err(SiteError::EmptyCarousel)));
        assert_eq!(timers.live_count(), 0);
    }

    #[test]
    fn timer_advances_and_wraps() {
        let mut c = carousel(3);
        let mut engine = MotionEngine::default();
        let mut timers = TimerQueue::new();
        c.init(&mut engine, &mut timers).unwrap();
        for expected in [1, 2, 0] {
            let fired = timers.advance(7.0);
            fire(&mut c, fired, &mut engine);
            assert_eq!(c.index(), expected);
        }
    }

    #[test]
    fn single_slide_stays_on_zero() {
        let mut c = carousel(1);
        let mut engine = MotionEngine::default();
        let mut timers = TimerQueue::new();
        c.init(&mut engine, &mut timers).unwrap();
        let fired = timers.advance(7.0);
        fire(&mut c, fired, &mut engine);
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn select_jumps_and_restarts_interval() {
        let mut c = carousel(3);
        let mut engine = MotionEngine::default();
        let mut timers = TimerQueue::new();
        c.init(&mut engine, &mut timers).unwrap();
        timers.advance(5.0);
        c.select(2, &mut engine, &mut timers).unwrap();
        assert_eq!(c.index(), 2);
        assert!(engine.stage().has_class(&TargetKey::from("d2"), ACTIVE_DOT));
        assert!(!engine.stage().has_class(&TargetKey::from("d0"), ACTIVE_DOT));

        // The old schedule would have fired at 7s.
        assert!(timers.advance(2.5).is_empty());
        let fired = timers.advance(4.5);
        fire(&mut c, fired, &mut engine);
        assert_eq!(c.index(), 0);
        assert_eq!(timers.live_count(), 1);
    }

    #[test]
    fn select_out_of_range_is_an_error() {
        let mut c = carousel(2);
        let mut engine = MotionEngine::default();
        let mut timers = TimerQueue::new();
        c.init(&mut engine, &mut timers).unwrap();
        assert!(matches!(
            c.select(5, &mut engine, &mut timers),
            Err(SiteError::SlideOutOfRange { index: 5, len: 2 })
        ));
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn hover_pauses_and_leave_restarts_from_zero() {
        let mut c = carousel(3);
        let mut engine = MotionEngine::default();
        let mut timers = TimerQueue::new();
        c.init(&mut engine, &mut timers).unwrap();
        timers.advance(3.0);
        c.pointer_enter(&mut timers);
        assert_eq!(timers.live_count(), 0);
        assert!(timers.advance(20.0).is_empty());
        assert_eq!(c.state(), CarouselState::Paused(0));

        c.pointer_leave(&mut timers);
        assert!(timers.advance(6.9).is_empty());
        let fired = timers.advance(0.2);
        fire(&mut c, fired, &mut engine);
        assert_eq!(c.state(), CarouselState::Running(1));
    }

    #[test]
    fn select_while_paused_resumes_running() {
        let mut c = carousel(3);
        let mut engine = MotionEngine::default();
        let mut timers = TimerQueue::new();
        c.init(&mut engine, &mut timers).unwrap();
        c.pointer_enter(&mut timers);
        c.select(1, &mut engine, &mut timers).unwrap();
        assert_eq!(c.state(), CarouselState::Running(1));
        assert_eq!(timers.live_count(), 1);

        let fired = timers.advance(7.0);
        fire(&mut c, fired, &mut engine);
        assert_eq!(c.state(), CarouselState::Running(2));
    }

    #[test]
    fn first_slide_fades_in_on_init() {
        let mut c = carousel(3);
        let mut engine = MotionEngine::default();
        let mut timers = TimerQueue::new();
        c.init(&mut engine, &mut timers).unwrap();
        assert_eq!(engine.active_count(), 1);
        let out = engine.update(0.6);
        let cues: Vec<_> = out.cues().filter_map(SiteCue::parse).collect();
        assert_eq!(cues, vec![SiteCue::CarouselFaded(0)]);
        c.on_faded(0, &mut engine);
        assert!(!engine.stage().has_class(&TargetKey::from("s0"), HIDDEN));
        assert!(engine.stage().has_class(&TargetKey::from("s1"), HIDDEN));
        engine.update(1.0);
        assert_eq!(engine.stage().float(&TargetKey::from("s0"), Prop::Opacity), 1.0);
    }

    #[test]
    fn instant_engine_skips_the_first_fade() {
        let mut c = carousel(2);
        let mut engine = MotionEngine::default();
        engine.set_instant(true);
        let mut timers = TimerQueue::new();
        c.init(&mut engine, &mut timers).unwrap();
        assert_eq!(engine.active_count(), 0);
        assert!(!engine.stage().has_class(&TargetKey::from("s0"), HIDDEN));
    }

    #[test]
    fn fade_completion_swaps_hidden_classes() {
        let mut c = carousel(3);
        let mut engine = MotionEngine::default();
        let mut timers = TimerQueue::new();
        c.init(&mut engine, &mut timers).unwrap();
        c.show_slide(1, &mut engine).unwrap();
        // Nothing moves between classes until the fade-out lands.
        assert!(engine.stage().has_class(&TargetKey::from("s1"), HIDDEN));

        let out = engine.update(0.6);
        let cues: Vec<_> = out.cues().filter_map(SiteCue::parse).collect();
        assert_eq!(cues, vec![SiteCue::CarouselFaded(1)]);
        c.on_faded(1, &mut engine);
        assert!(!engine.stage().has_class(&TargetKey::from("s1"), HIDDEN));
        assert!(engine.stage().has_class(&TargetKey::from("s0"), HIDDEN));

        engine.update(1.0);
        assert_eq!(engine.stage().float(&TargetKey::from("s1"), Prop::Opacity), 1.0);
    }

    #[test]
    fn superseded_fade_is_overwritten() {
        let mut c = carousel(3);
        let mut engine = MotionEngine::default();
        let mut timers = TimerQueue::new();
        c.init(&mut engine, &mut timers).unwrap();
        c.show_slide(1, &mut engine).unwrap();
        engine.update(0.1);
        c.show_slide(2, &mut engine).unwrap();
        let out = engine.update(1.0);
        let cues: Vec<_> = out.cues().filter_map(SiteCue::parse).collect();
        assert_eq!(cues, vec![SiteCue::CarouselFaded(2)]);
        c.on_faded(1, &mut engine);
        assert!(engine.stage().has_class(&TargetKey::from("s1"), HIDDEN));
    }
}
