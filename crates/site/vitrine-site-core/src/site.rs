//! The page as a whole: owns the engine, the triggers, the timers and every
//! controller, and routes host events and engine cues between them.

use std::fmt;

use hashbrown::HashSet;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use vitrine_motion_core::{Change, Cue, MotionEngine, MotionEvent, PropSet, Stage, TargetKey};

use crate::bypass::{self, MotionMode};
use crate::config::SiteConfig;
use crate::controllers::{
    reveal, Carousel, CategoryTabs, Choreographer, Followup, HoverEffects, MobileNav,
    SectionReveals, Theme, ThemeToggle, TimerTag,
};
use crate::cue::SiteCue;
use crate::error::Result;
use crate::host::Host;
use crate::scroll::{ScrollHit, ScrollTriggers};
use crate::timers::TimerQueue;

/// Upper bound on cue → follow-up rounds within one tick.
const MAX_CUE_ROUNDS: usize = 16;

/// Independent startup steps, in the order they run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Component {
    Choreography,
    Parallax,
    Reveals,
    Hover,
    Gallery,
    Carousel,
    Theme,
    MobileNav,
}

impl Component {
    pub const ALL: [Component; 8] = [
        Component::Choreography,
        Component::Parallax,
        Component::Reveals,
        Component::Hover,
        Component::Gallery,
        Component::Carousel,
        Component::Theme,
        Component::MobileNav,
    ];
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Component::Choreography => "choreography",
            Component::Parallax => "parallax",
            Component::Reveals => "reveals",
            Component::Hover => "hover",
            Component::Gallery => "gallery",
            Component::Carousel => "carousel",
            Component::Theme => "theme",
            Component::MobileNav => "mobile nav",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupFailure {
    pub component: Component,
    pub error: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupReport {
    pub mode: MotionMode,
    pub failures: Vec<StartupFailure>,
}

impl StartupReport {
    pub fn failed(&self, component: Component) -> bool {
        self.failures.iter().any(|f| f.component == component)
    }
}

/// Host input. Targets are element ids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UiEvent {
    PointerEnter { target: TargetKey },
    PointerLeave { target: TargetKey },
    Click { target: TargetKey },
    Scroll { y: f32 },
    Resize {
        #[serde(rename = "viewportHeight")]
        viewport_height: f32,
    },
}

/// Everything that changed during one tick, for the host to apply.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteFrame {
    pub epoch: u64,
    pub dt: f32,
    pub changes: Vec<Change>,
    pub events: Vec<MotionEvent>,
}

#[derive(Debug)]
pub struct Site {
    cfg: SiteConfig,
    host: Host,
    engine: MotionEngine,
    scroll: ScrollTriggers,
    timers: TimerQueue<TimerTag>,
    mode: MotionMode,
    ready: HashSet<Component>,
    report: Option<StartupReport>,
    epoch: u64,
    scroll_y: f32,
    viewport_height: f32,

    choreo: Choreographer,
    reveals: SectionReveals,
    hover: HoverEffects,
    gallery: CategoryTabs,
    carousel: Carousel,
    theme: ThemeToggle,
    nav: MobileNav,
}

impl Site {
    pub fn new(cfg: SiteConfig, host: Host) -> Self {
        let viewport_height = host.document.viewport_height();
        Self {
            engine: MotionEngine::new(cfg.motion.clone()),
            scroll: ScrollTriggers::new(),
            timers: TimerQueue::new(),
            mode: MotionMode::Full,
            ready: HashSet::new(),
            report: None,
            epoch: 0,
            scroll_y: 0.0,
            viewport_height,
            choreo: Choreographer::new(cfg.preloader.clone(), cfg.entrance.clone()),
            reveals: SectionReveals::new(cfg.sections.clone()),
            hover: HoverEffects::new(cfg.collections.clone()),
            gallery: CategoryTabs::new(cfg.gallery.clone()),
            carousel: Carousel::new(cfg.carousel.clone()),
            theme: ThemeToggle::new(cfg.theme.clone()),
            nav: MobileNav::new(cfg.mobile_nav.clone()),
            cfg,
            host,
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.cfg
    }

    pub fn mode(&self) -> MotionMode {
        self.mode
    }

    pub fn engine(&self) -> &MotionEngine {
        &self.engine
    }

    pub fn stage(&self) -> &Stage {
        self.engine.stage()
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut Host {
        &mut self.host
    }

    /// Give the host back, e.g. to carry the preference store across a reload.
    pub fn into_host(self) -> Host {
        self.host
    }

    pub fn is_ready(&self, component: Component) -> bool {
        self.ready.contains(&component)
    }

    pub fn choreographer(&self) -> &Choreographer {
        &self.choreo
    }

    pub fn gallery(&self) -> &CategoryTabs {
        &self.gallery
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    pub fn nav(&self) -> &MobileNav {
        &self.nav
    }

    /// Run every startup step. A step that fails is logged and reported; the
    /// others still run. Calling this again returns the first report.
    pub fn start(&mut self) -> StartupReport {
        if let Some(report) = &self.report {
            debug!("site already started");
            return report.clone();
        }
        self.mode = MotionMode::detect(&*self.host.platform);
        let mut report = StartupReport {
            mode: self.mode,
            failures: Vec::new(),
        };
        for component in Component::ALL {
            match self.init(component) {
                Ok(()) => {
                    self.ready.insert(component);
                }
                Err(err) => {
                    warn!("{component} setup failed: {err}");
                    report.failures.push(StartupFailure {
                        component,
                        error: err.to_string(),
                    });
                }
            }
        }
        self.refresh();
        debug!(
            "site started ({:?}, {} of {} components ready)",
            self.mode,
            self.ready.len(),
            Component::ALL.len()
        );
        self.report = Some(report.clone());
        report
    }

    fn init(&mut self, component: Component) -> Result<()> {
        let doc = &*self.host.document;
        match component {
            Component::Choreography => {
                if self.mode.is_reduced() {
                    bypass::apply_reduced_motion(
                        &mut self.engine,
                        &mut self.scroll,
                        &mut self.choreo,
                        doc,
                        &self.cfg.theme.body,
                    )
                } else {
                    self.choreo.start(&mut self.engine, doc)
                }
            }
            Component::Parallax => reveal::setup_parallax(&self.cfg.parallax, &mut self.scroll),
            Component::Reveals => self.reveals.init(&mut self.engine, &mut self.scroll, self.mode),
            Component::Hover => {
                self.hover.bind(doc);
                Ok(())
            }
            Component::Gallery => self.gallery.init(&mut self.engine).map(|_| ()),
            Component::Carousel => self.carousel.init(&mut self.engine, &mut self.timers),
            Component::Theme => {
                self.theme.init(&mut self.engine, &*self.host.prefs);
                Ok(())
            }
            Component::MobileNav => self.nav.init(&mut self.engine, doc, self.mode),
        }
    }

    /// Recompute scroll geometry, re-bind hover effects and re-evaluate the
    /// current scroll position.
    pub fn refresh(&mut self) {
        self.scroll.refresh(&*self.host.document);
        if self.is_ready(Component::Hover) {
            self.hover.bind(&*self.host.document);
        }
        self.evaluate_scroll();
    }

    fn evaluate_scroll(&mut self) {
        for hit in self.scroll.on_scroll(self.scroll_y, self.viewport_height) {
            match hit {
                ScrollHit::Fired(cue) => self.route_cue(&cue),
                ScrollHit::Scrub {
                    target,
                    prop,
                    value,
                } => self.engine.set(&target, &PropSet::new().with(prop, value)),
            }
        }
    }

    fn followup(&mut self, followup: Followup) {
        match followup {
            Followup::RefreshLayout => self.refresh(),
        }
    }

    pub fn dispatch(&mut self, event: UiEvent) -> Result<()> {
        match event {
            UiEvent::PointerEnter { target } => {
                if self.is_ready(Component::Hover) {
                    let palette = self.cfg.theme.palette(self.theme.current());
                    self.hover.pointer_enter(&target, palette, &mut self.engine);
                }
                if self.is_ready(Component::Carousel) && &target == self.carousel.slider() {
                    self.carousel.pointer_enter(&mut self.timers);
                }
            }
            UiEvent::PointerLeave { target } => {
                if self.is_ready(Component::Hover) {
                    let palette = self.cfg.theme.palette(self.theme.current());
                    self.hover.pointer_leave(&target, palette, &mut self.engine);
                }
                if self.is_ready(Component::Carousel) && &target == self.carousel.slider() {
                    self.carousel.pointer_leave(&mut self.timers);
                }
            }
            UiEvent::Click { target } => self.click(&target)?,
            UiEvent::Scroll { y } => {
                self.scroll_y = y;
                self.evaluate_scroll();
            }
            UiEvent::Resize { viewport_height } => {
                self.viewport_height = viewport_height;
                self.refresh();
            }
        }
        Ok(())
    }

    fn click(&mut self, target: &TargetKey) -> Result<()> {
        if self.is_ready(Component::Theme) && target == &self.cfg.theme.toggle {
            self.theme.toggle(&mut self.engine, &mut *self.host.prefs);
            return Ok(());
        }
        if self.is_ready(Component::Gallery) {
            if let Some(category) = self.gallery.category_for_tab(target).map(String::from) {
                let animate = !self.mode.is_reduced();
                if let Some(f) = self.gallery.select(&category, animate, &mut self.engine)? {
                    self.followup(f);
                }
                return Ok(());
            }
        }
        if self.is_ready(Component::Carousel) {
            if let Some(j) = self.carousel.dot_index(target) {
                return self.carousel.select(j, &mut self.engine, &mut self.timers);
            }
        }
        if self.is_ready(Component::MobileNav) {
            self.nav.on_click(target, &mut self.engine);
        }
        Ok(())
    }

    fn route_cue(&mut self, cue: &Cue) {
        let Some(site_cue) = SiteCue::parse(cue) else {
            debug!("unrouted cue {cue:?}");
            return;
        };
        match site_cue {
            SiteCue::PreloaderDone => self
                .choreo
                .on_preloader_done(&mut self.engine, &*self.host.document),
            SiteCue::EntranceDone => self.choreo.on_entrance_done(),
            SiteCue::Reveal(i) => self.reveals.on_reveal(i, &mut self.engine),
            SiteCue::GalleryHidden(c) => self.gallery.on_hidden(&c, &mut self.engine),
            SiteCue::GalleryShown(c) => {
                if let Some(f) = self.gallery.on_shown(&c) {
                    self.followup(f);
                }
            }
            SiteCue::CarouselFaded(i) => self.carousel.on_faded(i, &mut self.engine),
            SiteCue::NavOpened => self.nav.on_opened(),
            SiteCue::NavClosed => self.nav.on_closed(&mut self.engine),
        }
    }

    /// Advance timers, then the engine, then hand every completion cue to its
    /// controller until no new work appears.
    pub fn tick(&mut self, dt: f32) -> SiteFrame {
        self.epoch += 1;
        for fired in self.timers.advance(f64::from(dt)) {
            match fired.tag {
                TimerTag::CarouselAdvance if self.is_ready(Component::Carousel) => {
                    if let Err(err) = self.carousel.on_timer(fired.handle, &mut self.engine) {
                        warn!("carousel advance failed: {err}");
                    }
                }
                TimerTag::CarouselAdvance => {}
            }
        }

        let mut frame = SiteFrame {
            epoch: self.epoch,
            dt,
            ..SiteFrame::default()
        };
        let mut out = self.engine.update(dt);
        let mut rounds = 0;
        loop {
            let cues: Vec<Cue> = out.cues().cloned().collect();
            frame.changes.append(&mut out.changes);
            frame.events.append(&mut out.events);
            if cues.is_empty() {
                break;
            }
            rounds += 1;
            if rounds > MAX_CUE_ROUNDS {
                warn!("cue routing did not settle after {MAX_CUE_ROUNDS} rounds");
                break;
            }
            for cue in &cues {
                self.route_cue(cue);
            }
            out = self.engine.drain();
        }
        frame
    }
}
