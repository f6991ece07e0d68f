//! The motion engine: owns the stage and every running timeline.
//!
//! Timelines are launched with [`MotionEngine::play`] and advanced with
//! [`MotionEngine::update`]. Each frame renders entries in start order, so a
//! later entry on the same property always wins within a timeline. Across
//! timelines, a tween issued with `overwrite` kills colliding tweens instead of
//! queuing behind them.

use log::debug;

use crate::config::MotionConfig;
use crate::ease::Ease;
use crate::ids::{IdAllocator, TargetKey, TimelineId};
use crate::outputs::{MotionEvent, Outputs};
use crate::stage::Stage;
use crate::timeline::{Action, IntoTargets, Timeline, TweenKind, TweenSpec};
use crate::value::{blend, Prop, PropSet};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    Pending,
    Active,
    Done,
    Killed,
}

impl Phase {
    fn settled(self) -> bool {
        matches!(self, Phase::Done | Phase::Killed)
    }
}

#[derive(Debug)]
struct RunEntry {
    start: f32,
    duration: f32,
    phase: Phase,
    action: Action,
    /// Values captured when the tween first renders.
    origin: PropSet,
    /// Values the tween lands on.
    dest: PropSet,
}

impl RunEntry {
    fn live_tween_on(&self, key: &TargetKey) -> bool {
        matches!(self.phase, Phase::Pending | Phase::Active)
            && matches!(&self.action, Action::Tween { target, .. } if target == key)
    }
}

#[derive(Debug)]
struct Running {
    id: TimelineId,
    time: f32,
    duration: f32,
    cue: Option<crate::timeline::Cue>,
    /// Created by `tween`; removed silently when all its entries are killed.
    standalone: bool,
    entries: Vec<RunEntry>,
    finished: bool,
}

/// Runs timelines against a [`Stage`] and reports what changed.
#[derive(Debug, Default)]
pub struct MotionEngine {
    cfg: MotionConfig,
    ids: IdAllocator,
    stage: Stage,
    running: Vec<Running>,
    events: Vec<MotionEvent>,
    instant: bool,
}

impl MotionEngine {
    pub fn new(cfg: MotionConfig) -> Self {
        Self {
            cfg,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.cfg
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    /// In instant mode every newly played timeline collapses to zero length
    /// and reaches its final state on launch.
    pub fn set_instant(&mut self, instant: bool) {
        self.instant = instant;
    }

    pub fn is_instant(&self) -> bool {
        self.instant
    }

    /// Immediate snapshot of `props` on every target.
    pub fn set(&mut self, targets: impl IntoTargets, props: &PropSet) {
        for target in targets.into_targets() {
            for (prop, value) in props.iter() {
                self.stage.set_style(&target, prop, value.clone());
            }
        }
    }

    /// Remove inline overrides so the targets fall back to their rest values.
    pub fn clear_props(&mut self, targets: impl IntoTargets, props: &[Prop]) {
        for target in targets.into_targets() {
            for prop in props {
                self.stage.clear_style(&target, *prop);
            }
        }
    }

    /// Stand-alone tween, played as a single-entry timeline starting now.
    pub fn tween(&mut self, spec: TweenSpec) -> TimelineId {
        let mut tl = Timeline::new();
        tl.add(spec, 0.0);
        self.launch(tl, true)
    }

    pub fn play(&mut self, timeline: Timeline) -> TimelineId {
        self.launch(timeline, false)
    }

    fn launch(&mut self, timeline: Timeline, standalone: bool) -> TimelineId {
        let timeline = if self.instant {
            timeline.collapsed()
        } else {
            timeline
        };
        let id = self.ids.alloc_timeline();
        let (entries, duration, cue) = timeline.into_parts();

        let mut entries: Vec<RunEntry> = entries
            .into_iter()
            .map(|e| RunEntry {
                start: e.start,
                duration: e.duration,
                phase: Phase::Pending,
                action: e.action,
                origin: PropSet::new(),
                dest: PropSet::new(),
            })
            .collect();
        entries.sort_by(|a, b| a.start.total_cmp(&b.start));

        for entry in &entries {
            if let Action::Tween {
                target,
                from,
                to,
                overwrite: true,
                clear_props,
                ..
            } = &entry.action
            {
                let mut props: Vec<Prop> = to.props().chain(clear_props.iter().copied()).collect();
                if let Some(from) = from {
                    props.extend(from.props());
                }
                self.overwrite(target, &props);
            }
        }

        // `from` and `fromTo` tweens show their start values immediately.
        for entry in &mut entries {
            if let Action::Tween {
                target, kind, from, to, ..
            } = &entry.action
            {
                entry.dest = match kind {
                    TweenKind::To | TweenKind::FromTo => to.clone(),
                    TweenKind::From => {
                        let mut captured = PropSet::new();
                        for prop in from.iter().flat_map(|f| f.props()) {
                            captured.insert(prop, self.stage.style(target, prop));
                        }
                        captured
                    }
                };
                if let Some(from) = from {
                    for (prop, value) in from.iter() {
                        self.stage.set_style(target, prop, value.clone());
                    }
                }
            }
        }

        debug!(
            "play timeline {:?}: {} entries over {:.3}s",
            id,
            entries.len(),
            duration
        );
        let mut run = Running {
            id,
            time: 0.0,
            duration,
            cue,
            standalone,
            entries,
            finished: false,
        };
        render(&mut self.stage, &mut self.events, &mut run);
        if !run.finished {
            self.running.push(run);
        }
        id
    }

    /// Strip `props` on `target` from every live tween. Tweens left with
    /// nothing to animate are killed and never report completion.
    fn overwrite(&mut self, target: &TargetKey, props: &[Prop]) {
        for run in &mut self.running {
            for entry in run.entries.iter_mut().filter(|e| e.live_tween_on(target)) {
                for prop in props {
                    entry.origin.remove(*prop);
                    if entry.dest.remove(*prop).is_some() {
                        self.events.push(MotionEvent::TweenOverwritten {
                            timeline: run.id,
                            target: target.clone(),
                            prop: *prop,
                        });
                    }
                    if let Action::Tween { clear_props, .. } = &mut entry.action {
                        clear_props.retain(|p| p != prop);
                    }
                }
                if entry.dest.is_empty() {
                    entry.phase = Phase::Killed;
                }
            }
        }
        self.running.retain(|run| {
            let dead = run.standalone && run.entries.iter().all(|e| e.phase == Phase::Killed);
            if dead {
                debug!("timeline {:?} fully overwritten", run.id);
            }
            !dead
        });
    }

    /// Advance every running timeline by `dt` seconds and return everything
    /// produced since the previous drain.
    pub fn update(&mut self, dt: f32) -> Outputs {
        let step = self.cfg.effective_dt(dt);
        let mut running = std::mem::take(&mut self.running);
        for run in &mut running {
            run.time += step;
            render(&mut self.stage, &mut self.events, run);
        }
        running.retain(|run| !run.finished);
        self.running = running;
        self.drain()
    }

    /// Changes and events produced since the previous drain (snapshots,
    /// launches and overwrites happen outside `update`).
    pub fn drain(&mut self) -> Outputs {
        Outputs {
            changes: self.stage.take_changes(),
            events: std::mem::take(&mut self.events),
        }
    }

    /// Drop every scheduled timeline without reporting anything.
    pub fn kill_all(&mut self) {
        if !self.running.is_empty() {
            debug!("killing {} timelines", self.running.len());
        }
        self.running.clear();
    }

    pub fn is_active(&self, id: TimelineId) -> bool {
        self.running.iter().any(|r| r.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.running.len()
    }
}

fn render(stage: &mut Stage, events: &mut Vec<MotionEvent>, run: &mut Running) {
    let time = run.time;
    for entry in &mut run.entries {
        if entry.phase.settled() || time < entry.start {
            continue;
        }
        match &entry.action {
            Action::Set { target, props } => {
                for (prop, value) in props.iter() {
                    stage.set_style(target, prop, value.clone());
                }
                entry.phase = Phase::Done;
            }
            Action::Call { cue } => {
                events.push(MotionEvent::Cue {
                    timeline: run.id,
                    cue: cue.clone(),
                });
                entry.phase = Phase::Done;
            }
            Action::Tween {
                target,
                kind,
                from,
                ease,
                clear_props,
                cue,
                ..
            } => {
                if entry.phase == Phase::Pending {
                    let mut origin = PropSet::new();
                    for prop in entry.dest.props() {
                        let value = from
                            .as_ref()
                            .and_then(|f| f.get(prop).cloned())
                            .unwrap_or_else(|| stage.style(target, prop));
                        origin.insert(prop, value);
                    }
                    entry.origin = origin;
                    entry.phase = Phase::Active;
                }

                let done = time >= entry.start + entry.duration;
                let eased = if done || entry.duration <= 0.0 {
                    1.0
                } else {
                    Ease::apply(*ease, (time - entry.start) / entry.duration)
                };
                for (prop, end) in entry.dest.iter() {
                    let value = match entry.origin.get(prop) {
                        _ if done => end.clone(),
                        // A `from` tween holds its step values until it lands.
                        Some(start) if end.is_step() && *kind == TweenKind::From => start.clone(),
                        Some(start) => blend(start, end, eased),
                        None => end.clone(),
                    };
                    stage.set_style(target, prop, value);
                }

                if done {
                    for prop in clear_props {
                        stage.clear_style(target, *prop);
                    }
                    if let Some(cue) = cue {
                        events.push(MotionEvent::TweenCompleted {
                            timeline: run.id,
                            cue: cue.clone(),
                        });
                    }
                    entry.phase = Phase::Done;
                }
            }
        }
    }

    if time >= run.duration && run.entries.iter().all(|e| e.phase.settled()) {
        run.finished = true;
        events.push(MotionEvent::TimelineCompleted {
            timeline: run.id,
            cue: run.cue.clone(),
        });
    }
}
