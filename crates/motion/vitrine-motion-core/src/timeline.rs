//! Timeline builder: tweens, snapshots and cues placed at resolved absolute
//! start times.
//!
//! Positions follow the page-script conventions:
//! - `"+=0.5"` / `"-=0.5"`: relative to the current end of the timeline
//! - `"<"` / `"<0.1"`: relative to the start of the previously added item
//! - `">"` / `">0.2"`: relative to the end of the previously added item
//! - `"1.4"`: absolute seconds

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ease::Ease;
use crate::error::MotionError;
use crate::ids::TargetKey;
use crate::value::{Prop, PropSet};

/// Duration used when neither the tween nor the timeline defaults name one.
pub const DEFAULT_DURATION: f32 = 0.5;

/// Opaque label reported back through engine events when a tween, call or
/// timeline completes.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cue(pub String);

impl Cue {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Position {
    End(f32),
    PrevStart(f32),
    PrevEnd(f32),
    At(f32),
}

impl Default for Position {
    fn default() -> Self {
        Position::End(0.0)
    }
}

impl From<f32> for Position {
    fn from(t: f32) -> Self {
        Position::At(t)
    }
}

impl From<f64> for Position {
    fn from(t: f64) -> Self {
        Position::At(t as f32)
    }
}

impl FromStr for Position {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let num = |n: &str| -> Result<f32, MotionError> {
            if n.is_empty() {
                return Ok(0.0);
            }
            n.parse::<f32>()
                .map_err(|_| MotionError::InvalidPosition(raw.to_string()))
        };

        if raw.is_empty() {
            return Ok(Position::End(0.0));
        }
        if let Some(rest) = raw.strip_prefix("+=") {
            return Ok(Position::End(num(rest)?));
        }
        if let Some(rest) = raw.strip_prefix("-=") {
            return Ok(Position::End(-num(rest)?));
        }
        if let Some(rest) = raw.strip_prefix('<') {
            return Ok(Position::PrevStart(num(rest)?));
        }
        if let Some(rest) = raw.strip_prefix('>') {
            return Ok(Position::PrevEnd(num(rest)?));
        }
        raw.parse::<f32>()
            .map(Position::At)
            .map_err(|_| MotionError::InvalidPosition(raw.to_string()))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TweenKind {
    /// Animate from the current value to the given values.
    To,
    /// Animate from the given values back to the current value.
    From,
    /// Animate between two explicit value sets.
    FromTo,
}

/// Accepts one or many targets wherever a tween or snapshot is issued.
pub trait IntoTargets {
    fn into_targets(self) -> Vec<TargetKey>;
}

impl IntoTargets for &str {
    fn into_targets(self) -> Vec<TargetKey> {
        vec![TargetKey::from(self)]
    }
}

impl IntoTargets for TargetKey {
    fn into_targets(self) -> Vec<TargetKey> {
        vec![self]
    }
}

impl IntoTargets for &TargetKey {
    fn into_targets(self) -> Vec<TargetKey> {
        vec![self.clone()]
    }
}

impl IntoTargets for Vec<TargetKey> {
    fn into_targets(self) -> Vec<TargetKey> {
        self
    }
}

impl IntoTargets for &[TargetKey] {
    fn into_targets(self) -> Vec<TargetKey> {
        self.to_vec()
    }
}

impl IntoTargets for &Vec<TargetKey> {
    fn into_targets(self) -> Vec<TargetKey> {
        self.clone()
    }
}

/// A tween request before it is placed on a timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct TweenSpec {
    pub targets: Vec<TargetKey>,
    pub kind: TweenKind,
    pub from: Option<PropSet>,
    pub to: PropSet,
    pub duration: Option<f32>,
    pub ease: Option<Ease>,
    pub delay: f32,
    pub stagger: f32,
    pub overwrite: bool,
    pub clear_props: Vec<Prop>,
    pub cue: Option<Cue>,
}

impl TweenSpec {
    fn base(targets: Vec<TargetKey>, kind: TweenKind) -> Self {
        Self {
            targets,
            kind,
            from: None,
            to: PropSet::new(),
            duration: None,
            ease: None,
            delay: 0.0,
            stagger: 0.0,
            overwrite: false,
            clear_props: Vec::new(),
            cue: None,
        }
    }

    pub fn to(targets: impl IntoTargets, props: PropSet) -> Self {
        let mut spec = Self::base(targets.into_targets(), TweenKind::To);
        spec.to = props;
        spec
    }

    pub fn from(targets: impl IntoTargets, props: PropSet) -> Self {
        let mut spec = Self::base(targets.into_targets(), TweenKind::From);
        spec.from = Some(props);
        spec
    }

    pub fn from_to(targets: impl IntoTargets, from: PropSet, to: PropSet) -> Self {
        let mut spec = Self::base(targets.into_targets(), TweenKind::FromTo);
        spec.from = Some(from);
        spec.to = to;
        spec
    }

    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration = Some(seconds.max(0.0));
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    pub fn delay(mut self, seconds: f32) -> Self {
        self.delay = seconds.max(0.0);
        self
    }

    pub fn stagger(mut self, seconds: f32) -> Self {
        self.stagger = seconds.max(0.0);
        self
    }

    /// Kill in-flight tweens on the same target+property when this one is issued.
    pub fn overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    /// Remove these inline properties once the tween completes.
    pub fn clear_props(mut self, props: impl IntoIterator<Item = Prop>) -> Self {
        self.clear_props.extend(props);
        self
    }

    pub fn on_complete(mut self, cue: Cue) -> Self {
        self.cue = Some(cue);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Tween {
        target: TargetKey,
        kind: TweenKind,
        from: Option<PropSet>,
        to: PropSet,
        ease: Ease,
        overwrite: bool,
        clear_props: Vec<Prop>,
        cue: Option<Cue>,
    },
    Set {
        target: TargetKey,
        props: PropSet,
    },
    Call {
        cue: Cue,
    },
}

/// One resolved timeline entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub start: f32,
    pub duration: f32,
    pub action: Action,
}

impl Entry {
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }
}

/// Defaults applied to tweens that leave the field unset.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Defaults {
    pub ease: Option<Ease>,
    pub duration: Option<f32>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Span {
    start: f32,
    end: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timeline {
    entries: Vec<Entry>,
    defaults: Defaults,
    cue: Option<Cue>,
    last: Option<Span>,
    end: f32,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: Defaults) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    /// Cue reported when the whole timeline has played through.
    pub fn on_complete(mut self, cue: Cue) -> Self {
        self.cue = Some(cue);
        self
    }

    pub fn cue(&self) -> Option<&Cue> {
        self.cue.as_ref()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Latest end time over all entries.
    pub fn duration(&self) -> f32 {
        self.end
    }

    fn resolve(&self, pos: Position) -> f32 {
        let t = match pos {
            Position::End(offset) => self.end + offset,
            Position::PrevStart(offset) => self.last.map_or(0.0, |s| s.start) + offset,
            Position::PrevEnd(offset) => self.last.map_or(0.0, |s| s.end) + offset,
            Position::At(t) => t,
        };
        t.max(0.0)
    }

    fn push(&mut self, entry: Entry) {
        self.end = self.end.max(entry.end());
        self.entries.push(entry);
    }

    /// Place a tween. Multiple targets are staggered; the completion cue is
    /// attached to the last target so it fires once for the whole tween.
    pub fn add(&mut self, spec: TweenSpec, at: impl Into<Position>) -> &mut Self {
        let base = self.resolve(at.into()) + spec.delay;
        let duration = spec
            .duration
            .or(self.defaults.duration)
            .unwrap_or(DEFAULT_DURATION);
        let ease = spec.ease.or(self.defaults.ease).unwrap_or_default();

        let count = spec.targets.len();
        if count == 0 {
            if let Some(cue) = spec.cue {
                self.push(Entry {
                    start: base + duration,
                    duration: 0.0,
                    action: Action::Call { cue },
                });
            }
            self.last = Some(Span {
                start: base,
                end: base + duration,
            });
            return self;
        }

        for (i, target) in spec.targets.into_iter().enumerate() {
            let cue = if i + 1 == count { spec.cue.clone() } else { None };
            self.push(Entry {
                start: base + spec.stagger * i as f32,
                duration,
                action: Action::Tween {
                    target,
                    kind: spec.kind,
                    from: spec.from.clone(),
                    to: spec.to.clone(),
                    ease,
                    overwrite: spec.overwrite,
                    clear_props: spec.clear_props.clone(),
                    cue,
                },
            });
        }
        self.last = Some(Span {
            start: base,
            end: base + spec.stagger * (count - 1) as f32 + duration,
        });
        self
    }

    /// Instant snapshot of `props` on every target at the given position.
    pub fn set(
        &mut self,
        targets: impl IntoTargets,
        props: PropSet,
        at: impl Into<Position>,
    ) -> &mut Self {
        let start = self.resolve(at.into());
        for target in targets.into_targets() {
            self.push(Entry {
                start,
                duration: 0.0,
                action: Action::Set {
                    target,
                    props: props.clone(),
                },
            });
        }
        self.last = Some(Span { start, end: start });
        self
    }

    /// Report `cue` when the playhead reaches the given position.
    pub fn call(&mut self, cue: Cue, at: impl Into<Position>) -> &mut Self {
        let start = self.resolve(at.into());
        self.push(Entry {
            start,
            duration: 0.0,
            action: Action::Call { cue },
        });
        self.last = Some(Span { start, end: start });
        self
    }

    /// Same entries in the same order, with every start and duration at zero.
    pub fn collapsed(&self) -> Timeline {
        let mut out = self.clone();
        for e in &mut out.entries {
            e.start = 0.0;
            e.duration = 0.0;
        }
        out.end = 0.0;
        out.last = out.last.map(|_| Span {
            start: 0.0,
            end: 0.0,
        });
        out
    }

    pub(crate) fn into_parts(self) -> (Vec<Entry>, f32, Option<Cue>) {
        (self.entries, self.end, self.cue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Prop;
    use approx::assert_relative_eq;

    fn fade(target: &str, to: f32, d: f32) -> TweenSpec {
        TweenSpec::to(target, PropSet::new().with(Prop::Opacity, to)).duration(d)
    }

    #[test]
    fn parses_positions() {
        assert_eq!("+=0.5".parse::<Position>().unwrap(), Position::End(0.5));
        assert_eq!("-=0.8".parse::<Position>().unwrap(), Position::End(-0.8));
        assert_eq!("<0.1".parse::<Position>().unwrap(), Position::PrevStart(0.1));
        assert_eq!("<".parse::<Position>().unwrap(), Position::PrevStart(0.0));
        assert_eq!(">".parse::<Position>().unwrap(), Position::PrevEnd(0.0));
        assert_eq!("1.4".parse::<Position>().unwrap(), Position::At(1.4));
        assert!(matches!(
            "<<".parse::<Position>(),
            Err(MotionError::InvalidPosition(_))
        ));
    }

    #[test]
    fn appends_by_default_and_resolves_relative_positions() {
        let mut tl = Timeline::new();
        tl.add(fade("a", 0.0, 0.8), Position::default());
        tl.add(fade("b", 1.0, 0.3), "+=0.5".parse::<Position>().unwrap());
        tl.add(fade("c", 1.0, 0.5), Position::PrevStart(0.1));
        tl.add(fade("d", 0.0, 0.5), "-=0.2".parse::<Position>().unwrap());

        let starts: Vec<f32> = tl.entries().iter().map(|e| e.start).collect();
        assert_relative_eq!(starts[0], 0.0, epsilon = 1e-5);
        assert_relative_eq!(starts[1], 1.3, epsilon = 1e-5);
        assert_relative_eq!(starts[2], 1.4, epsilon = 1e-5);
        // end so far is max(1.6, 1.9) = 1.9
        assert_relative_eq!(starts[3], 1.7, epsilon = 1e-5);
        assert_relative_eq!(tl.duration(), 2.2, epsilon = 1e-5);
    }

    #[test]
    fn delay_shifts_start_and_stagger_spreads_targets() {
        let mut tl = Timeline::new();
        let targets: Vec<TargetKey> = vec!["a".into(), "b".into(), "c".into()];
        tl.add(
            TweenSpec::to(targets, PropSet::new().with(Prop::Y, 0.0))
                .duration(1.0)
                .delay(0.5)
                .stagger(0.2)
                .on_complete(Cue::new("done")),
            0.0,
        );
        let starts: Vec<f32> = tl.entries().iter().map(|e| e.start).collect();
        assert_relative_eq!(starts[0], 0.5, epsilon = 1e-5);
        assert_relative_eq!(starts[1], 0.7, epsilon = 1e-5);
        assert_relative_eq!(starts[2], 0.9, epsilon = 1e-5);
        assert_relative_eq!(tl.duration(), 1.9, epsilon = 1e-5);

        let cues: Vec<bool> = tl
            .entries()
            .iter()
            .map(|e| matches!(&e.action, Action::Tween { cue: Some(_), .. }))
            .collect();
        assert_eq!(cues, vec![false, false, true]);
    }

    #[test]
    fn defaults_fill_unset_fields() {
        let mut tl = Timeline::with_defaults(Defaults {
            ease: Some("power3.out".parse().unwrap()),
            duration: Some(1.2),
        });
        tl.add(TweenSpec::to("a", PropSet::new().with(Prop::Opacity, 1.0)), 0.0);
        let e = &tl.entries()[0];
        assert_relative_eq!(e.duration, 1.2, epsilon = 1e-5);
        match &e.action {
            Action::Tween { ease, .. } => assert_eq!(ease.identifier(), "power3.out"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_target_list_still_reports_its_cue() {
        let mut tl = Timeline::new();
        tl.add(
            TweenSpec::from(Vec::<TargetKey>::new(), PropSet::new().with(Prop::Opacity, 0.0))
                .duration(0.8)
                .on_complete(Cue::new("words")),
            2.0,
        );
        assert_eq!(tl.entries().len(), 1);
        assert!(matches!(tl.entries()[0].action, Action::Call { .. }));
        assert_relative_eq!(tl.duration(), 2.8, epsilon = 1e-5);
    }

    #[test]
    fn building_twice_is_deterministic() {
        let build = || {
            let mut tl = Timeline::new();
            tl.add(fade("a", 0.0, 0.3), "+=0.5".parse::<Position>().unwrap());
            tl.set("a", PropSet::new().with(Prop::Text, "x"), Position::PrevEnd(0.0));
            tl.add(fade("a", 1.0, 0.5), Position::default());
            tl
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn collapsed_keeps_order_and_zeroes_time() {
        let mut tl = Timeline::new();
        tl.add(fade("a", 0.0, 0.3), 1.0);
        tl.add(fade("a", 1.0, 0.5), Position::default());
        let c = tl.collapsed();
        assert_eq!(c.entries().len(), 2);
        assert!(c.entries().iter().all(|e| e.start == 0.0 && e.duration == 0.0));
        assert_eq!(c.duration(), 0.0);
    }
}
