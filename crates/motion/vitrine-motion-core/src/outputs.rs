//! Output contracts from the engine.
//!
//! Outputs carry the document mutations produced since the last drain, in the
//! order they happened, plus the semantic events (completions, cues,
//! overwrites). Hosts mirror the changes onto the real document; controllers
//! react to the events.

use serde::{Deserialize, Serialize};

use crate::ids::{TargetKey, TimelineId};
use crate::timeline::Cue;
use crate::value::{Prop, Value};

/// One mutation of a target's inline style, class list, attributes or content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Change {
    /// `value: None` removes the inline override.
    Style {
        target: TargetKey,
        prop: Prop,
        value: Option<Value>,
    },
    Class {
        target: TargetKey,
        class: String,
        present: bool,
    },
    Attr {
        target: TargetKey,
        name: String,
        value: Option<String>,
    },
    /// Replace the target's text with one inline span per word; span `i` is
    /// addressed as `TargetKey::span(i)`.
    SplitWords {
        target: TargetKey,
        words: Vec<String>,
    },
}

impl Change {
    pub fn target(&self) -> &TargetKey {
        match self {
            Change::Style { target, .. }
            | Change::Class { target, .. }
            | Change::Attr { target, .. }
            | Change::SplitWords { target, .. } => target,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
#[non_exhaustive]
pub enum MotionEvent {
    TweenCompleted {
        timeline: TimelineId,
        cue: Cue,
    },
    /// A `call` entry was reached.
    Cue {
        timeline: TimelineId,
        cue: Cue,
    },
    TimelineCompleted {
        timeline: TimelineId,
        cue: Option<Cue>,
    },
    /// A newer tween took over `prop` on `target`; the older tween's
    /// completion for that property will never be reported.
    TweenOverwritten {
        timeline: TimelineId,
        target: TargetKey,
        prop: Prop,
    },
}

impl MotionEvent {
    /// Cue carried by this event, if any.
    pub fn cue(&self) -> Option<&Cue> {
        match self {
            MotionEvent::TweenCompleted { cue, .. } | MotionEvent::Cue { cue, .. } => Some(cue),
            MotionEvent::TimelineCompleted { cue, .. } => cue.as_ref(),
            MotionEvent::TweenOverwritten { .. } => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub events: Vec<MotionEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }

    /// Append everything from `other`, keeping order.
    pub fn append(&mut self, mut other: Outputs) {
        self.changes.append(&mut other.changes);
        self.events.append(&mut other.events);
    }

    pub fn cues(&self) -> impl Iterator<Item = &Cue> {
        self.events.iter().filter_map(MotionEvent::cue)
    }
}
