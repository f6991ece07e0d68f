//! Viewport triggers: one-shot reveals and scroll-bound scrubs.
//!
//! Geometry is read from the [`Document`] on [`ScrollTriggers::refresh`] and
//! cached; call it again whenever layout changes (a gallery panel becoming
//! visible, a resize).

use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};
use vitrine_motion_core::{lerp_f32, Cue, Prop, TargetKey};

use crate::error::SiteError;
use crate::host::{Bounds, Document};

/// `"<element anchor> <viewport anchor>"`, e.g. `"top 80%"`: the trigger point
/// is reached when that point of the element meets that point of the viewport.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggerEdge {
    pub element: f32,
    pub viewport: f32,
}

impl TriggerEdge {
    /// Scroll offset at which this edge is crossed.
    pub fn scroll_position(&self, bounds: Bounds, viewport_height: f32) -> f32 {
        bounds.top + bounds.height * self.element - viewport_height * self.viewport
    }
}

fn anchor(word: &str, raw: &str) -> Result<f32, SiteError> {
    match word {
        "top" => Ok(0.0),
        "center" => Ok(0.5),
        "bottom" => Ok(1.0),
        _ => word
            .strip_suffix('%')
            .and_then(|n| n.parse::<f32>().ok())
            .map(|n| n / 100.0)
            .ok_or_else(|| SiteError::InvalidTrigger(raw.to_string())),
    }
}

impl FromStr for TriggerEdge {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some(el), Some(vp), None) => Ok(TriggerEdge {
                element: anchor(el, s)?,
                viewport: anchor(vp, s)?,
            }),
            _ => Err(SiteError::InvalidTrigger(s.to_string())),
        }
    }
}

/// Property driven linearly by scroll progress through a scrub range.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrubBinding {
    pub target: TargetKey,
    pub prop: Prop,
    pub from: f32,
    pub to: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ScrollHit {
    /// A one-shot trigger crossed its start edge.
    Fired(Cue),
    Scrub {
        target: TargetKey,
        prop: Prop,
        value: f32,
    },
}

#[derive(Debug)]
enum Kind {
    Once {
        start: TriggerEdge,
        cue: Cue,
        fired: bool,
    },
    Scrub {
        start: TriggerEdge,
        end: TriggerEdge,
        binding: ScrubBinding,
        last: Option<f32>,
    },
}

#[derive(Debug)]
struct Trigger {
    element: TargetKey,
    bounds: Option<Bounds>,
    kind: Kind,
}

#[derive(Debug, Default)]
pub struct ScrollTriggers {
    triggers: Vec<Trigger>,
}

impl ScrollTriggers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// Report `cue` once, the first time `element` crosses `start`.
    pub fn register_once(&mut self, element: TargetKey, start: TriggerEdge, cue: Cue) {
        self.triggers.push(Trigger {
            element,
            bounds: None,
            kind: Kind::Once {
                start,
                cue,
                fired: false,
            },
        });
    }

    pub fn register_scrub(
        &mut self,
        element: TargetKey,
        start: TriggerEdge,
        end: TriggerEdge,
        binding: ScrubBinding,
    ) {
        self.triggers.push(Trigger {
            element,
            bounds: None,
            kind: Kind::Scrub {
                start,
                end,
                binding,
                last: None,
            },
        });
    }

    /// Re-read trigger geometry. Triggers whose element is absent stay inert.
    pub fn refresh(&mut self, doc: &dyn Document) {
        for trigger in &mut self.triggers {
            trigger.bounds = doc.bounds(&trigger.element);
            if let Kind::Scrub { last, .. } = &mut trigger.kind {
                *last = None;
            }
        }
        debug!("scroll triggers refreshed ({})", self.triggers.len());
    }

    pub fn on_scroll(&mut self, y: f32, viewport_height: f32) -> Vec<ScrollHit> {
        let mut hits = Vec::new();
        for trigger in &mut self.triggers {
            let Some(bounds) = trigger.bounds else {
                continue;
            };
            match &mut trigger.kind {
                Kind::Once { start, cue, fired } => {
                    if !*fired && y >= start.scroll_position(bounds, viewport_height) {
                        *fired = true;
                        hits.push(ScrollHit::Fired(cue.clone()));
                    }
                }
                Kind::Scrub {
                    start,
                    end,
                    binding,
                    last,
                } => {
                    let s = start.scroll_position(bounds, viewport_height);
                    let e = end.scroll_position(bounds, viewport_height);
                    let progress = if e > s {
                        ((y - s) / (e - s)).clamp(0.0, 1.0)
                    } else if y >= s {
                        1.0
                    } else {
                        0.0
                    };
                    if *last != Some(progress) {
                        *last = Some(progress);
                        hits.push(ScrollHit::Scrub {
                            target: binding.target.clone(),
                            prop: binding.prop,
                            value: lerp_f32(binding.from, binding.to, progress),
                        });
                    }
                }
            }
        }
        hits
    }

    pub fn kill_all(&mut self) {
        self.triggers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{StaticDocument, StaticElement};

    fn doc() -> StaticDocument {
        StaticDocument::new()
            .with(
                "hero",
                StaticElement {
                    top: 0.0,
                    height: 1000.0,
                    ..Default::default()
                },
            )
            .with(
                "about",
                StaticElement {
                    top: 1200.0,
                    height: 600.0,
                    ..Default::default()
                },
            )
    }

    #[test]
    fn parses_edges() {
        let e: TriggerEdge = "top 80%".parse().unwrap();
        assert_eq!(e, TriggerEdge { element: 0.0, viewport: 0.8 });
        let e: TriggerEdge = "bottom top".parse().unwrap();
        assert_eq!(e, TriggerEdge { element: 1.0, viewport: 0.0 });
        assert!("top".parse::<TriggerEdge>().is_err());
        assert!("top 80".parse::<TriggerEdge>().is_err());
        assert!("top top top".parse::<TriggerEdge>().is_err());
    }

    #[test]
    fn once_trigger_fires_a_single_time() {
        let mut st = ScrollTriggers::new();
        st.register_once("about".into(), "top 80%".parse().unwrap(), Cue::new("reveal/0"));
        st.refresh(&doc());
        // start = 1200 - 0.8 * 800 = 560
        assert!(st.on_scroll(500.0, 800.0).is_empty());
        assert_eq!(st.on_scroll(560.0, 800.0), vec![ScrollHit::Fired(Cue::new("reveal/0"))]);
        assert!(st.on_scroll(900.0, 800.0).is_empty());
        assert!(st.on_scroll(0.0, 800.0).is_empty());
    }

    #[test]
    fn scrub_reports_clamped_progress_on_change() {
        let mut st = ScrollTriggers::new();
        st.register_scrub(
            "hero".into(),
            "top top".parse().unwrap(),
            "bottom top".parse().unwrap(),
            ScrubBinding {
                target: "bg".into(),
                prop: Prop::YPercent,
                from: 0.0,
                to: 20.0,
            },
        );
        st.refresh(&doc());
        let value = |hits: Vec<ScrollHit>| match hits.as_slice() {
            [ScrollHit::Scrub { value, .. }] => Some(*value),
            _ => None,
        };
        assert_eq!(value(st.on_scroll(500.0, 800.0)), Some(10.0));
        assert_eq!(value(st.on_scroll(500.0, 800.0)), None);
        assert_eq!(value(st.on_scroll(5000.0, 800.0)), Some(20.0));
        assert_eq!(value(st.on_scroll(-10.0, 800.0)), Some(0.0));
    }

    #[test]
    fn missing_elements_stay_inert() {
        let mut st = ScrollTriggers::new();
        st.register_once("ghost".into(), "top 80%".parse().unwrap(), Cue::new("x"));
        st.refresh(&doc());
        assert!(st.on_scroll(1.0e6, 800.0).is_empty());
        st.kill_all();
        assert!(st.is_empty());
    }
}
