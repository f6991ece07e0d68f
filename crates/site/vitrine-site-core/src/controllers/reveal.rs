//! Scroll reveals for content sections, plus the hero background parallax.

use log::debug;
use vitrine_motion_core::{Dir, Ease, MotionEngine, Prop, PropSet, TweenSpec};

use crate::bypass::MotionMode;
use crate::config::{ParallaxConfig, SectionConfig};
use crate::cue::SiteCue;
use crate::error::Result;
use crate::scroll::{ScrollTriggers, ScrubBinding, TriggerEdge};

fn shown() -> PropSet {
    PropSet::new().with(Prop::Opacity, 1.0).with(Prop::Y, 0.0)
}

#[derive(Debug, Default)]
pub struct SectionReveals {
    sections: Vec<SectionConfig>,
}

impl SectionReveals {
    pub fn new(sections: Vec<SectionConfig>) -> Self {
        Self { sections }
    }

    /// Static sections and every section in reduced mode land on their final
    /// state now; the rest start lowered and wait for their trigger.
    pub fn init(
        &self,
        engine: &mut MotionEngine,
        scroll: &mut ScrollTriggers,
        mode: MotionMode,
    ) -> Result<()> {
        for (i, section) in self.sections.iter().enumerate() {
            if !section.animate || mode.is_reduced() {
                engine.set(&section.targets, &shown());
                continue;
            }
            let start: TriggerEdge = section.start.parse()?;
            engine.set(
                &section.targets,
                &PropSet::new().with(Prop::Opacity, 0.0).with(Prop::Y, 50.0),
            );
            if !section.targets.is_empty() {
                scroll.register_once(section.trigger.clone(), start, SiteCue::Reveal(i).into());
            }
        }
        Ok(())
    }

    pub fn on_reveal(&self, index: usize, engine: &mut MotionEngine) {
        let Some(section) = self.sections.get(index) else {
            return;
        };
        debug!("revealing section {}", section.trigger);
        engine.tween(
            TweenSpec::to(&section.targets, shown())
                .stagger(0.2)
                .duration(1.0)
                .ease(Ease::Power(3, Dir::Out)),
        );
    }
}

/// Bind the hero background's `yPercent` to scroll through the hero.
pub fn setup_parallax(cfg: &ParallaxConfig, scroll: &mut ScrollTriggers) -> Result<()> {
    let start: TriggerEdge = cfg.start.parse()?;
    let end: TriggerEdge = cfg.end.parse()?;
    scroll.register_scrub(
        cfg.trigger.clone(),
        start,
        end,
        ScrubBinding {
            target: cfg.target.clone(),
            prop: Prop::YPercent,
            from: 0.0,
            to: cfg.y_percent,
        },
    );
    Ok(())
}
