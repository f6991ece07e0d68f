//! Pointer-driven micro-effects on collection cards.

use log::debug;
use vitrine_motion_core::{Dir, Ease, MotionEngine, Prop, PropSet, TargetKey, TweenSpec, Value};

use crate::config::{CardConfig, Palette};
use crate::host::Document;

const TRANSPARENT: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

fn quick(target: &TargetKey, props: PropSet, duration: f32) -> TweenSpec {
    TweenSpec::to(target, props)
        .duration(duration)
        .ease(Ease::Power(2, Dir::Out))
        .overwrite()
}

#[derive(Debug, Default)]
pub struct HoverEffects {
    cards: Vec<CardConfig>,
    bound: Vec<bool>,
}

impl HoverEffects {
    pub fn new(cards: Vec<CardConfig>) -> Self {
        let bound = vec![false; cards.len()];
        Self { cards, bound }
    }

    /// (Re)bind effects to every card present in the document. Binding again
    /// replaces the previous binding rather than stacking on top of it.
    pub fn bind(&mut self, doc: &dyn Document) -> usize {
        for (card, bound) in self.cards.iter().zip(self.bound.iter_mut()) {
            *bound = doc.contains(&card.item);
        }
        let n = self.bound_count();
        debug!("hover effects bound to {n} cards");
        n
    }

    pub fn bound_count(&self) -> usize {
        self.bound.iter().filter(|b| **b).count()
    }

    fn card_for<'a>(&'a self, target: &TargetKey) -> Option<&'a CardConfig> {
        self.cards
            .iter()
            .zip(&self.bound)
            .find(|(c, bound)| **bound && (&c.item == target || c.button.as_ref() == Some(target)))
            .map(|(c, _)| c)
    }

    /// Returns whether `target` belongs to a bound card.
    pub fn pointer_enter(&self, target: &TargetKey, palette: &Palette, engine: &mut MotionEngine) -> bool {
        let Some(card) = self.card_for(target) else {
            return false;
        };
        if &card.item == target {
            if let Some(wrapper) = &card.image_wrapper {
                engine.tween(quick(
                    wrapper,
                    PropSet::new().with(
                        Prop::BoxShadow,
                        Value::Shadow([20.0, 40.0, palette.shadow_alpha]),
                    ),
                    0.3,
                ));
                if let Some(image) = &card.image {
                    engine.tween(quick(image, PropSet::new().with(Prop::Scale, 1.05), 0.5));
                }
            }
        } else if let Some(button) = &card.button {
            engine.tween(quick(
                button,
                PropSet::new()
                    .with(Prop::BackgroundColor, Value::Color(palette.accent))
                    .with(Prop::Color, Value::Color(palette.background)),
                0.3,
            ));
        }
        true
    }

    pub fn pointer_leave(&self, target: &TargetKey, palette: &Palette, engine: &mut MotionEngine) -> bool {
        let Some(card) = self.card_for(target) else {
            return false;
        };
        if &card.item == target {
            if let Some(wrapper) = &card.image_wrapper {
                engine.tween(
                    quick(wrapper, PropSet::new().with(Prop::BoxShadow, Prop::BoxShadow.rest_value()), 0.3)
                        .clear_props([Prop::BoxShadow]),
                );
                if let Some(image) = &card.image {
                    engine.tween(quick(image, PropSet::new().with(Prop::Scale, 1.0), 0.5));
                }
            }
        } else if let Some(button) = &card.button {
            engine.tween(quick(
                button,
                PropSet::new()
                    .with(Prop::BackgroundColor, Value::Color(TRANSPARENT))
                    .with(Prop::Color, Value::Color(palette.accent)),
                0.3,
            ));
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeConfig;
    use crate::host::StaticDocument;
    use vitrine_motion_core::MotionEvent;

    fn setup() -> (HoverEffects, StaticDocument, CardConfig) {
        let card = CardConfig {
            item: "card".into(),
            image_wrapper: Some("card-wrap".into()),
            image: Some("card-img".into()),
            button: Some("card-btn".into()),
        };
        let doc = StaticDocument::new().with_ids([&card.item]);
        (HoverEffects::new(vec![card.clone()]), doc, card)
    }

    #[test]
    fn unbound_cards_ignore_pointer_events() {
        let (hover, _, card) = setup();
        let mut engine = MotionEngine::default();
        let palette = ThemeConfig::default().light;
        assert!(!hover.pointer_enter(&card.item, &palette, &mut engine));
        assert_eq!(engine.active_count(), 0);
    }

    #[test]
    fn rebinding_is_idempotent() {
        let (mut hover, doc, _) = setup();
        assert_eq!(hover.bind(&doc), 1);
        assert_eq!(hover.bind(&doc), 1);
        assert_eq!(hover.bound_count(), 1);
    }

    #[test]
    fn leave_during_enter_overwrites_and_clears_shadow() {
        let (mut hover, doc, card) = setup();
        hover.bind(&doc);
        let mut engine = MotionEngine::default();
        let palette = ThemeConfig::default().dark;
        let wrap = card.image_wrapper.clone().unwrap();

        hover.pointer_enter(&card.item, &palette, &mut engine);
        engine.update(0.1);
        hover.pointer_leave(&card.item, &palette, &mut engine);
        let out = engine.drain();
        let overwritten = out
            .events
            .iter()
            .filter(|e| matches!(e, MotionEvent::TweenOverwritten { .. }))
            .count();
        assert_eq!(overwritten, 2);

        engine.update(1.0);
        assert!(engine.stage().inline(&wrap, Prop::BoxShadow).is_none());
        assert_eq!(engine.stage().float(&card.image.unwrap(), Prop::Scale), 1.0);
    }

    #[test]
    fn button_takes_theme_colours() {
        let (mut hover, doc, card) = setup();
        hover.bind(&doc);
        let mut engine = MotionEngine::default();
        let palette = ThemeConfig::default().light;
        let btn = card.button.unwrap();
        hover.pointer_enter(&btn, &palette, &mut engine);
        engine.update(1.0);
        assert_eq!(
            engine.stage().style(&btn, Prop::BackgroundColor),
            Value::Color(palette.accent)
        );
        hover.pointer_leave(&btn, &palette, &mut engine);
        engine.update(1.0);
        assert_eq!(engine.stage().style(&btn, Prop::Color), Value::Color(palette.accent));
    }
}
