//! Stage: the engine's view of the document's visual state.
//!
//! Every target has inline styles, a class list and attributes. Each mutation
//! that actually changes something is journaled as a [`Change`] so a host can
//! replay it onto the live document.

use std::collections::{BTreeMap, BTreeSet};

use hashbrown::HashMap;
use indexmap::IndexMap;

use crate::ids::TargetKey;
use crate::outputs::Change;
use crate::value::{Prop, Value};

#[derive(Debug, Default, Clone)]
pub struct Node {
    styles: HashMap<Prop, Value>,
    classes: BTreeSet<String>,
    attrs: BTreeMap<String, String>,
    words: Option<Vec<String>>,
}

impl Node {
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn inline_styles(&self) -> impl Iterator<Item = (Prop, &Value)> {
        self.styles.iter().map(|(p, v)| (*p, v))
    }
}

#[derive(Debug, Default)]
pub struct Stage {
    nodes: IndexMap<TargetKey, Node>,
    journal: Vec<Change>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    fn node_mut(&mut self, target: &TargetKey) -> &mut Node {
        self.nodes.entry(target.clone()).or_default()
    }

    pub fn node(&self, target: &TargetKey) -> Option<&Node> {
        self.nodes.get(target)
    }

    pub fn targets(&self) -> impl Iterator<Item = &TargetKey> {
        self.nodes.keys()
    }

    /// Inline override, if one is set.
    pub fn inline(&self, target: &TargetKey, prop: Prop) -> Option<&Value> {
        self.nodes.get(target).and_then(|n| n.styles.get(&prop))
    }

    /// Effective value: the inline override or the property's rest value.
    pub fn style(&self, target: &TargetKey, prop: Prop) -> Value {
        self.inline(target, prop)
            .cloned()
            .unwrap_or_else(|| prop.rest_value())
    }

    /// Shorthand for numeric properties.
    pub fn float(&self, target: &TargetKey, prop: Prop) -> f32 {
        self.style(target, prop)
            .as_float()
            .unwrap_or_else(|| prop.rest_value().as_float().unwrap_or(0.0))
    }

    pub fn set_style(&mut self, target: &TargetKey, prop: Prop, value: Value) {
        let node = self.node_mut(target);
        if node.styles.get(&prop) == Some(&value) {
            return;
        }
        node.styles.insert(prop, value.clone());
        self.journal.push(Change::Style {
            target: target.clone(),
            prop,
            value: Some(value),
        });
    }

    pub fn clear_style(&mut self, target: &TargetKey, prop: Prop) {
        let removed = self
            .nodes
            .get_mut(target)
            .and_then(|n| n.styles.remove(&prop))
            .is_some();
        if removed {
            self.journal.push(Change::Style {
                target: target.clone(),
                prop,
                value: None,
            });
        }
    }

    pub fn has_class(&self, target: &TargetKey, class: &str) -> bool {
        self.nodes
            .get(target)
            .is_some_and(|n| n.classes.contains(class))
    }

    pub fn add_class(&mut self, target: &TargetKey, class: &str) {
        if self.node_mut(target).classes.insert(class.to_string()) {
            self.journal.push(Change::Class {
                target: target.clone(),
                class: class.to_string(),
                present: true,
            });
        }
    }

    pub fn remove_class(&mut self, target: &TargetKey, class: &str) {
        let removed = self
            .nodes
            .get_mut(target)
            .is_some_and(|n| n.classes.remove(class));
        if removed {
            self.journal.push(Change::Class {
                target: target.clone(),
                class: class.to_string(),
                present: false,
            });
        }
    }

    /// Flip `class`; returns whether it is present afterwards.
    pub fn toggle_class(&mut self, target: &TargetKey, class: &str) -> bool {
        if self.has_class(target, class) {
            self.remove_class(target, class);
            false
        } else {
            self.add_class(target, class);
            true
        }
    }

    pub fn attr(&self, target: &TargetKey, name: &str) -> Option<&str> {
        self.nodes
            .get(target)
            .and_then(|n| n.attrs.get(name))
            .map(String::as_str)
    }

    pub fn set_attr(&mut self, target: &TargetKey, name: &str, value: &str) {
        let node = self.node_mut(target);
        if node.attrs.get(name).map(String::as_str) == Some(value) {
            return;
        }
        node.attrs.insert(name.to_string(), value.to_string());
        self.journal.push(Change::Attr {
            target: target.clone(),
            name: name.to_string(),
            value: Some(value.to_string()),
        });
    }

    /// Wrap each word of `target` in its own span and return the span keys.
    /// Splitting again with the same words is a no-op.
    pub fn split_words(&mut self, target: &TargetKey, words: Vec<String>) -> Vec<TargetKey> {
        let keys = (0..words.len()).map(|i| target.span(i)).collect();
        let node = self.node_mut(target);
        if node.words.as_ref() == Some(&words) {
            return keys;
        }
        node.words = Some(words.clone());
        self.journal.push(Change::SplitWords {
            target: target.clone(),
            words,
        });
        keys
    }

    pub fn words(&self, target: &TargetKey) -> Option<&[String]> {
        self.nodes.get(target).and_then(|n| n.words.as_deref())
    }

    pub fn take_changes(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.journal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn journals_only_real_changes() {
        let mut stage = Stage::new();
        let t = TargetKey::from("hero");
        stage.set_style(&t, Prop::Opacity, Value::Float(0.0));
        stage.set_style(&t, Prop::Opacity, Value::Float(0.0));
        stage.clear_style(&t, Prop::Scale);
        stage.add_class(&t, "hidden");
        stage.add_class(&t, "hidden");
        stage.remove_class(&t, "active");
        assert_eq!(stage.take_changes().len(), 2);
        assert!(stage.take_changes().is_empty());
    }

    #[test]
    fn style_falls_back_to_rest_value() {
        let mut stage = Stage::new();
        let t = TargetKey::from("cta");
        assert_eq!(stage.float(&t, Prop::Scale), 1.0);
        stage.set_style(&t, Prop::Scale, Value::Float(0.8));
        assert_eq!(stage.float(&t, Prop::Scale), 0.8);
        stage.clear_style(&t, Prop::Scale);
        assert_eq!(stage.inline(&t, Prop::Scale), None);
        assert_eq!(stage.float(&t, Prop::Scale), 1.0);
    }

    #[test]
    fn toggle_class_reports_presence() {
        let mut stage = Stage::new();
        let t = TargetKey::from("mobile-nav");
        assert!(stage.toggle_class(&t, "hidden"));
        assert!(stage.has_class(&t, "hidden"));
        assert!(!stage.toggle_class(&t, "hidden"));
    }

    #[test]
    fn split_words_is_idempotent() {
        let mut stage = Stage::new();
        let t = TargetKey::from("subtitle");
        let words: Vec<String> = vec!["Crafted".into(), "by".into(), "hand".into()];
        let keys = stage.split_words(&t, words.clone());
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[2].as_str(), "subtitle#w2");
        let _ = stage.split_words(&t, words);
        assert_eq!(stage.take_changes().len(), 1);
    }
}
