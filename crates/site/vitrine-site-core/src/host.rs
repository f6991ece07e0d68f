//! External collaborators the controllers read from: the document geometry,
//! the persisted preference store and the platform capability query.

use hashbrown::HashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use vitrine_motion_core::TargetKey;

/// Document-relative vertical extent of an element, in px.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub top: f32,
    pub height: f32,
}

pub trait Document {
    fn contains(&self, target: &TargetKey) -> bool;
    fn text_content(&self, target: &TargetKey) -> Option<String>;
    fn bounds(&self, target: &TargetKey) -> Option<Bounds>;
    fn viewport_height(&self) -> f32;
}

/// Process-wide key → string mapping that survives reloads.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

pub trait Platform {
    fn prefers_reduced_motion(&self) -> bool;
}

/// Everything the site needs from its embedder.
pub struct Host {
    pub document: Box<dyn Document>,
    pub prefs: Box<dyn PreferenceStore>,
    pub platform: Box<dyn Platform>,
}

impl Host {
    pub fn new(
        document: impl Document + 'static,
        prefs: impl PreferenceStore + 'static,
        platform: impl Platform + 'static,
    ) -> Self {
        Self {
            document: Box::new(document),
            prefs: Box::new(prefs),
            platform: Box::new(platform),
        }
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticElement {
    pub text: Option<String>,
    pub top: f32,
    pub height: f32,
}

/// Fixed document snapshot, loadable from JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StaticDocument {
    pub viewport_height: f32,
    pub elements: IndexMap<String, StaticElement>,
}

impl Default for StaticDocument {
    fn default() -> Self {
        Self {
            viewport_height: 800.0,
            elements: IndexMap::new(),
        }
    }
}

impl StaticDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn with(mut self, id: impl Into<String>, element: StaticElement) -> Self {
        self.elements.insert(id.into(), element);
        self
    }

    /// Add every id with an empty element.
    pub fn with_ids<'a>(mut self, ids: impl IntoIterator<Item = &'a TargetKey>) -> Self {
        for id in ids {
            self.elements.entry(id.0.clone()).or_default();
        }
        self
    }

    pub fn remove(&mut self, id: &str) -> Option<StaticElement> {
        self.elements.shift_remove(id)
    }
}

impl Document for StaticDocument {
    fn contains(&self, target: &TargetKey) -> bool {
        self.elements.contains_key(target.as_str())
    }

    fn text_content(&self, target: &TargetKey) -> Option<String> {
        let el = self.elements.get(target.as_str())?;
        Some(el.text.clone().unwrap_or_default())
    }

    fn bounds(&self, target: &TargetKey) -> Option<Bounds> {
        self.elements.get(target.as_str()).map(|el| Bounds {
            top: el.top,
            height: el.height,
        })
    }

    fn viewport_height(&self) -> f32 {
        self.viewport_height
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryPreferenceStore {
    values: HashMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct StaticPlatform {
    pub reduced_motion: bool,
}

impl StaticPlatform {
    pub fn reduced() -> Self {
        Self {
            reduced_motion: true,
        }
    }
}

impl Platform for StaticPlatform {
    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}
