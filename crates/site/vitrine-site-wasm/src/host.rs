//! Host callbacks supplied from JavaScript.
//!
//! The host object may provide any of:
//! `contains(id) -> bool`, `textContent(id) -> string | null`,
//! `bounds(id) -> { top, height } | null`, `viewportHeight() -> number`,
//! `getItem(key) -> string | null`, `setItem(key, value)`,
//! `prefersReducedMotion() -> bool`. Missing functions behave as if the
//! answer were empty.

use js_sys::{Function, Object, Reflect};
use serde_wasm_bindgen as swb;
use vitrine_site::motion::TargetKey;
use vitrine_site::{Bounds, Document, Host, Platform, PreferenceStore};
use wasm_bindgen::{JsCast, JsValue};

const DEFAULT_VIEWPORT: f32 = 800.0;

#[derive(Clone)]
pub struct JsHost {
    obj: Object,
}

impl JsHost {
    pub fn new(obj: JsValue) -> Self {
        let obj = obj.dyn_into::<Object>().unwrap_or_else(|_| Object::new());
        Self { obj }
    }

    pub fn into_host(self) -> Host {
        Host::new(self.clone(), self.clone(), self)
    }

    fn call(&self, name: &str, args: &[JsValue]) -> Option<JsValue> {
        let f = Reflect::get(&self.obj, &JsValue::from_str(name))
            .ok()?
            .dyn_into::<Function>()
            .ok()?;
        let result = match args {
            [] => f.call0(&self.obj),
            [a] => f.call1(&self.obj, a),
            [a, b] => f.call2(&self.obj, a, b),
            _ => return None,
        };
        match result {
            Ok(v) if !(v.is_undefined() || v.is_null()) => Some(v),
            Ok(_) => None,
            Err(err) => {
                log::warn!("host.{name} threw: {err:?}");
                None
            }
        }
    }

    fn call_id(&self, name: &str, target: &TargetKey) -> Option<JsValue> {
        self.call(name, &[JsValue::from_str(target.as_str())])
    }
}

impl Document for JsHost {
    fn contains(&self, target: &TargetKey) -> bool {
        self.call_id("contains", target)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    fn text_content(&self, target: &TargetKey) -> Option<String> {
        self.call_id("textContent", target).and_then(|v| v.as_string())
    }

    fn bounds(&self, target: &TargetKey) -> Option<Bounds> {
        self.call_id("bounds", target)
            .and_then(|v| swb::from_value(v).ok())
    }

    fn viewport_height(&self) -> f32 {
        self.call("viewportHeight", &[])
            .and_then(|v| v.as_f64())
            .map_or(DEFAULT_VIEWPORT, |h| h as f32)
    }
}

impl PreferenceStore for JsHost {
    fn get(&self, key: &str) -> Option<String> {
        self.call("getItem", &[JsValue::from_str(key)])
            .and_then(|v| v.as_string())
    }

    fn set(&mut self, key: &str, value: &str) {
        self.call("setItem", &[JsValue::from_str(key), JsValue::from_str(value)]);
    }
}

impl Platform for JsHost {
    fn prefers_reduced_motion(&self) -> bool {
        self.call("prefersReducedMotion", &[])
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}
