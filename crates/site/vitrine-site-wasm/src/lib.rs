use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use vitrine_site::{Site, SiteConfig, UiEvent};

mod host;
mod logging;

pub use host::JsHost;

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Outputs go to JS as plain objects rather than `Map`s.
fn to_js<T: serde::Serialize>(value: &T, what: &str) -> Result<JsValue, JsError> {
    let ser = swb::Serializer::json_compatible();
    value
        .serialize(&ser)
        .map_err(|e| JsError::new(&format!("{what} error: {e}")))
}

#[wasm_bindgen]
pub struct VitrineSite {
    core: Site,
}

#[wasm_bindgen]
impl VitrineSite {
    /// Create the site. `config` is a JSON object matching `SiteConfig` (or
    /// undefined/null for the defaults); `host` is the callback object
    /// described in the `host` module.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, host: JsValue) -> Result<VitrineSite, JsError> {
        console_error_panic_hook::set_once();

        let cfg: SiteConfig = if jsvalue_is_undefined_or_null(&config) {
            SiteConfig::default()
        } else {
            let cfg: SiteConfig =
                swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?;
            cfg.validate()
                .map_err(|e| JsError::new(&format!("config error: {e}")))?;
            cfg
        };
        Ok(VitrineSite {
            core: Site::new(cfg, JsHost::new(host).into_host()),
        })
    }

    /// Run startup. Returns the `StartupReport` (mode and failed components).
    #[wasm_bindgen]
    pub fn start(&mut self) -> Result<JsValue, JsError> {
        let report = self.core.start();
        to_js(&report, "report")
    }

    /// Advance by `dt` seconds. Returns the frame's changes and events.
    #[wasm_bindgen]
    pub fn tick(&mut self, dt: f32) -> Result<JsValue, JsError> {
        let frame = self.core.tick(dt);
        to_js(&frame, "frame")
    }

    /// Deliver a UI event such as `{ type: "click", target: "theme-toggle" }`.
    #[wasm_bindgen]
    pub fn dispatch(&mut self, event: JsValue) -> Result<(), JsError> {
        let event: UiEvent =
            swb::from_value(event).map_err(|e| JsError::new(&format!("event error: {e}")))?;
        self.core
            .dispatch(event)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Re-read element geometry after layout changes.
    #[wasm_bindgen]
    pub fn refresh(&mut self) {
        self.core.refresh();
    }

    /// "full" or "reduced"; meaningful after `start`.
    #[wasm_bindgen(js_name = motionMode)]
    pub fn motion_mode(&self) -> String {
        if self.core.mode().is_reduced() {
            "reduced".into()
        } else {
            "full".into()
        }
    }

    #[wasm_bindgen]
    pub fn theme(&self) -> String {
        self.core.theme().as_str().to_string()
    }
}

/// Route `log` output to the browser console at `level` (`"error"` …
/// `"trace"`; anything else means `"warn"`).
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: Option<String>) {
    logging::install(logging::parse_level(level.as_deref()));
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
