#![allow(dead_code)]

use anyhow::Result;
use vitrine_site::motion::{Change, Cue, MotionEvent, Prop, Value};
use vitrine_site::{
    Host, MemoryPreferenceStore, Site, SiteConfig, SiteFrame, StaticDocument, StaticPlatform,
};

pub const FRAME: f32 = 1.0 / 60.0;

pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn config(name: &str) -> Result<SiteConfig> {
    let json = vitrine_test_fixtures::sites::json(name)?;
    Ok(SiteConfig::from_json_str(&json)?)
}

pub fn document(name: &str) -> Result<StaticDocument> {
    vitrine_test_fixtures::documents::load(name)
}

pub fn host(doc: &str, prefs: MemoryPreferenceStore, reduced: bool) -> Result<Host> {
    Ok(Host::new(
        document(doc)?,
        prefs,
        StaticPlatform {
            reduced_motion: reduced,
        },
    ))
}

/// Default site on the full page fixture, started.
pub fn started(cfg: SiteConfig, reduced: bool) -> Result<Site> {
    init_logs();
    let mut site = Site::new(cfg, host("full-page", MemoryPreferenceStore::new(), reduced)?);
    let report = site.start();
    assert!(report.failures.is_empty(), "{:?}", report.failures);
    Ok(site)
}

/// Tick in 60 fps frames for `secs`, collecting every frame.
pub fn run(site: &mut Site, secs: f32) -> Vec<SiteFrame> {
    let frames = (secs / FRAME).ceil() as usize;
    (0..frames).map(|_| site.tick(FRAME)).collect()
}

pub fn cues(frames: &[SiteFrame]) -> Vec<Cue> {
    frames
        .iter()
        .flat_map(|f| f.events.iter().filter_map(MotionEvent::cue).cloned())
        .collect()
}

pub fn texts_set_on(frames: &[SiteFrame], target: &str) -> Vec<String> {
    frames
        .iter()
        .flat_map(|f| f.changes.iter())
        .filter_map(|c| match c {
            Change::Style {
                target: t,
                prop: Prop::Text,
                value: Some(Value::Text(s)),
            } if t.as_str() == target => Some(s.clone()),
            _ => None,
        })
        .collect()
}
