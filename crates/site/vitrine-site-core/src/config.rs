//! Typed page configuration.
//!
//! Every element a controller touches is named here instead of being looked up
//! from markup at runtime. Defaults describe the reference landing page.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use vitrine_motion_core::{MotionConfig, TargetKey};

use crate::controllers::theme::Theme;
use crate::error::{Result, SiteError};
use crate::scroll::TriggerEdge;

fn key(s: &str) -> TargetKey {
    TargetKey::from(s)
}

fn numbered(prefix: &str, n: usize) -> Vec<TargetKey> {
    (1..=n).map(|i| TargetKey(format!("{prefix}-{i}"))).collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreloaderConfig {
    pub overlay: TargetKey,
    pub brand: TargetKey,
    pub dynamic_text: TargetKey,
    /// Word cycle, shown strictly in order.
    pub words: Vec<String>,
}

impl Default for PreloaderConfig {
    fn default() -> Self {
        Self {
            overlay: key("preloader"),
            brand: key("preloader-brand"),
            dynamic_text: key("preloader-dynamic-text"),
            words: ["Precision.", "Heritage.", "Legacy.", "Artistry.", "Timeless."]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntranceConfig {
    pub header: TargetKey,
    pub main: TargetKey,
    pub hero_background: TargetKey,
    /// Title words in reveal order.
    pub title_words: Vec<TargetKey>,
    pub subtitle: TargetKey,
    pub cta: TargetKey,
}

impl Default for EntranceConfig {
    fn default() -> Self {
        Self {
            header: key("header"),
            main: key("main"),
            hero_background: key("hero-parallax-bg"),
            title_words: numbered("hero-title-word", 2),
            subtitle: key("hero-subtitle"),
            cta: key("hero-cta"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParallaxConfig {
    pub trigger: TargetKey,
    pub target: TargetKey,
    /// `yPercent` reached at the end of the scrub range.
    pub y_percent: f32,
    pub start: String,
    pub end: String,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            trigger: key("hero"),
            target: key("hero-parallax-bg"),
            y_percent: 20.0,
            start: "top top".into(),
            end: "bottom top".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SectionConfig {
    pub trigger: TargetKey,
    pub targets: Vec<TargetKey>,
    /// Static sections are forced visible and never get a trigger.
    pub animate: bool,
    pub start: String,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            trigger: TargetKey::default(),
            targets: Vec::new(),
            animate: true,
            start: "top 80%".into(),
        }
    }
}

impl SectionConfig {
    fn page(id: &str, parts: &[&str], animate: bool) -> Self {
        Self {
            trigger: key(id),
            targets: parts.iter().map(|p| TargetKey(format!("{id}-{p}"))).collect(),
            animate,
            ..Self::default()
        }
    }
}

/// One collection card and the parts its hover effects drive.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardConfig {
    pub item: TargetKey,
    pub image_wrapper: Option<TargetKey>,
    pub image: Option<TargetKey>,
    pub button: Option<TargetKey>,
}

impl CardConfig {
    fn numbered(i: usize) -> Self {
        let item = format!("collection-item-{i}");
        Self {
            image_wrapper: Some(TargetKey(format!("{item}-wrapper"))),
            image: Some(TargetKey(format!("{item}-image"))),
            button: Some(TargetKey(format!("{item}-button"))),
            item: TargetKey(item),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TabConfig {
    pub category: String,
    pub tab: TargetKey,
    pub grid: TargetKey,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryConfig {
    pub tabs: Vec<TabConfig>,
    /// Category marked active in markup; the first tab when unset.
    pub initial: Option<String>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        let tabs = ["heritage", "modern", "limited"]
            .into_iter()
            .map(|c| TabConfig {
                category: c.to_string(),
                tab: TargetKey(format!("tab-{c}")),
                grid: key(c),
            })
            .collect();
        Self {
            tabs,
            initial: Some("heritage".into()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarouselConfig {
    pub slider: TargetKey,
    pub slides: Vec<TargetKey>,
    pub dots: Vec<TargetKey>,
    pub interval_ms: u32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            slider: key("testimonial-slider"),
            slides: numbered("testimonial-slide", 3),
            dots: numbered("testimonial-dot", 3),
            interval_ms: 7000,
        }
    }
}

impl CarouselConfig {
    pub fn interval_secs(&self) -> f64 {
        f64::from(self.interval_ms) / 1000.0
    }
}

/// Colours the hover effects read for one theme, RGBA in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub accent: [f32; 4],
    pub background: [f32; 4],
    /// Alpha of the card hover shadow.
    pub shadow_alpha: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeConfig {
    pub toggle: TargetKey,
    pub body: TargetKey,
    pub storage_key: String,
    /// Theme applied when nothing is stored.
    pub default_theme: Theme,
    pub light: Palette,
    pub dark: Palette,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            toggle: key("theme-toggle"),
            body: key("body"),
            storage_key: "theme".into(),
            default_theme: Theme::Light,
            light: Palette {
                accent: [0.722, 0.525, 0.043, 1.0],
                background: [0.98, 0.973, 0.953, 1.0],
                shadow_alpha: 0.1,
            },
            dark: Palette {
                accent: [0.831, 0.686, 0.216, 1.0],
                background: [0.071, 0.071, 0.078, 1.0],
                shadow_alpha: 0.4,
            },
        }
    }
}

impl ThemeConfig {
    pub fn palette(&self, theme: Theme) -> &Palette {
        match theme {
            Theme::Light => &self.light,
            Theme::Dark => &self.dark,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavConfig {
    pub panel: TargetKey,
    pub open_button: TargetKey,
    pub close_button: TargetKey,
    pub links: Vec<TargetKey>,
    /// Element whose scrolling is locked while the panel is open.
    pub body: TargetKey,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            panel: key("mobile-nav"),
            open_button: key("mobile-menu-button"),
            close_button: key("close-mobile-nav"),
            links: numbered("mobile-nav-link", 4),
            body: key("body"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub preloader: PreloaderConfig,
    pub entrance: EntranceConfig,
    pub parallax: ParallaxConfig,
    pub sections: Vec<SectionConfig>,
    pub collections: Vec<CardConfig>,
    pub gallery: GalleryConfig,
    pub carousel: CarouselConfig,
    pub theme: ThemeConfig,
    pub mobile_nav: NavConfig,
    pub motion: MotionConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            preloader: PreloaderConfig::default(),
            entrance: EntranceConfig::default(),
            parallax: ParallaxConfig::default(),
            sections: vec![
                SectionConfig::page("about", &["text", "image"], true),
                SectionConfig::page("collections", &["text"], false),
                SectionConfig::page("craftsmanship", &["text", "image", "cta"], true),
                SectionConfig::page("testimonials", &["text"], true),
                SectionConfig::page("contact", &["text", "cta"], true),
            ],
            collections: (1..=3).map(CardConfig::numbered).collect(),
            gallery: GalleryConfig::default(),
            carousel: CarouselConfig::default(),
            theme: ThemeConfig::default(),
            mobile_nav: NavConfig::default(),
            motion: MotionConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Parse and validate. Missing sections take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: SiteConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for tab in &self.gallery.tabs {
            if !seen.insert(tab.category.as_str()) {
                return Err(SiteError::InvalidConfig(format!(
                    "duplicate gallery category `{}`",
                    tab.category
                )));
            }
        }
        if let Some(initial) = &self.gallery.initial {
            if !seen.contains(initial.as_str()) {
                return Err(SiteError::UnknownCategory(initial.clone()));
            }
        }

        if self.carousel.dots.len() > self.carousel.slides.len() {
            return Err(SiteError::InvalidConfig(format!(
                "{} carousel dots for {} slides",
                self.carousel.dots.len(),
                self.carousel.slides.len()
            )));
        }
        if self.carousel.interval_ms == 0 {
            return Err(SiteError::InvalidConfig(
                "carousel interval must be positive".into(),
            ));
        }

        self.parallax.start.parse::<TriggerEdge>()?;
        self.parallax.end.parse::<TriggerEdge>()?;
        for section in &self.sections {
            section.start.parse::<TriggerEdge>()?;
        }

        let scale = self.motion.time_scale;
        if !scale.is_finite() || scale < 0.0 {
            return Err(SiteError::InvalidConfig(format!(
                "time scale must be a non-negative number, got {scale}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        SiteConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg = SiteConfig::from_json_str(
            r#"{ "preloader": { "words": ["One.", "Two."] }, "carousel": { "intervalMs": 5000 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.preloader.words, vec!["One.", "Two."]);
        assert_eq!(cfg.preloader.overlay.as_str(), "preloader");
        assert_eq!(cfg.carousel.interval_secs(), 5.0);
        assert_eq!(cfg.carousel.slides.len(), 3);
    }

    #[test]
    fn rejects_duplicate_categories_and_extra_dots() {
        let dup = r#"{ "gallery": { "tabs": [
            { "category": "a", "tab": "ta", "grid": "a" },
            { "category": "a", "tab": "tb", "grid": "b" }
        ], "initial": null } }"#;
        assert!(matches!(
            SiteConfig::from_json_str(dup),
            Err(SiteError::InvalidConfig(_))
        ));

        let dots = r#"{ "carousel": { "slides": ["s1"], "dots": ["d1", "d2"] } }"#;
        assert!(matches!(
            SiteConfig::from_json_str(dots),
            Err(SiteError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_bad_trigger_edges() {
        let bad = r#"{ "parallax": { "start": "middle nowhere" } }"#;
        assert!(matches!(
            SiteConfig::from_json_str(bad),
            Err(SiteError::InvalidTrigger(_))
        ));
    }
}
