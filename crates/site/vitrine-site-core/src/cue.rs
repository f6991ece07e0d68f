//! Follow-up work requested through engine and scroll cues.
//!
//! Cues travel through the motion engine as opaque strings; they use a small
//! slash-path convention:
//!
//! - `choreo/preloader/done`, `choreo/entrance/done`
//! - `reveal/<section index>`
//! - `gallery/hidden/<category>`, `gallery/shown/<category>`
//! - `carousel/faded/<slide index>`
//! - `nav/opened`, `nav/closed`

use std::fmt;
use std::str::FromStr;

use vitrine_motion_core::Cue;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SiteCue {
    PreloaderDone,
    EntranceDone,
    Reveal(usize),
    GalleryHidden(String),
    GalleryShown(String),
    CarouselFaded(usize),
    NavOpened,
    NavClosed,
}

impl fmt::Display for SiteCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteCue::PreloaderDone => f.write_str("choreo/preloader/done"),
            SiteCue::EntranceDone => f.write_str("choreo/entrance/done"),
            SiteCue::Reveal(i) => write!(f, "reveal/{i}"),
            SiteCue::GalleryHidden(c) => write!(f, "gallery/hidden/{c}"),
            SiteCue::GalleryShown(c) => write!(f, "gallery/shown/{c}"),
            SiteCue::CarouselFaded(i) => write!(f, "carousel/faded/{i}"),
            SiteCue::NavOpened => f.write_str("nav/opened"),
            SiteCue::NavClosed => f.write_str("nav/closed"),
        }
    }
}

impl FromStr for SiteCue {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.splitn(3, '/').collect();
        let index = |p: &str| p.parse::<usize>().map_err(|_| ());
        match parts.as_slice() {
            ["choreo", "preloader", "done"] => Ok(SiteCue::PreloaderDone),
            ["choreo", "entrance", "done"] => Ok(SiteCue::EntranceDone),
            ["reveal", i] => Ok(SiteCue::Reveal(index(i)?)),
            ["gallery", "hidden", c] => Ok(SiteCue::GalleryHidden((*c).to_string())),
            ["gallery", "shown", c] => Ok(SiteCue::GalleryShown((*c).to_string())),
            ["carousel", "faded", i] => Ok(SiteCue::CarouselFaded(index(i)?)),
            ["nav", "opened"] => Ok(SiteCue::NavOpened),
            ["nav", "closed"] => Ok(SiteCue::NavClosed),
            _ => Err(()),
        }
    }
}

impl From<SiteCue> for Cue {
    fn from(cue: SiteCue) -> Self {
        Cue::new(cue.to_string())
    }
}

impl SiteCue {
    pub fn parse(cue: &Cue) -> Option<SiteCue> {
        cue.as_str().parse().ok()
    }
}
