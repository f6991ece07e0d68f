pub mod carousel;
pub mod choreo;
pub mod gallery;
pub mod hover;
pub mod nav;
pub mod reveal;
pub mod theme;

pub use carousel::{Carousel, CarouselState};
pub use choreo::{ChoreoStage, Choreographer};
pub use gallery::CategoryTabs;
pub use hover::HoverEffects;
pub use nav::{MobileNav, NavState};
pub use reveal::SectionReveals;
pub use theme::{Theme, ThemeToggle};

/// Work a controller asks the site to do after it returns.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Followup {
    /// Geometry changed: recompute scroll triggers and re-bind hover effects.
    RefreshLayout,
}

/// What a site timer fires for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerTag {
    CarouselAdvance,
}
