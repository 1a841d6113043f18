//! Offcanvas panel model for IOC enrichment lookups.
//!
//! The original drove a spinner, a title node, and an accordion container by
//! fixed DOM ids, and let whichever response arrived last win. Here the
//! panel is an owned value; each lookup takes a generation token, and an
//! apply/fail carrying a superseded token is discarded instead of clobbering
//! newer state.

use tracing::debug;

use crate::render;
use crate::schemas::{IocDetails, TitleColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPhase {
    /// No lookup has run yet.
    Idle,
    /// Request in flight: spinner shown, content hidden, body cleared.
    Loading,
    /// Lookup completed and rendered.
    Ready,
    /// Lookup failed; fixed error title, empty body.
    Failed,
}

#[derive(Debug)]
pub struct IocPanel {
    phase: PanelPhase,
    spinner_visible: bool,
    content_visible: bool,
    title: String,
    title_color: Option<TitleColor>,
    body_html: String,
    generation: u64,
}

impl Default for IocPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl IocPanel {
    pub fn new() -> Self {
        Self {
            phase: PanelPhase::Idle,
            spinner_visible: false,
            content_visible: false,
            title: String::new(),
            title_color: None,
            body_html: String::new(),
            generation: 0,
        }
    }

    /// Start a lookup for `value`. Clears any previously rendered body, sets
    /// the title to the raw indicator value, and returns the generation
    /// token the eventual apply/fail must present.
    pub fn begin_lookup(&mut self, value: &str) -> u64 {
        self.generation += 1;
        self.phase = PanelPhase::Loading;
        self.spinner_visible = true;
        self.content_visible = false;
        self.title = value.to_string();
        self.title_color = None;
        self.body_html.clear();
        self.generation
    }

    /// Render a completed lookup. Returns false (and changes nothing) if a
    /// newer lookup has started since `generation` was issued.
    pub fn apply(&mut self, generation: u64, value: &str, details: &IocDetails) -> bool {
        if generation != self.generation {
            debug!("Discarding stale IOC response for {}", value);
            return false;
        }
        self.phase = PanelPhase::Ready;
        self.spinner_visible = false;
        self.content_visible = true;
        self.title = render::panel_title(value, &details.info);
        self.title_color = Some(details.response_code.title_color());
        self.body_html = render::render_ioc_body(details);
        true
    }

    /// Mark the current lookup failed: spinner hidden, content area revealed
    /// empty, fixed error title. Stale generations are discarded.
    pub fn fail(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            debug!("Discarding stale IOC failure");
            return false;
        }
        self.phase = PanelPhase::Failed;
        self.spinner_visible = false;
        self.content_visible = true;
        self.title = render::ERROR_TITLE.to_string();
        self.title_color = None;
        self.body_html.clear();
        true
    }

    pub fn phase(&self) -> PanelPhase {
        self.phase
    }

    pub fn spinner_visible(&self) -> bool {
        self.spinner_visible
    }

    pub fn content_visible(&self) -> bool {
        self.content_visible
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn title_color(&self) -> Option<TitleColor> {
        self.title_color
    }

    pub fn body_html(&self) -> &str {
        &self.body_html
    }
}
