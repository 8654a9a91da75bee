use crate::config::HudConfig;
use crate::timeline::{Easing, Timeline};

/// Text shown inside the detail panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelContent {
    pub title: String,
    pub body: String,
}

impl PanelContent {
    pub fn for_trigger(name: &str, config: &HudConfig) -> Self {
        PanelContent {
            title: name.to_string(),
            body: config.detail_for(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelStage {
    Closed,
    Opening,
    Open,
    Closing,
}

/// The expandable detail view. Built once and kept for the controller's
/// lifetime; only its transitions toggle.
#[derive(Debug, Clone)]
pub struct Panel {
    /// Top-down reveal of the panel body.
    pub(super) curtain: Timeline,
    /// Title chip above the panel.
    pub(super) header: Timeline,
    pub(super) title: String,
    pub(super) content: Option<PanelContent>,
    pub(super) interactive: bool,
    pub(super) stage: PanelStage,
}

impl Panel {
    pub(super) fn new(config: &HudConfig) -> Self {
        Panel {
            curtain: Timeline::new(config.curtain_open(), Easing::SnapOut),
            header: Timeline::new(config.header_in(), Easing::EaseOut),
            title: String::new(),
            content: None,
            interactive: false,
            stage: PanelStage::Closed,
        }
    }

    pub fn curtain(&self) -> &Timeline {
        &self.curtain
    }

    pub fn header(&self) -> &Timeline {
        &self.header
    }

    /// Title chip text, set once the curtain has fully opened.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Detail content for the most recently revealed banner label.
    pub fn content(&self) -> Option<&PanelContent> {
        self.content.as_ref()
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn stage(&self) -> PanelStage {
        self.stage
    }
}
