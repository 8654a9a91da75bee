use crate::config::HudConfig;
use crate::timeline::{Easing, Timeline};

/// Where the banner is in its reveal/hide sequence.
///
/// Revealing → TextFading → Shown on the way in,
/// HidingText → HidingContainer → Hidden on the way out. Either sequence can
/// be entered from any point of the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerPhase {
    Hidden,
    Revealing,
    TextFading,
    Shown,
    HidingText,
    HidingContainer,
}

/// One live instance of the bottom banner.
///
/// Instances are thrown away whole when the panel opens and rebuilt from
/// scratch after it closes. `generation` identifies the instance so work
/// scheduled against an older one can be recognised and dropped.
#[derive(Debug, Clone)]
pub struct Banner {
    pub(super) generation: u64,
    /// Box shape and opacity.
    pub(super) container: Timeline,
    /// Label fade.
    pub(super) text: Timeline,
    pub(super) label: String,
    pub(super) interactive: bool,
    pub(super) phase: BannerPhase,
}

impl Banner {
    pub(super) fn new(generation: u64, config: &HudConfig) -> Self {
        Banner {
            generation,
            container: Timeline::new(config.reveal(), Easing::EaseOut),
            text: Timeline::new(config.text(), Easing::Ease),
            label: String::new(),
            interactive: false,
            phase: BannerPhase::Hidden,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn container(&self) -> &Timeline {
        &self.container
    }

    pub fn text(&self) -> &Timeline {
        &self.text
    }

    /// Text currently on the banner; empty once a hide has finished.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether clicks on the banner are honoured.
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn phase(&self) -> BannerPhase {
        self.phase
    }

    /// Stop both timelines for good. Their pending completions are dropped.
    pub(super) fn teardown(&mut self) {
        self.container.cancel();
        self.text.cancel();
        self.interactive = false;
    }
}
