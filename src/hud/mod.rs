//! HUD — the contextual disclosure widget.
//!
//! A bottom banner names the nearest point of interest while the train is
//! close to it; clicking the banner swaps it for a full detail panel and
//! locks the train controls until the panel is closed again.

mod banner;
mod controller;
mod lock;
mod panel;

pub use banner::{Banner, BannerPhase};
pub use controller::{DisclosureController, DisclosureState};
pub use lock::ControlLock;
pub use panel::{Panel, PanelContent, PanelStage};
