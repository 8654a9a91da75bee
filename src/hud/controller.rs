use std::time::Duration;

use log::{debug, info, trace};

use crate::config::HudConfig;
use crate::proximity;
use crate::timeline::{Direction, Edge};
use crate::types::Trigger;

use super::banner::{Banner, BannerPhase};
use super::lock::ControlLock;
use super::panel::{Panel, PanelContent, PanelStage};

/// Composite widget state, derived from the banner and panel targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisclosureState {
    Closed,
    Peeking,
    Expanded,
}

/// A `show` deferred to the tick after the banner was rebuilt.
#[derive(Debug, Clone)]
struct Replay {
    generation: u64,
    label: String,
}

/// Owns the banner and panel and decides when each opens and closes.
///
/// Continuous input arrives through [`update`](Self::update) once per tick;
/// discrete input through [`on_banner_click`](Self::on_banner_click) and
/// [`on_escape_key`](Self::on_escape_key). Animations progress only in
/// [`tick`](Self::tick), which also delivers their completion signals.
#[derive(Debug)]
pub struct DisclosureController {
    config: HudConfig,
    want_open: bool,
    panel_open: bool,
    current_label: String,
    banner: Option<Banner>,
    generations: u64,
    panel: Panel,
    lock: ControlLock,
    replay: Option<Replay>,
}

impl DisclosureController {
    pub fn new(config: HudConfig) -> Self {
        let panel = Panel::new(&config);
        let mut controller = DisclosureController {
            config,
            want_open: false,
            panel_open: false,
            current_label: String::new(),
            banner: None,
            generations: 0,
            panel,
            lock: ControlLock::default(),
            replay: None,
        };
        controller.ensure_banner();
        controller
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &HudConfig {
        &self.config
    }

    pub fn state(&self) -> DisclosureState {
        match (self.want_open, self.panel_open) {
            (_, true) => DisclosureState::Expanded,
            (true, false) => DisclosureState::Peeking,
            (false, false) => DisclosureState::Closed,
        }
    }

    pub fn want_open(&self) -> bool {
        self.want_open
    }

    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    /// Name currently shown, or the last one shown.
    pub fn current_label(&self) -> &str {
        &self.current_label
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn banner_present(&self) -> bool {
        self.banner.is_some()
    }

    pub fn is_interactive(&self) -> bool {
        self.banner.as_ref().is_some_and(Banner::is_interactive)
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn control_lock(&self) -> ControlLock {
        self.lock
    }

    /// Polled by the motion model every tick.
    pub fn are_controls_enabled(&self) -> bool {
        !self.lock.is_engaged()
    }

    // -----------------------------------------------------------------------
    // Continuous driver
    // -----------------------------------------------------------------------

    /// Reconcile the banner with the train's position. Called once per tick.
    ///
    /// Opens below `show_threshold`, closes above `hide_threshold`; inside the
    /// band the banner keeps its current state and only relabels when a
    /// different trigger becomes the nearest.
    pub fn update<'a, I>(&mut self, train_x: f64, triggers: I)
    where
        I: IntoIterator<Item = &'a Trigger>,
    {
        if self.panel_open {
            return;
        }
        let shown_label = match &self.banner {
            Some(banner) => banner.label.clone(),
            None => return,
        };

        let Some(nearest) = proximity::nearest(train_x, triggers) else {
            if self.want_open {
                self.hide();
            }
            return;
        };

        if !self.want_open {
            if nearest.distance < self.config.show_threshold {
                self.show(&nearest.trigger.name);
            }
        } else if nearest.distance > self.config.hide_threshold {
            self.hide();
        } else if nearest.trigger.name != shown_label {
            self.show(&nearest.trigger.name);
        }
    }

    /// Advance every timeline by `dt` and act on the ones that settled.
    ///
    /// Each completion is handled before the next timeline advances, so a
    /// handler that restarts a later timeline never sees that timeline's
    /// previous run settle afterwards.
    pub fn tick(&mut self, dt: Duration) {
        if let Some(replay) = self.replay.take() {
            self.run_replay(replay);
        }

        if let Some(edge) = self.banner.as_mut().and_then(|b| b.container.advance(dt)) {
            trace!("banner container settled at {edge:?}");
            self.container_settled(edge);
        }
        if let Some(edge) = self.banner.as_mut().and_then(|b| b.text.advance(dt)) {
            trace!("banner text settled at {edge:?}");
            self.text_settled(edge);
        }
        if let Some(edge) = self.panel.curtain.advance(dt) {
            trace!("curtain settled at {edge:?}");
            self.curtain_settled(edge);
        }
        // The header fade is fire-and-forget in both directions.
        self.panel.header.advance(dt);
    }

    // -----------------------------------------------------------------------
    // Banner
    // -----------------------------------------------------------------------

    /// Open the banner on `name`, rebuilding it if it is absent.
    pub fn show(&mut self, name: &str) {
        self.current_label = name.to_string();
        self.want_open = true;
        if self.panel_open {
            // Picked up by the replay once the panel has closed.
            return;
        }
        self.ensure_banner();

        if let Some(banner) = &mut self.banner {
            debug!("banner #{} show {name:?}", banner.generation);
            banner.label = name.to_string();
            banner.phase = BannerPhase::Revealing;
            banner.container.play(Direction::Forward);
        }
    }

    /// Close the banner: text fades out first, then the box collapses.
    pub fn hide(&mut self) {
        if !self.want_open {
            return;
        }
        self.want_open = false;

        if self.panel_open {
            self.collapse_panel();
            return;
        }

        let Some(banner) = &mut self.banner else {
            return;
        };
        debug!("banner #{} hide", banner.generation);
        if !banner.text.at_start() {
            banner.phase = BannerPhase::HidingText;
            banner.text.play(Direction::Backward);
        } else {
            banner.phase = BannerPhase::HidingContainer;
            banner.container.play(Direction::Backward);
        }
    }

    fn container_settled(&mut self, edge: Edge) {
        let want_open = self.want_open;
        let Some(banner) = &mut self.banner else {
            return;
        };

        match edge {
            Edge::End => {
                if !want_open {
                    return;
                }
                if banner.text.at_end() {
                    banner.phase = BannerPhase::Shown;
                } else {
                    banner.phase = BannerPhase::TextFading;
                    banner.text.play(Direction::Forward);
                }
                banner.interactive = true;
                self.panel.content = Some(PanelContent::for_trigger(&banner.label, &self.config));
                debug!("banner #{} interactive on {:?}", banner.generation, banner.label);
            }
            Edge::Start => {
                if !want_open {
                    banner.interactive = false;
                    banner.label.clear();
                    banner.phase = BannerPhase::Hidden;
                    debug!("banner #{} hidden", banner.generation);
                }
                banner.container.rewind();
            }
        }
    }

    fn text_settled(&mut self, edge: Edge) {
        let want_open = self.want_open;
        let Some(banner) = &mut self.banner else {
            return;
        };

        match edge {
            Edge::End => {
                if banner.phase == BannerPhase::TextFading {
                    banner.phase = BannerPhase::Shown;
                }
            }
            Edge::Start => {
                if banner.text.is_playing() {
                    return;
                }
                banner.text.rewind();
                if !want_open {
                    banner.phase = BannerPhase::HidingContainer;
                    banner.container.play(Direction::Backward);
                }
            }
        }
    }

    fn ensure_banner(&mut self) {
        if self.banner.is_none() {
            self.generations += 1;
            debug!("banner #{} built", self.generations);
            self.banner = Some(Banner::new(self.generations, &self.config));
        }
    }

    fn destroy_banner(&mut self) {
        if let Some(mut banner) = self.banner.take() {
            banner.teardown();
            debug!("banner #{} torn down", banner.generation);
        }
    }

    fn run_replay(&mut self, replay: Replay) {
        let current = self.banner.as_ref().map(Banner::generation);
        if self.panel_open || current != Some(replay.generation) {
            trace!("dropping replay for banner #{}", replay.generation);
            return;
        }
        if !replay.label.is_empty() {
            self.show(&replay.label);
        }
    }

    // -----------------------------------------------------------------------
    // Panel
    // -----------------------------------------------------------------------

    /// Open the detail panel, locking controls and tearing the banner down.
    pub fn expand_panel(&mut self) {
        if self.panel_open {
            return;
        }
        self.panel_open = true;
        self.lock.engage();

        if let Some(banner) = &self.banner {
            if !banner.label.is_empty() {
                self.current_label = banner.label.clone();
            }
        }
        self.destroy_banner();
        self.replay = None;
        if !self.current_label.is_empty() {
            self.panel.content = Some(PanelContent::for_trigger(&self.current_label, &self.config));
        }

        info!("panel expand on {:?}", self.current_label);
        self.panel.interactive = true;
        self.panel.stage = PanelStage::Opening;
        self.panel
            .curtain
            .play_over(Direction::Forward, self.config.curtain_open());
    }

    /// Close the detail panel. The banner comes back once the curtain is down.
    pub fn collapse_panel(&mut self) {
        if !self.panel_open {
            return;
        }
        self.panel_open = false;

        info!("panel collapse");
        self.panel.stage = PanelStage::Closing;
        self.panel
            .header
            .play_over(Direction::Backward, self.config.header_out());
        self.panel
            .curtain
            .play_over(Direction::Backward, self.config.curtain_close());
    }

    fn curtain_settled(&mut self, edge: Edge) {
        match edge {
            Edge::End => {
                if !self.panel_open {
                    return;
                }
                self.panel.stage = PanelStage::Open;
                self.panel.title = self.current_label.clone();
                self.panel
                    .header
                    .play_over(Direction::Forward, self.config.header_in());
            }
            Edge::Start => {
                if self.panel_open {
                    return;
                }
                self.finish_collapse();
            }
        }
    }

    fn finish_collapse(&mut self) {
        self.panel.interactive = false;
        self.panel.stage = PanelStage::Closed;
        self.lock.release();

        self.ensure_banner();
        if let Some(banner) = &self.banner {
            self.replay = Some(Replay {
                generation: banner.generation,
                label: self.current_label.clone(),
            });
        }
    }

    // -----------------------------------------------------------------------
    // Discrete input
    // -----------------------------------------------------------------------

    /// Expanded ⇄ Peeking. Ignored while the banner does not take clicks.
    pub fn toggle(&mut self) {
        if self.panel_open {
            self.collapse_panel();
        } else if self.want_open && self.is_interactive() {
            self.expand_panel();
        } else {
            trace!("click ignored: banner not interactive");
        }
    }

    pub fn on_banner_click(&mut self) {
        self.toggle();
    }

    pub fn on_escape_key(&mut self) {
        if self.panel_open {
            self.collapse_panel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> DisclosureController {
        DisclosureController::new(HudConfig::default())
    }

    fn run(c: &mut DisclosureController, ms: u64) {
        for _ in 0..ms / 10 {
            c.tick(Duration::from_millis(10));
        }
    }

    fn shown(name: &str) -> DisclosureController {
        let mut c = controller();
        c.show(name);
        run(&mut c, 1000);
        c
    }

    #[test]
    fn starts_closed_with_banner_built() {
        let c = controller();
        assert_eq!(c.state(), DisclosureState::Closed);
        assert!(c.banner_present());
        assert!(!c.is_interactive());
        assert!(c.are_controls_enabled());
        assert_eq!(c.panel().stage(), PanelStage::Closed);
    }

    #[test]
    fn reveal_runs_container_then_text_then_clicks() {
        let mut c = controller();
        c.show("First Stop");
        run(&mut c, 300);
        let b = c.banner().unwrap();
        assert_eq!(b.phase(), BannerPhase::Revealing);
        assert!(!b.is_interactive());
        assert!(b.text().at_start());

        run(&mut c, 300);
        let b = c.banner().unwrap();
        assert_eq!(b.phase(), BannerPhase::TextFading);
        assert!(b.is_interactive());
        assert_eq!(c.panel().content().unwrap().body, "Info about First Stop goes here.");

        run(&mut c, 400);
        assert_eq!(c.banner().unwrap().phase(), BannerPhase::Shown);
    }

    #[test]
    fn repeated_show_does_not_restart_the_reveal() {
        let mut c = shown("First Stop");
        c.show("First Stop");
        let b = c.banner().unwrap();
        assert!(b.container().at_end());
        assert_eq!(c.current_label(), "First Stop");
        assert!(c.want_open());

        run(&mut c, 10);
        let b = c.banner().unwrap();
        assert!(b.container().at_end());
        assert!(b.text().at_end());
        assert!(b.is_interactive());
        assert_eq!(b.phase(), BannerPhase::Shown);
    }

    #[test]
    fn hide_fades_text_before_collapsing_box() {
        let mut c = shown("First Stop");
        c.hide();
        assert_eq!(c.state(), DisclosureState::Closed);
        assert_eq!(c.banner().unwrap().phase(), BannerPhase::HidingText);

        run(&mut c, 400);
        let b = c.banner().unwrap();
        assert_eq!(b.phase(), BannerPhase::HidingContainer);
        assert!(b.text().at_start());
        assert!(!b.container().at_end());
        // Interactivity and label survive until the box is gone.
        assert!(b.is_interactive());
        assert_eq!(b.label(), "First Stop");

        run(&mut c, 700);
        let b = c.banner().unwrap();
        assert_eq!(b.phase(), BannerPhase::Hidden);
        assert!(!b.is_interactive());
        assert_eq!(b.label(), "");
        assert_eq!(c.current_label(), "First Stop");
    }

    #[test]
    fn show_arriving_mid_hide_takes_over() {
        let mut c = shown("First Stop");
        c.hide();
        run(&mut c, 100);
        c.show("First Stop");
        run(&mut c, 1000);

        let b = c.banner().unwrap();
        assert_eq!(b.phase(), BannerPhase::Shown);
        assert!(b.container().at_end());
        assert!(b.text().at_end());
        assert!(b.is_interactive());
        assert_eq!(b.label(), "First Stop");
    }

    #[test]
    fn show_on_the_tick_the_text_fade_out_ends() {
        let mut c = shown("First Stop");
        c.hide();
        // One 10 ms tick of the 350 ms fade-out remains.
        run(&mut c, 340);
        assert_eq!(c.banner().unwrap().phase(), BannerPhase::HidingText);
        c.show("First Stop");

        c.tick(Duration::from_millis(10));
        let b = c.banner().unwrap();
        assert_eq!(b.phase(), BannerPhase::TextFading);
        assert!(b.text().is_playing());

        run(&mut c, 1000);
        let b = c.banner().unwrap();
        assert_eq!(b.phase(), BannerPhase::Shown);
        assert!(b.text().at_end());
        assert!(b.container().at_end());
    }

    #[test]
    fn show_on_the_tick_the_box_collapse_ends() {
        let mut c = shown("First Stop");
        c.hide();
        // 350 ms text fade-out, then one 10 ms tick of the 600 ms collapse left.
        run(&mut c, 940);
        let b = c.banner().unwrap();
        assert_eq!(b.phase(), BannerPhase::HidingContainer);
        assert!(!b.container().at_start());
        c.show("First Stop");

        run(&mut c, 1000);
        let b = c.banner().unwrap();
        assert_eq!(b.phase(), BannerPhase::Shown);
        assert!(b.container().at_end());
        assert!(b.text().at_end());
        assert!(b.is_interactive());
        assert_eq!(b.label(), "First Stop");
    }

    #[test]
    fn show_right_after_the_box_collapsed_reveals_again() {
        let mut c = shown("First Stop");
        c.hide();
        run(&mut c, 950);
        assert_eq!(c.banner().unwrap().phase(), BannerPhase::Hidden);
        c.show("Second Stop");

        run(&mut c, 1000);
        let b = c.banner().unwrap();
        assert_eq!(b.phase(), BannerPhase::Shown);
        assert!(b.text().at_end());
        assert_eq!(b.label(), "Second Stop");
    }

    #[test]
    fn expand_right_after_a_relabel_uses_the_new_name() {
        let mut c = shown("First Stop");
        c.show("Second Stop");
        c.on_banner_click();

        assert!(c.panel_open());
        let content = c.panel().content().unwrap();
        assert_eq!(content.title, "Second Stop");
        assert_eq!(content.body, "Info about Second Stop goes here.");

        run(&mut c, 600);
        assert_eq!(c.panel().title(), "Second Stop");
    }

    #[test]
    fn hide_during_reveal_skips_reveal_follow_up() {
        let mut c = controller();
        c.show("First Stop");
        run(&mut c, 300);
        c.hide();
        run(&mut c, 1000);

        let b = c.banner().unwrap();
        assert_eq!(b.phase(), BannerPhase::Hidden);
        assert!(!b.is_interactive());
        assert!(b.text().at_start());
        assert!(c.panel().content().is_none());
    }

    #[test]
    fn hide_when_closed_is_a_no_op() {
        let mut c = controller();
        c.hide();
        assert_eq!(c.banner().unwrap().phase(), BannerPhase::Hidden);
        assert!(!c.banner().unwrap().container().is_playing());
    }

    #[test]
    fn click_is_ignored_until_the_reveal_finishes() {
        let mut c = controller();
        c.on_banner_click();
        assert!(!c.panel_open());

        c.show("First Stop");
        run(&mut c, 200);
        c.on_banner_click();
        assert!(!c.panel_open());
    }

    #[test]
    fn escape_without_panel_does_nothing() {
        let mut c = shown("First Stop");
        c.on_escape_key();
        assert_eq!(c.state(), DisclosureState::Peeking);
    }

    #[test]
    fn expand_tears_down_banner_and_titles_panel() {
        let mut c = shown("First Stop");
        let first = c.banner().unwrap().generation();
        c.on_banner_click();

        assert_eq!(c.state(), DisclosureState::Expanded);
        assert!(!c.banner_present());
        assert!(!c.are_controls_enabled());
        assert_eq!(c.panel().stage(), PanelStage::Opening);

        run(&mut c, 500);
        assert_eq!(c.panel().stage(), PanelStage::Open);
        assert_eq!(c.panel().title(), "First Stop");
        assert!(c.panel().header().is_playing() || c.panel().header().at_end());

        c.on_escape_key();
        run(&mut c, 300);
        assert!(c.are_controls_enabled());
        let rebuilt = c.banner().unwrap();
        assert!(rebuilt.generation() > first);
        assert_eq!(rebuilt.phase(), BannerPhase::Revealing);
        assert_eq!(rebuilt.label(), "First Stop");
    }

    #[test]
    fn update_is_ignored_while_panel_is_open() {
        let triggers = vec![Trigger::new("First Stop", 10.0)];
        let mut c = shown("First Stop");
        c.expand_panel();
        c.update(40.0, &triggers);
        assert!(c.want_open());
        assert!(c.panel_open());
    }

    #[test]
    fn collapse_before_curtain_opens_still_cleans_up() {
        let mut c = shown("First Stop");
        c.expand_panel();
        c.collapse_panel();
        assert!(!c.are_controls_enabled());

        c.tick(Duration::from_millis(10));
        assert!(c.are_controls_enabled());
        assert!(c.banner_present());
        assert_eq!(c.panel().stage(), PanelStage::Closed);
        assert!(!c.panel().is_interactive());

        c.tick(Duration::from_millis(10));
        let b = c.banner().unwrap();
        assert_eq!(b.phase(), BannerPhase::Revealing);
        assert_eq!(b.label(), "First Stop");
    }

    #[test]
    fn replay_for_a_torn_down_banner_is_dropped() {
        let mut c = shown("First Stop");
        c.expand_panel();
        c.collapse_panel();
        c.tick(Duration::from_millis(10));
        assert!(c.banner_present());

        // Re-expanding before the replay tick discards the rebuilt banner.
        c.expand_panel();
        c.tick(Duration::from_millis(10));
        assert!(!c.banner_present());
        assert!(c.panel_open());
    }

    #[test]
    fn expand_while_curtain_closes_reverses_it() {
        let mut c = shown("First Stop");
        c.expand_panel();
        run(&mut c, 500);
        c.collapse_panel();
        run(&mut c, 100);
        c.expand_panel();
        run(&mut c, 600);

        assert_eq!(c.panel().stage(), PanelStage::Open);
        assert!(!c.are_controls_enabled());
        assert!(!c.banner_present());
    }
}
