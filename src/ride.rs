//! Ride — one session of the scene with its HUD.

use std::time::Duration;

use crate::config::TracksideConfig;
use crate::hud::DisclosureController;
use crate::proximity::{self, Nearest};
use crate::scene::Scene;

#[derive(Debug)]
pub struct Ride {
    scene: Scene,
    hud: DisclosureController,
}

impl Ride {
    pub fn new(config: &TracksideConfig) -> Self {
        Ride {
            scene: Scene::new(&config.scene),
            hud: DisclosureController::new(config.hud.clone()),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn hud(&self) -> &DisclosureController {
        &self.hud
    }

    pub fn hud_mut(&mut self) -> &mut DisclosureController {
        &mut self.hud
    }

    /// Advance one frame: motion, triggers, HUD reconciliation, then the
    /// HUD's timelines and their completions.
    pub fn step(&mut self, dt: Duration, axis: f64) {
        self.scene.step(dt, axis, self.hud.are_controls_enabled());
        self.hud.update(self.scene.train().x(), self.scene.triggers());
        self.hud.tick(dt);
    }

    pub fn nearest(&self) -> Option<Nearest<'_>> {
        proximity::nearest(self.scene.train().x(), self.scene.triggers())
    }
}
