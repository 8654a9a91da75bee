//! Scene — the world the HUD reacts to.
//!
//! A train runs along a wrapping track past points of interest. The scene
//! knows nothing about the HUD; it only hands out the train position and
//! the list of triggers.

mod building;
mod poi;
mod train;

pub use building::Building;
pub use poi::Poi;
pub use train::{Train, approach};

use std::time::Duration;

use crate::config::SceneConfig;
use crate::types::Trigger;

#[derive(Debug, Clone)]
pub struct Scene {
    track_width: f64,
    train: Train,
    pois: Vec<Poi>,
}

impl Scene {
    pub fn new(config: &SceneConfig) -> Self {
        Scene {
            track_width: config.track_width,
            train: Train::new(config.train.clone(), config.track_width),
            pois: config
                .pois
                .iter()
                .map(|poi| Poi::new(poi, &config.pop))
                .collect(),
        }
    }

    pub fn track_width(&self) -> f64 {
        self.track_width
    }

    pub fn train(&self) -> &Train {
        &self.train
    }

    pub fn train_mut(&mut self) -> &mut Train {
        &mut self.train
    }

    pub fn pois(&self) -> &[Poi] {
        &self.pois
    }

    pub fn triggers(&self) -> impl Iterator<Item = &Trigger> {
        self.pois.iter().map(Poi::trigger)
    }

    /// Move the train, then let every point of interest react to it.
    pub fn step(&mut self, dt: Duration, axis: f64, controls_enabled: bool) {
        let dt = dt.as_secs_f64();
        self.train.update(dt, axis, controls_enabled);
        let x = self.train.x();
        for poi in &mut self.pois {
            poi.update(x, dt);
        }
    }
}
