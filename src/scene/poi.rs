use crate::config::{PoiConfig, PopConfig};
use crate::types::{Color, Trigger};

use super::building::Building;

/// A point of interest: a trigger on the track plus its building.
#[derive(Debug, Clone)]
pub struct Poi {
    trigger: Trigger,
    color: Option<Color>,
    building: Building,
    radius: f64,
    cooldown_secs: f64,
    /// Seconds until the building may pop again.
    cooldown: f64,
    was_inside: bool,
}

impl Poi {
    pub fn new(config: &PoiConfig, pop: &PopConfig) -> Self {
        Poi {
            trigger: config.trigger(),
            color: config.color.clone(),
            building: Building::new(pop.clone()),
            radius: pop.radius,
            cooldown_secs: pop.cooldown_secs,
            cooldown: 0.0,
            was_inside: false,
        }
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }

    pub fn building(&self) -> &Building {
        &self.building
    }

    /// Pops the building on the tick the train enters the radius, unless a
    /// previous pop is still cooling down.
    pub fn update(&mut self, train_x: f64, dt: f64) {
        let inside = self.trigger.distance_to(train_x) < self.radius;

        if self.cooldown > 0.0 {
            self.cooldown -= dt;
        }

        if inside && !self.was_inside && self.cooldown <= 0.0 {
            log::debug!("{} pops", self.trigger.name);
            self.building.pop();
            self.cooldown = self.cooldown_secs;
        }

        self.was_inside = inside;
        self.building.update(dt);
    }
}
