use std::f64::consts::PI;

use crate::config::PopConfig;

/// A point of interest's building, which springs when the train arrives.
#[derive(Debug, Clone)]
pub struct Building {
    /// Normalised pop time; 1.0 or more means idle.
    t: f64,
    scale: f64,
    params: PopConfig,
}

impl Building {
    pub fn new(params: PopConfig) -> Self {
        Building {
            t: 1.0,
            scale: 1.0,
            params,
        }
    }

    pub fn pop(&mut self) {
        self.t = 0.0;
    }

    pub fn is_popping(&self) -> bool {
        self.t < 1.0
    }

    /// Current scale factor; 1.0 at rest.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn update(&mut self, dt: f64) {
        if !self.is_popping() {
            return;
        }
        let p = &self.params;
        self.t += dt / p.duration_secs;
        if self.t >= 1.0 {
            self.t = 1.0;
            self.scale = 1.0;
            return;
        }
        let t = self.t;
        self.scale = 1.0 + p.amplitude * (-p.damping * t).exp() * (2.0 * PI * p.frequency * t).sin();
    }
}
