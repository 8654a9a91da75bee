use crate::config::TrainConfig;

/// The player's train: one scalar position along a wrapping track.
#[derive(Debug, Clone)]
pub struct Train {
    x: f64,
    v: f64,
    params: TrainConfig,
    half_track: f64,
}

impl Train {
    pub fn new(params: TrainConfig, track_width: f64) -> Self {
        Train {
            x: 0.0,
            v: 0.0,
            params,
            half_track: track_width / 2.0,
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn velocity(&self) -> f64 {
        self.v
    }

    pub fn set_position(&mut self, x: f64) {
        self.x = x.clamp(-self.half_track, self.half_track);
    }

    /// Integrate one tick of `dt` seconds.
    ///
    /// `axis` is -1, 0 or 1. With controls disabled the train brakes to a
    /// stop regardless of input.
    pub fn update(&mut self, dt: f64, axis: f64, controls_enabled: bool) {
        let p = &self.params;
        if !controls_enabled {
            self.v = approach(self.v, 0.0, (p.brake_accel + p.coast_decel) * dt);
        } else if axis != 0.0 {
            let against_motion = self.v != 0.0 && axis.signum() != self.v.signum();
            let a = if against_motion { p.brake_accel } else { p.accel };
            self.v += axis * a * dt;
        } else {
            self.v = approach(self.v, 0.0, p.coast_decel * dt);
        }

        self.v = self.v.clamp(-p.max_speed, p.max_speed);
        self.x += self.v * dt;

        if self.x > self.half_track {
            self.x = -self.half_track;
        }
        if self.x < -self.half_track {
            self.x = self.half_track;
        }
    }
}

/// Move `value` toward `target` by at most `delta`, without overshoot.
pub fn approach(value: f64, target: f64, delta: f64) -> f64 {
    if value < target {
        (value + delta).min(target)
    } else if value > target {
        (value - delta).max(target)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn train() -> Train {
        Train::new(TrainConfig::default(), 50.0)
    }

    #[test]
    fn approach_never_overshoots() {
        assert_eq!(approach(1.0, 0.0, 5.0), 0.0);
        assert_eq!(approach(-1.0, 0.0, 0.25), -0.75);
        assert_eq!(approach(2.0, 2.0, 1.0), 2.0);
    }

    #[test]
    fn accelerates_up_to_max_speed() {
        let mut t = train();
        for _ in 0..300 {
            t.update(0.01, 1.0, true);
        }
        assert_eq!(t.velocity(), 6.0);
        assert!(t.x() > 0.0);
    }

    #[test]
    fn reversing_input_brakes_harder() {
        let mut t = train();
        t.update(1.0, 1.0, true);
        assert_eq!(t.velocity(), 3.0);
        t.update(0.25, -1.0, true);
        assert_eq!(t.velocity(), 1.0);
    }

    #[test]
    fn coasts_to_a_stop() {
        let mut t = train();
        t.update(1.0, 1.0, true);
        t.update(1.0, 0.0, true);
        assert_eq!(t.velocity(), 0.0);
    }

    #[test]
    fn disabled_controls_ignore_input_and_brake() {
        let mut t = train();
        t.update(1.0, 1.0, true);
        t.update(0.1, 1.0, false);
        assert!((t.velocity() - 1.7).abs() < 1e-9);
        t.update(1.0, 1.0, false);
        assert_eq!(t.velocity(), 0.0);
    }

    #[test]
    fn wraps_around_the_track_ends() {
        let mut t = train();
        t.set_position(24.9);
        for _ in 0..20 {
            t.update(0.05, 1.0, true);
        }
        assert!(t.x() < 0.0);

        let mut t = train();
        t.set_position(-24.95);
        t.update(1.0, -1.0, true);
        assert_eq!(t.x(), 25.0);
    }
}
