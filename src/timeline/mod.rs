//! Timeline — a reversible, cancellable transition.
//!
//! A timeline owns no clock. Whoever owns it calls [`Timeline::advance`] once
//! per tick with the elapsed time; when progress reaches the bound it is
//! heading for, playback stops and `advance` reports the [`Edge`] it settled
//! on. That report is the timeline's completion signal: it fires exactly once
//! per play-to-completion, however many times the direction flipped on the
//! way. Stopping a timeline with [`Timeline::cancel`] or [`Timeline::pause`]
//! means no report is ever produced for that run.
//!
//! Progress 0 is the fully hidden visual state, progress = duration the
//! fully shown one.

use std::f64::consts::PI;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// The bound a finished run settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Start,
    End,
}

/// Shaping curve applied to the rendered value. Progress itself stays linear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    #[default]
    Ease,
    EaseIn,
    EaseOut,
    /// Fast start with a long settle, used for the panel curtain.
    SnapOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Ease => 0.5 - 0.5 * (PI * t).cos(),
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::SnapOut => 1.0 - (1.0 - t).powi(4),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Timeline {
    duration: Duration,
    progress: Duration,
    direction: Direction,
    /// Multiplier on elapsed time; 1.0 traverses the full duration in `duration`.
    speed: f64,
    playing: bool,
    /// Set by `play`, cleared by `rewind`. Only consulted for zero-length timelines.
    engaged: bool,
    easing: Easing,
}

impl Timeline {
    /// A paused timeline sitting at progress 0.
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Timeline {
            duration,
            progress: Duration::ZERO,
            direction: Direction::Forward,
            speed: 1.0,
            playing: false,
            engaged: false,
            easing,
        }
    }

    /// Start or resume playback toward the bound `direction` points at.
    ///
    /// Calling this mid-flight only changes direction; the run in progress
    /// keeps its single completion. Playing toward a bound the timeline
    /// already sits on settles on the next `advance` without restarting.
    pub fn play(&mut self, direction: Direction) {
        self.direction = direction;
        self.speed = 1.0;
        self.playing = true;
        self.engaged = true;
    }

    /// Like [`play`](Self::play), but scaled so that a full traversal takes `span`.
    pub fn play_over(&mut self, direction: Direction, span: Duration) {
        self.play(direction);
        if span.is_zero() || self.duration.is_zero() {
            self.progress = self.target();
        } else {
            self.speed = self.duration.as_secs_f64() / span.as_secs_f64();
        }
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Stop immediately and drop the pending completion. Progress stays put.
    pub fn cancel(&mut self) {
        self.playing = false;
        self.speed = 1.0;
    }

    /// Jump to `progress`, clamped to `[0, duration]`.
    pub fn seek(&mut self, progress: Duration) {
        self.progress = progress.min(self.duration);
    }

    /// Pause and return to progress 0.
    pub fn rewind(&mut self) {
        self.pause();
        self.engaged = false;
        self.seek(Duration::ZERO);
    }

    /// Move time forward by `dt`. Returns the edge reached if this call
    /// finished the current run.
    pub fn advance(&mut self, dt: Duration) -> Option<Edge> {
        if !self.playing {
            return None;
        }

        let step = if self.speed == 1.0 {
            dt
        } else {
            dt.mul_f64(self.speed)
        };
        match self.direction {
            Direction::Forward => {
                self.progress = (self.progress + step).min(self.duration);
                if self.progress < self.duration {
                    return None;
                }
            }
            Direction::Backward => {
                self.progress = self.progress.saturating_sub(step);
                if !self.progress.is_zero() {
                    return None;
                }
            }
        }

        self.playing = false;
        self.speed = 1.0;
        Some(self.edge())
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn progress(&self) -> Duration {
        self.progress
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn at_start(&self) -> bool {
        self.progress.is_zero()
    }

    pub fn at_end(&self) -> bool {
        self.progress >= self.duration
    }

    /// Linear progress in `[0, 1]`. A zero-length timeline reads as its bound.
    pub fn fraction(&self) -> f64 {
        if self.duration.is_zero() {
            return match (self.direction, self.engaged) {
                (Direction::Forward, true) => 1.0,
                _ => 0.0,
            };
        }
        self.progress.as_secs_f64() / self.duration.as_secs_f64()
    }

    /// Eased progress in `[0, 1]`, the value the presentation layer draws.
    pub fn value(&self) -> f64 {
        self.easing.apply(self.fraction())
    }

    fn target(&self) -> Duration {
        match self.direction {
            Direction::Forward => self.duration,
            Direction::Backward => Duration::ZERO,
        }
    }

    fn edge(&self) -> Edge {
        match self.direction {
            Direction::Forward => Edge::End,
            Direction::Backward => Edge::Start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn forward_run_completes_once_at_end() {
        let mut t = Timeline::new(ms(100), Easing::Linear);
        t.play(Direction::Forward);
        assert_eq!(t.advance(ms(60)), None);
        assert_eq!(t.advance(ms(60)), Some(Edge::End));
        assert_eq!(t.progress(), ms(100));
        assert!(!t.is_playing());
        assert_eq!(t.advance(ms(60)), None);
    }

    #[test]
    fn reversing_mid_flight_keeps_a_single_completion() {
        let mut t = Timeline::new(ms(100), Easing::Linear);
        t.play(Direction::Forward);
        assert_eq!(t.advance(ms(40)), None);
        t.play(Direction::Backward);
        assert_eq!(t.advance(ms(30)), None);
        assert_eq!(t.progress(), ms(10));
        assert_eq!(t.advance(ms(30)), Some(Edge::Start));
        assert_eq!(t.advance(ms(30)), None);
    }

    #[test]
    fn cancel_discards_completion_and_keeps_progress() {
        let mut t = Timeline::new(ms(100), Easing::Linear);
        t.play(Direction::Forward);
        t.advance(ms(70));
        t.cancel();
        assert_eq!(t.advance(ms(100)), None);
        assert_eq!(t.progress(), ms(70));
    }

    #[test]
    fn playing_toward_reached_bound_settles_without_restart() {
        let mut t = Timeline::new(ms(100), Easing::Linear);
        t.play(Direction::Forward);
        t.advance(ms(100));
        t.play(Direction::Forward);
        assert_eq!(t.progress(), ms(100));
        assert_eq!(t.advance(Duration::ZERO), Some(Edge::End));
        assert_eq!(t.progress(), ms(100));
    }

    #[test]
    fn play_over_scales_the_traversal() {
        let mut t = Timeline::new(ms(420), Easing::Linear);
        t.seek(ms(420));
        t.play_over(Direction::Backward, ms(260));
        assert_eq!(t.advance(ms(130)), None);
        assert!((t.fraction() - 0.5).abs() < 1e-6);
        assert_eq!(t.advance(ms(140)), Some(Edge::Start));
    }

    #[test]
    fn zero_span_settles_on_next_advance() {
        let mut t = Timeline::new(ms(200), Easing::Linear);
        t.play_over(Direction::Forward, Duration::ZERO);
        assert!(t.at_end());
        assert_eq!(t.advance(Duration::ZERO), Some(Edge::End));
    }

    #[test]
    fn zero_duration_timeline_completes_immediately() {
        let mut t = Timeline::new(Duration::ZERO, Easing::Ease);
        t.play(Direction::Forward);
        assert_eq!(t.advance(ms(1)), Some(Edge::End));
        assert_eq!(t.value(), 1.0);
    }

    #[test]
    fn seek_clamps_and_rewind_stops() {
        let mut t = Timeline::new(ms(100), Easing::Linear);
        t.seek(ms(500));
        assert!(t.at_end());
        t.play(Direction::Backward);
        t.rewind();
        assert!(t.at_start());
        assert!(!t.is_playing());
    }

    #[test]
    fn easing_curves_hit_both_bounds() {
        for easing in [
            Easing::Linear,
            Easing::Ease,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::SnapOut,
        ] {
            assert!(easing.apply(0.0).abs() < 1e-9, "{easing:?}");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-9, "{easing:?}");
        }
    }
}
