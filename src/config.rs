//! Runtime configuration, read from JSON.
//!
//! Every field has a default, so a config file only needs the values it
//! wants to change.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

use crate::types::{Color, Trigger};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TracksideConfig {
    pub hud: HudConfig,
    pub scene: SceneConfig,
    pub key_bindings: KeyBindings,
    /// Target frame interval of the render loop.
    pub tick_ms: u64,
}

// ---------------------------------------------------------------------------
// Disclosure widget
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HudConfig {
    /// The banner opens when the nearest trigger is closer than this.
    pub show_threshold: f64,
    /// An open banner closes when the nearest trigger is farther than this.
    pub hide_threshold: f64,
    pub reveal_ms: u64,
    pub text_ms: u64,
    pub curtain_open_ms: u64,
    pub curtain_close_ms: u64,
    pub header_in_ms: u64,
    pub header_out_ms: u64,
    /// Body text of the detail panel; `{name}` is replaced by the trigger name.
    pub detail_template: String,
}

impl Default for HudConfig {
    fn default() -> Self {
        HudConfig {
            show_threshold: 0.8,
            hide_threshold: 1.0,
            reveal_ms: 600,
            text_ms: 350,
            curtain_open_ms: 420,
            curtain_close_ms: 260,
            header_in_ms: 180,
            header_out_ms: 120,
            detail_template: "Info about {name} goes here.".into(),
        }
    }
}

impl HudConfig {
    pub fn reveal(&self) -> Duration {
        Duration::from_millis(self.reveal_ms)
    }

    pub fn text(&self) -> Duration {
        Duration::from_millis(self.text_ms)
    }

    pub fn curtain_open(&self) -> Duration {
        Duration::from_millis(self.curtain_open_ms)
    }

    pub fn curtain_close(&self) -> Duration {
        Duration::from_millis(self.curtain_close_ms)
    }

    pub fn header_in(&self) -> Duration {
        Duration::from_millis(self.header_in_ms)
    }

    pub fn header_out(&self) -> Duration {
        Duration::from_millis(self.header_out_ms)
    }

    pub fn detail_for(&self, name: &str) -> String {
        self.detail_template.replace("{name}", name)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.show_threshold > 0.0,
            "hud.show_threshold must be positive (got {})",
            self.show_threshold
        );
        ensure!(
            self.hide_threshold >= self.show_threshold,
            "hud.hide_threshold ({}) must not be below hud.show_threshold ({})",
            self.hide_threshold,
            self.show_threshold
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Track length; positions run from `-track_width / 2` to `track_width / 2`.
    pub track_width: f64,
    pub train: TrainConfig,
    pub pop: PopConfig,
    pub pois: Vec<PoiConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            track_width: 50.0,
            train: TrainConfig::default(),
            pop: PopConfig::default(),
            pois: vec![
                PoiConfig {
                    name: "First Stop".into(),
                    position: 10.0,
                    color: None,
                },
                PoiConfig {
                    name: "Second Stop".into(),
                    position: -10.0,
                    color: None,
                },
            ],
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.track_width > 0.0,
            "scene.track_width must be positive (got {})",
            self.track_width
        );
        let half = self.track_width / 2.0;
        for (i, poi) in self.pois.iter().enumerate() {
            ensure!(!poi.name.trim().is_empty(), "scene.pois[{i}] has an empty name");
            ensure!(
                poi.position.abs() <= half,
                "scene.pois[{i}] ({}) at {} lies outside the track (±{half})",
                poi.name,
                poi.position
            );
            ensure!(
                !self.pois[..i].iter().any(|p| p.name == poi.name),
                "scene.pois[{i}]: duplicate name {:?}",
                poi.name
            );
        }
        ensure!(
            self.pop.duration_secs > 0.0,
            "scene.pop.duration_secs must be positive"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Units per second.
    pub max_speed: f64,
    /// Units per second squared while a direction key is held.
    pub accel: f64,
    /// Used instead of `accel` when pushing against the current motion.
    pub brake_accel: f64,
    /// Deceleration when no key is held.
    pub coast_decel: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            max_speed: 6.0,
            accel: 3.0,
            brake_accel: 8.0,
            coast_decel: 5.0,
        }
    }
}

/// Proximity pop effect on a point of interest's building.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopConfig {
    pub radius: f64,
    /// Seconds before the same building may pop again.
    pub cooldown_secs: f64,
    pub duration_secs: f64,
    pub amplitude: f64,
    pub damping: f64,
    pub frequency: f64,
}

impl Default for PopConfig {
    fn default() -> Self {
        PopConfig {
            radius: 0.8,
            cooldown_secs: 5.0,
            duration_secs: 0.67,
            amplitude: 0.1,
            damping: 2.0,
            frequency: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoiConfig {
    pub name: String,
    pub position: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl PoiConfig {
    pub fn trigger(&self) -> Trigger {
        Trigger::new(self.name.clone(), self.position)
    }
}

// ---------------------------------------------------------------------------
// Key bindings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
    /// Keyboard stand-in for clicking the banner.
    pub activate: Vec<String>,
    pub close: Vec<String>,
    pub quit: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            left: vec!["a".into(), "Left".into()],
            right: vec!["d".into(), "Right".into()],
            activate: vec!["Enter".into(), "Space".into()],
            close: vec!["Esc".into()],
            quit: vec!["q".into(), "Ctrl-c".into()],
        }
    }
}

impl TracksideConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist and parse. Without one, the per-user file
    /// is used if present; a broken per-user file is reported and ignored.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::read(path)?,
            None => {
                let default_path = Self::config_path();
                if default_path.exists() {
                    match Self::read(&default_path) {
                        Ok(config) => config,
                        Err(e) => {
                            log::warn!("invalid config {} ({e:#}), using defaults", default_path.display());
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.hud.validate()?;
        self.scene.validate()?;
        ensure!(self.tick_ms > 0, "tick_ms must be positive");
        Ok(())
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    fn read(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("trackside");
        path.push("config.json");
        path
    }
}

impl Default for TracksideConfig {
    fn default() -> Self {
        TracksideConfig {
            hud: HudConfig::default(),
            scene: SceneConfig::default(),
            key_bindings: KeyBindings::default(),
            tick_ms: 16,
        }
    }
}

/// True if `event` matches any binding in `bindings`.
pub fn matches_any(bindings: &[String], event: &KeyEvent) -> bool {
    bindings.iter().any(|b| matches_binding(b, event))
}

/// Check whether a crossterm `KeyEvent` matches a binding string from config.
pub fn matches_binding(binding: &str, event: &KeyEvent) -> bool {
    if let Some(rest) = binding.strip_prefix("Alt-") {
        return event.modifiers.contains(KeyModifiers::ALT) && matches_key(rest, event.code);
    }

    if let Some(rest) = binding.strip_prefix("Ctrl-") {
        return event.modifiers.contains(KeyModifiers::CONTROL) && matches_key(rest, event.code);
    }

    // Plain bindings must not fire while Ctrl or Alt is held, so that "c"
    // stays distinct from "Ctrl-c".
    if event.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return false;
    }

    matches_key(binding, event.code)
}

fn matches_key(key: &str, code: KeyCode) -> bool {
    match key {
        "Right" => code == KeyCode::Right,
        "Left" => code == KeyCode::Left,
        "Up" => code == KeyCode::Up,
        "Down" => code == KeyCode::Down,
        "Enter" => code == KeyCode::Enter,
        "Esc" => code == KeyCode::Esc,
        "Space" => code == KeyCode::Char(' '),
        "Tab" => code == KeyCode::Tab,
        "Backspace" => code == KeyCode::Backspace,
        "Home" => code == KeyCode::Home,
        "End" => code == KeyCode::End,
        s => {
            if let Some(rest) = s.strip_prefix('F') {
                if let Ok(n) = rest.parse::<u8>() {
                    return code == KeyCode::F(n);
                }
            }
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => match code {
                    // Shift is not reported consistently, so letters match either case.
                    KeyCode::Char(k) => k.eq_ignore_ascii_case(&c),
                    _ => false,
                },
                _ => false,
            }
        }
    }
}
