//! Shared boundary types for the trackside scene.
//!
//! This module defines the data contracts between the parts of the program:
//! - Scene → HUD: `Trigger`, a named point on the track
//! - Renderer → Player (in-memory): `ResolvedScene` containing `DrawOp`s,
//!   rasterized into rows of `Cell`s and shipped to the terminal as `CellChange`s

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Scene → HUD boundary
// ---------------------------------------------------------------------------

/// A named location on the track that the disclosure controller reacts to.
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub name: String,
    pub track_position: f64,
}

impl Trigger {
    pub fn new(name: impl Into<String>, track_position: f64) -> Self {
        Trigger {
            name: name.into(),
            track_position,
        }
    }

    /// Absolute distance along the track from `x` to this trigger.
    pub fn distance_to(&self, x: f64) -> f64 {
        (self.track_position - x).abs()
    }
}

// ---------------------------------------------------------------------------
// Shared style primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Named(NamedColor),
    Rgb { r: u8, g: u8, b: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub dim: bool,
}

impl Style {
    pub fn fg(color: Color) -> Self {
        Style {
            fg: Some(color),
            ..Default::default()
        }
    }

    pub fn dim() -> Self {
        Style {
            dim: true,
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer → Player boundary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DrawOp {
    pub x: u16,
    pub y: u16,
    pub ch: char,
    pub style: Style,
    pub z_order: i32,
}

#[derive(Debug, Clone)]
pub struct ResolvedScene {
    pub width: u16,
    pub height: u16,
    pub ops: Vec<DrawOp>,
}

/// Size of the drawable canvas, excluding the menu bar and status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalContract {
    pub width: u16,
    pub height: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            ch: ' ',
            style: Style::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellChange {
    pub x: u16,
    pub y: u16,
    pub cell: Cell,
}

/// Screen-space rectangle in canvas cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl CellRect {
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}
