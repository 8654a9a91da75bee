//! Renderer — the deterministic rasterizer.
//!
//! Composes a `Ride` into `DrawOp`s, rasterizes them onto a fixed-size
//! cell grid and diffs consecutive grids so the player only repaints
//! what changed.
//!
//! The renderer is pure. It reads timeline values but never advances them.

pub mod layout;

pub use layout::Layout;

use crate::hud::DisclosureController;
use crate::ride::Ride;
use crate::scene::Scene;
use crate::types::{Cell, CellChange, CellRect, Color, DrawOp, NamedColor, ResolvedScene, Style};

use layout::BANNER_ROWS;

const TRACK_Z: i32 = 0;
const BUILDING_Z: i32 = 1;
const MARKER_Z: i32 = 2;
const TRAIN_Z: i32 = 3;
const BANNER_Z: i32 = 10;
const PANEL_Z: i32 = 20;
const HEADER_Z: i32 = 30;

const BUILDING_ROWS: u16 = 5;
const BUILDING_WIDTH: u16 = 5;

const TRACK_COLOR: Color = Color::Rgb {
    r: 0xFF,
    g: 0xF1,
    b: 0xA9,
};
const BUILDING_COLOR: Color = Color::Rgb {
    r: 0x93,
    g: 0xC0,
    b: 0xA4,
};
const MARKER_COLOR: Color = Color::Rgb {
    r: 0x1D,
    g: 0x2B,
    b: 0xA8,
};
const TRAIN_COLOR: Color = Color::Rgb {
    r: 0xE5,
    g: 0x59,
    b: 0x34,
};
const PANEL_BG: Color = Color::Rgb {
    r: 0x1E,
    g: 0x1E,
    b: 0x28,
};

pub struct Renderer;

impl Renderer {
    /// Draw the scene and the HUD on top of it.
    pub fn compose(ride: &Ride, layout: &Layout) -> ResolvedScene {
        let mut ops = Vec::new();

        Self::draw_scene(ride.scene(), layout, &mut ops);
        Self::draw_banner(ride.hud(), layout, &mut ops);
        Self::draw_panel(ride.hud(), layout, &mut ops);

        ResolvedScene {
            width: layout.contract.width,
            height: layout.contract.height,
            ops,
        }
    }

    /// Rasterize a resolved scene onto a fixed-size cell grid.
    ///
    /// Draw operations are sorted by z-order so that higher z values
    /// paint over lower ones.
    pub fn rasterize(scene: &ResolvedScene) -> Vec<Vec<Cell>> {
        let w = scene.width as usize;
        let h = scene.height as usize;
        let mut grid = vec![vec![Cell::default(); w]; h];

        let mut ops: Vec<_> = scene.ops.iter().collect();
        ops.sort_by_key(|op| op.z_order);

        for op in ops {
            let x = op.x as usize;
            let y = op.y as usize;
            if x < w && y < h {
                grid[y][x] = Cell {
                    ch: op.ch,
                    style: op.style.clone(),
                };
            }
        }

        grid
    }

    /// Compute a cell-level diff between two grids.
    pub fn diff(prev: &[Vec<Cell>], next: &[Vec<Cell>]) -> Vec<CellChange> {
        let mut changes = Vec::new();
        for (y, (prev_row, next_row)) in prev.iter().zip(next.iter()).enumerate() {
            for (x, (prev_cell, next_cell)) in prev_row.iter().zip(next_row.iter()).enumerate() {
                if prev_cell != next_cell {
                    changes.push(CellChange {
                        x: x as u16,
                        y: y as u16,
                        cell: next_cell.clone(),
                    });
                }
            }
        }
        changes
    }

    // -----------------------------------------------------------------------
    // Scene
    // -----------------------------------------------------------------------

    fn draw_scene(scene: &Scene, layout: &Layout, ops: &mut Vec<DrawOp>) {
        let track_y = layout.track_y;
        let track_style = Style::fg(TRACK_COLOR);
        for x in 0..layout.contract.width {
            push(ops, x, track_y, '═', &track_style, TRACK_Z);
        }

        for poi in scene.pois() {
            let trigger = poi.trigger();
            let col = layout.column(trigger.track_position, scene.track_width());

            // Buildings stand back from the track and stretch with the pop.
            let color = poi.color().cloned().unwrap_or(BUILDING_COLOR);
            let building_style = Style::fg(color);
            let rows = (BUILDING_ROWS as f64 * poi.building().scale()).round() as u16;
            let base = track_y.saturating_sub(2);
            for r in 0..rows {
                let Some(y) = base.checked_sub(r) else {
                    break;
                };
                for dx in 0..BUILDING_WIDTH {
                    if let Some(x) = (col + dx).checked_sub(BUILDING_WIDTH / 2) {
                        push(ops, x, y, '█', &building_style, BUILDING_Z);
                    }
                }
            }

            push(ops, col, track_y + 1, '◆', &Style::fg(MARKER_COLOR), MARKER_Z);
            let name_len = trigger.name.chars().count() as u16;
            let name_x = col.saturating_sub(name_len / 2);
            push_text(ops, name_x, track_y + 2, &trigger.name, &Style::dim(), MARKER_Z);
        }

        let train = scene.train();
        let cols = ((2.0 / scene.track_width()) * layout.contract.width as f64)
            .round()
            .max(3.0) as u16;
        let center = layout.column(train.x(), scene.track_width());
        let left = center.saturating_sub(cols / 2);
        let body = Style {
            fg: Some(TRAIN_COLOR),
            bold: true,
            ..Default::default()
        };
        for dx in 0..cols {
            push(ops, left + dx, track_y.saturating_sub(1), '█', &body, TRAIN_Z);
        }
        push(ops, left, track_y, 'o', &body, TRAIN_Z);
        push(ops, left + cols - 1, track_y, 'o', &body, TRAIN_Z);
    }

    // -----------------------------------------------------------------------
    // HUD
    // -----------------------------------------------------------------------

    fn draw_banner(hud: &DisclosureController, layout: &Layout, ops: &mut Vec<DrawOp>) {
        let Some(banner) = hud.banner() else {
            return;
        };
        let Some(rect) = layout.banner_for(hud) else {
            return;
        };

        let frame = if banner.is_interactive() {
            Style {
                fg: Some(Color::Named(NamedColor::Cyan)),
                bold: true,
                ..Default::default()
            }
        } else {
            Style::fg(Color::Named(NamedColor::White))
        };

        if rect.width < 2 || rect.height < 2 {
            fill(ops, rect, '█', &frame, BANNER_Z);
            return;
        }
        fill(ops, rect, ' ', &Style::default(), BANNER_Z);
        push_box(ops, rect, &frame, BANNER_Z + 1);

        let fade = banner.text().value();
        if fade <= 0.0 || rect.height < BANNER_ROWS {
            return;
        }
        let room = rect.width.saturating_sub(4) as usize;
        let label: String = banner.label().chars().take(room).collect();
        let len = label.chars().count() as u16;
        let text_style = Style {
            fg: Some(Color::Named(NamedColor::White)),
            bold: banner.is_interactive(),
            dim: fade < 0.5,
            ..Default::default()
        };
        let x = rect.x + (rect.width - len) / 2;
        push_text(ops, x, rect.y + 1, &label, &text_style, BANNER_Z + 2);
    }

    fn draw_panel(hud: &DisclosureController, layout: &Layout, ops: &mut Vec<DrawOp>) {
        let panel = hud.panel();

        let curtain = panel.curtain().value();
        if curtain > 0.0 {
            let rect = layout.panel;
            let visible = (rect.height as f64 * curtain).ceil() as u16;
            let clip = rect.y + visible;

            let bg = Style {
                bg: Some(PANEL_BG),
                ..Default::default()
            };
            let border = Style {
                fg: Some(Color::Named(NamedColor::Cyan)),
                bg: Some(PANEL_BG),
                ..Default::default()
            };
            let mut body_ops = Vec::new();
            fill(&mut body_ops, rect, ' ', &bg, PANEL_Z);
            push_box(&mut body_ops, rect, &border, PANEL_Z + 1);

            if let Some(content) = panel.content() {
                let title = Style {
                    fg: Some(Color::Named(NamedColor::White)),
                    bg: Some(PANEL_BG),
                    bold: true,
                    ..Default::default()
                };
                let text = Style {
                    fg: Some(Color::Named(NamedColor::White)),
                    bg: Some(PANEL_BG),
                    ..Default::default()
                };
                let inner = rect.width.saturating_sub(4) as usize;
                push_text(&mut body_ops, rect.x + 2, rect.y + 1, &content.title, &title, PANEL_Z + 2);
                for (i, line) in wrap(&content.body, inner).iter().enumerate() {
                    let y = rect.y + 3 + i as u16;
                    if y + 1 >= rect.y + rect.height {
                        break;
                    }
                    push_text(&mut body_ops, rect.x + 2, y, line, &text, PANEL_Z + 2);
                }
            }
            let hint = Style {
                bg: Some(PANEL_BG),
                dim: true,
                ..Default::default()
            };
            let hint_y = (rect.y + rect.height).saturating_sub(2);
            push_text(&mut body_ops, rect.x + 2, hint_y, "Esc to close", &hint, PANEL_Z + 2);

            ops.extend(body_ops.into_iter().filter(|op| op.y < clip));
        }

        let header = panel.header().value();
        if header > 0.0 && !panel.title().is_empty() {
            let chip = layout.header_rect(panel.title());
            let style = Style {
                fg: Some(Color::Named(NamedColor::Black)),
                bg: Some(Color::Named(NamedColor::Cyan)),
                dim: header < 0.6,
                ..Default::default()
            };
            let text = format!(" {}  ✕ ", panel.title());
            push_text(ops, chip.x, chip.y, &text, &style, HEADER_Z);
        }
    }
}

// ---------------------------------------------------------------------------
// Drawing helpers
// ---------------------------------------------------------------------------

fn push(ops: &mut Vec<DrawOp>, x: u16, y: u16, ch: char, style: &Style, z_order: i32) {
    ops.push(DrawOp {
        x,
        y,
        ch,
        style: style.clone(),
        z_order,
    });
}

fn push_text(ops: &mut Vec<DrawOp>, x: u16, y: u16, text: &str, style: &Style, z_order: i32) {
    for (i, ch) in text.chars().enumerate() {
        push(ops, x + i as u16, y, ch, style, z_order);
    }
}

fn fill(ops: &mut Vec<DrawOp>, rect: CellRect, ch: char, style: &Style, z_order: i32) {
    for y in rect.y..rect.y + rect.height {
        for x in rect.x..rect.x + rect.width {
            push(ops, x, y, ch, style, z_order);
        }
    }
}

fn push_box(ops: &mut Vec<DrawOp>, rect: CellRect, style: &Style, z_order: i32) {
    let CellRect { x, y, width: w, height: h } = rect;
    if w == 0 || h == 0 {
        return;
    }

    // Top edge
    push(ops, x, y, '┌', style, z_order);
    for i in 1..w.saturating_sub(1) {
        push(ops, x + i, y, '─', style, z_order);
    }
    if w > 1 {
        push(ops, x + w - 1, y, '┐', style, z_order);
    }

    // Side edges
    for j in 1..h.saturating_sub(1) {
        push(ops, x, y + j, '│', style, z_order);
        if w > 1 {
            push(ops, x + w - 1, y + j, '│', style, z_order);
        }
    }

    // Bottom edge
    if h > 1 {
        push(ops, x, y + h - 1, '└', style, z_order);
        for i in 1..w.saturating_sub(1) {
            push(ops, x + i, y + h - 1, '─', style, z_order);
        }
        if w > 1 {
            push(ops, x + w - 1, y + h - 1, '┘', style, z_order);
        }
    }
}

/// Greedy word wrap to `width` columns. Words longer than a line are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let line_len = line.chars().count();
        if line_len > 0 && line_len + 1 + word.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.extend(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::TracksideConfig;
    use crate::types::TerminalContract;

    fn layout() -> Layout {
        Layout::compute(TerminalContract {
            width: 80,
            height: 22,
        })
    }

    fn row(grid: &[Vec<Cell>], y: u16) -> String {
        grid[y as usize].iter().map(|c| c.ch).collect()
    }

    fn frame(ride: &Ride) -> Vec<Vec<Cell>> {
        Renderer::rasterize(&Renderer::compose(ride, &layout()))
    }

    fn ride_at(x: f64) -> Ride {
        let mut ride = Ride::new(&TracksideConfig::default());
        ride.scene_mut().train_mut().set_position(x);
        ride
    }

    fn settle(ride: &mut Ride, ms: u64) {
        for _ in 0..ms / 10 {
            ride.step(Duration::from_millis(10), 0.0);
        }
    }

    #[test]
    fn idle_scene_draws_track_and_no_banner() {
        let ride = ride_at(0.0);
        let l = layout();
        let grid = frame(&ride);
        assert!(row(&grid, l.track_y).contains('═'));
        assert!(row(&grid, l.track_y + 2).contains("First Stop"));
        for y in l.banner_y..l.banner_y + BANNER_ROWS {
            assert!(!row(&grid, y).contains('┌'));
            assert!(!row(&grid, y).contains('│'));
        }
    }

    #[test]
    fn revealed_banner_shows_label() {
        let mut ride = ride_at(10.0);
        settle(&mut ride, 1200);
        let l = layout();
        let grid = frame(&ride);
        assert!(row(&grid, l.banner_y).contains('┌'));
        assert!(row(&grid, l.banner_y + 1).contains("First Stop"));
    }

    #[test]
    fn open_panel_shows_detail_and_chip() {
        let mut ride = ride_at(10.0);
        settle(&mut ride, 1200);
        ride.hud_mut().on_banner_click();
        settle(&mut ride, 800);

        let l = layout();
        let grid = frame(&ride);
        assert!(row(&grid, l.panel.y + 1).contains("First Stop"));
        assert!(row(&grid, l.panel.y + 3).contains("Info about First Stop goes here."));
        assert!(row(&grid, l.panel.y - 1).contains('✕'));
    }

    #[test]
    fn diff_reports_only_changed_cells() {
        let a = vec![vec![Cell::default(); 3]; 2];
        let mut b = a.clone();
        assert!(Renderer::diff(&a, &b).is_empty());
        b[1][2].ch = 'x';
        let changes = Renderer::diff(&a, &b);
        assert_eq!(changes.len(), 1);
        assert_eq!((changes[0].x, changes[0].y, changes[0].cell.ch), (2, 1, 'x'));
    }

    #[test]
    fn wrap_breaks_on_words_and_splits_long_ones() {
        assert_eq!(wrap("Info about First Stop", 10), vec!["Info about", "First Stop"]);
        assert_eq!(wrap("abcdefghijkl", 5), vec!["abcde", "fghij", "kl"]);
        assert!(wrap("", 5).is_empty());
    }
}
