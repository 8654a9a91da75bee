//! Canvas geometry shared by drawing and mouse hit-testing.

use crate::hud::DisclosureController;
use crate::types::{CellRect, TerminalContract};

/// Rows the banner occupies when fully revealed.
pub const BANNER_ROWS: u16 = 3;
/// Narrowest the banner box gets once fully revealed.
const BANNER_MIN_WIDTH: u16 = 24;
/// Banner width during the vertical half of the reveal, as a fraction of full.
const BANNER_SLIVER: f64 = 0.1;

#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub contract: TerminalContract,
    pub track_y: u16,
    pub banner_y: u16,
    pub panel: CellRect,
}

impl Layout {
    pub fn compute(contract: TerminalContract) -> Self {
        let TerminalContract { width, height } = contract;
        let banner_y = height.saturating_sub(BANNER_ROWS + 1);
        let margin_x = 4u16.min(width / 8);
        let margin_y = 2u16.min(height / 8);
        let panel = CellRect {
            x: margin_x,
            y: margin_y,
            width: width.saturating_sub(2 * margin_x),
            height: banner_y.saturating_sub(margin_y + 1).max(3),
        };
        Layout {
            contract,
            track_y: height * 3 / 5,
            banner_y,
            panel,
        }
    }

    /// Terminal column for a track position.
    pub fn column(&self, x: f64, track_width: f64) -> u16 {
        let span = self.contract.width.saturating_sub(1) as f64;
        let t = (x / track_width + 0.5).clamp(0.0, 1.0);
        (t * span).round() as u16
    }

    /// Banner box for a container reveal value in `[0, 1]`, or `None` while
    /// nothing is visible.
    ///
    /// The first half of the reveal grows a narrow sliver upward, the second
    /// half widens it to full size.
    pub fn banner_rect(&self, reveal: f64, label: &str) -> Option<CellRect> {
        if reveal <= 0.0 {
            return None;
        }
        let full = (label.chars().count() as u16 + 6)
            .max(BANNER_MIN_WIDTH)
            .min(self.contract.width.saturating_sub(2))
            .max(1);
        let sliver = ((full as f64 * BANNER_SLIVER).round() as u16).max(1);

        let (width, height) = if reveal < 0.5 {
            let rows = (BANNER_ROWS as f64 * reveal / 0.5).round() as u16;
            (sliver, rows.max(1))
        } else {
            let t = (reveal - 0.5) / 0.5;
            let w = sliver as f64 + (full - sliver) as f64 * t;
            ((w.round() as u16).max(sliver), BANNER_ROWS)
        };

        Some(CellRect {
            x: self.contract.width.saturating_sub(width) / 2,
            y: self.banner_y + (BANNER_ROWS - height),
            width,
            height,
        })
    }

    /// Current banner box, if a banner exists and shows anything.
    pub fn banner_for(&self, hud: &DisclosureController) -> Option<CellRect> {
        let banner = hud.banner()?;
        self.banner_rect(banner.container().value(), banner.label())
    }

    /// Title chip above the panel: `" {title}  ✕ "`.
    pub fn header_rect(&self, title: &str) -> CellRect {
        let width = (title.chars().count() as u16 + 5).min(self.contract.width);
        CellRect {
            x: self.contract.width.saturating_sub(width) / 2,
            y: self.panel.y.saturating_sub(1),
            width,
            height: 1,
        }
    }

    /// Cell of the chip's close glyph.
    pub fn close_button(&self, title: &str) -> (u16, u16) {
        let chip = self.header_rect(title);
        (chip.x + chip.width.saturating_sub(2), chip.y)
    }
}
