//! Player — the runtime loop.
//!
//! Owns the terminal for the length of a ride: polls input until the next
//! tick is due, steps the ride, then repaints only the cells that changed.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{cursor, execute, queue, style, terminal};
use log::{debug, info};

use crate::config::TracksideConfig;
use crate::input::{Action, HeldKeys, handle_event};
use crate::menubar::{menu_items, print_menu_item};
use crate::renderer::{Layout, Renderer};
use crate::ride::Ride;
use crate::types::{Cell, Color, NamedColor, Style, TerminalContract};

/// Rows reserved above the canvas for the menu bar.
const CANVAS_OFFSET: u16 = 1;
/// Smallest canvas the scene is laid out for.
const MIN_WIDTH: u16 = 40;
const MIN_HEIGHT: u16 = 16;
/// Longest step fed to the ride, so a stalled terminal cannot teleport the train.
const MAX_STEP: Duration = Duration::from_millis(100);

pub struct Player {
    config: TracksideConfig,
    ride: Ride,
    layout: Layout,
    grid: Vec<Vec<Cell>>,
    held: HeldKeys,
}

impl Player {
    pub fn new(config: TracksideConfig) -> Self {
        let ride = Ride::new(&config);
        let layout = Layout::compute(TerminalContract {
            width: MIN_WIDTH,
            height: MIN_HEIGHT,
        });
        Self {
            config,
            ride,
            layout,
            grid: Vec::new(),
            held: HeldKeys::new(false),
        }
    }

    /// Run the ride in the terminal.
    ///
    /// Sets up the terminal, enters the event loop, and restores the terminal
    /// on exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        // +2: one row for menu bar, one row for status bar
        if term_w < MIN_WIDTH || term_h < MIN_HEIGHT + 2 {
            bail!(
                "Terminal too small: need {}x{}, have {}x{}",
                MIN_WIDTH,
                MIN_HEIGHT + 2,
                term_w,
                term_h,
            );
        }
        self.resize(term_w, term_h);

        let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;
        let enhanced = enhanced
            && execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )
            .is_ok();
        self.held = HeldKeys::new(enhanced);
        info!(
            "ride started on {}x{} canvas (key release events: {enhanced})",
            self.layout.contract.width, self.layout.contract.height
        );

        let result = self.run_loop(&mut stdout);

        // Always restore terminal state.
        if enhanced {
            let _ = execute!(stdout, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(
            stdout,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();

        info!("ride ended");
        result
    }

    // -----------------------------------------------------------------------
    // Event loop
    // -----------------------------------------------------------------------

    fn run_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let tick = self.config.tick();

        self.redraw(stdout)?;
        let mut last = Instant::now();

        loop {
            let deadline = last + tick;
            loop {
                let timeout = deadline.saturating_duration_since(Instant::now());
                if !event::poll(timeout)? {
                    break;
                }
                let event = event::read()?;
                let action = handle_event(
                    &mut self.held,
                    &self.config.key_bindings,
                    event,
                    Instant::now(),
                );
                match action {
                    Action::Continue => {}
                    Action::Quit => return Ok(()),
                    Action::Redraw => {
                        let (w, h) = terminal::size()?;
                        self.resize(w, h);
                        self.redraw(stdout)?;
                    }
                    Action::Activate => self.ride.hud_mut().on_banner_click(),
                    Action::Close => self.ride.hud_mut().on_escape_key(),
                    Action::Click { column, row } => self.click(column, row),
                }
            }

            let now = Instant::now();
            let dt = now.saturating_duration_since(last).min(MAX_STEP);
            last = now;

            let axis = self.held.horizontal_axis(now);
            self.ride.step(dt, axis);
            self.render_frame(stdout)?;
            self.render_status(stdout)?;
        }
    }

    /// Route a left click to the panel's close glyph or the banner.
    fn click(&mut self, column: u16, row: u16) {
        let Some(row) = row.checked_sub(CANVAS_OFFSET) else {
            return;
        };
        let hud = self.ride.hud();
        let title = hud.panel().title();

        let on_close = hud.panel_open() && !title.is_empty() && {
            let (x, y) = self.layout.close_button(title);
            row == y && (column == x || column == x + 1)
        };
        let on_banner = self
            .layout
            .banner_for(hud)
            .is_some_and(|rect| rect.contains(column, row));

        if on_close {
            debug!("close glyph clicked");
            self.ride.hud_mut().collapse_panel();
        } else if on_banner {
            debug!("banner clicked at {column},{row}");
            self.ride.hud_mut().on_banner_click();
        }
    }

    fn resize(&mut self, term_w: u16, term_h: u16) {
        let contract = TerminalContract {
            width: term_w,
            height: term_h.saturating_sub(2),
        };
        self.layout = Layout::compute(contract);
        self.grid = vec![vec![Cell::default(); contract.width as usize]; contract.height as usize];
        debug!("canvas resized to {}x{}", contract.width, contract.height);
    }

    // -----------------------------------------------------------------------
    // Terminal output
    // -----------------------------------------------------------------------

    fn redraw(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
        self.grid = Renderer::rasterize(&Renderer::compose(&self.ride, &self.layout));
        self.render_menubar(stdout)?;
        self.render_full(stdout)?;
        self.render_status(stdout)?;
        Ok(())
    }

    fn render_menubar(&self, stdout: &mut io::Stdout) -> Result<()> {
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(" "),
        )?;
        for (i, item) in menu_items(&self.config.key_bindings).iter().enumerate() {
            if i > 0 {
                queue!(stdout, style::Print("  "))?;
            }
            print_menu_item(stdout, item)?;
        }
        stdout.flush()?;
        Ok(())
    }

    fn render_full(&self, stdout: &mut io::Stdout) -> Result<()> {
        for (y, row) in self.grid.iter().enumerate() {
            queue!(stdout, cursor::MoveTo(0, y as u16 + CANVAS_OFFSET))?;
            for cell in row {
                let cs = to_content_style(&cell.style);
                queue!(
                    stdout,
                    style::PrintStyledContent(style::StyledContent::new(cs, cell.ch))
                )?;
            }
        }
        stdout.flush()?;
        Ok(())
    }

    fn render_frame(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let next = Renderer::rasterize(&Renderer::compose(&self.ride, &self.layout));
        for change in Renderer::diff(&self.grid, &next) {
            let cs = to_content_style(&change.cell.style);
            queue!(
                stdout,
                cursor::MoveTo(change.x, change.y + CANVAS_OFFSET),
                style::PrintStyledContent(style::StyledContent::new(cs, change.cell.ch)),
            )?;
        }
        stdout.flush()?;
        self.grid = next;
        Ok(())
    }

    fn render_status(&self, stdout: &mut io::Stdout) -> Result<()> {
        let status_y = self.layout.contract.height + CANVAS_OFFSET;
        let (_, term_h) = terminal::size()?;
        if status_y >= term_h {
            return Ok(()); // No room for status bar.
        }

        let train = self.ride.scene().train();
        let nearest = match self.ride.nearest() {
            Some(n) => format!("{} @ {:.2}", n.trigger.name, n.distance),
            None => "none".to_string(),
        };
        let hud = self.ride.hud();
        let status = format!(
            " x {:+7.2}  v {:+6.2} | nearest: {} | {:?}{} ",
            train.x(),
            train.velocity(),
            nearest,
            hud.state(),
            if hud.are_controls_enabled() { "" } else { " | controls locked" },
        );

        let mut cs = style::ContentStyle::default();
        cs.attributes.set(style::Attribute::Dim);

        queue!(
            stdout,
            cursor::MoveTo(0, status_y),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::PrintStyledContent(style::StyledContent::new(cs, status)),
        )?;
        stdout.flush()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Style conversion
// ---------------------------------------------------------------------------

pub fn to_content_style(s: &Style) -> style::ContentStyle {
    let mut cs = style::ContentStyle::default();
    if let Some(fg) = &s.fg {
        cs.foreground_color = Some(to_ct_color(fg));
    }
    if let Some(bg) = &s.bg {
        cs.background_color = Some(to_ct_color(bg));
    }
    if s.bold {
        cs.attributes.set(style::Attribute::Bold);
    }
    if s.dim {
        cs.attributes.set(style::Attribute::Dim);
    }
    cs
}

pub fn to_ct_color(c: &Color) -> style::Color {
    match c {
        Color::Named(n) => match n {
            NamedColor::Black => style::Color::Black,
            NamedColor::Red => style::Color::Red,
            NamedColor::Green => style::Color::Green,
            NamedColor::Yellow => style::Color::Yellow,
            NamedColor::Blue => style::Color::Blue,
            NamedColor::Magenta => style::Color::Magenta,
            NamedColor::Cyan => style::Color::Cyan,
            NamedColor::White => style::Color::White,
        },
        Color::Rgb { r, g, b } => style::Color::Rgb {
            r: *r,
            g: *g,
            b: *b,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_conversion_keeps_attributes() {
        let cs = to_content_style(&Style {
            fg: Some(Color::Rgb { r: 1, g: 2, b: 3 }),
            bg: Some(Color::Named(NamedColor::Cyan)),
            bold: true,
            dim: false,
        });
        assert_eq!(cs.foreground_color, Some(style::Color::Rgb { r: 1, g: 2, b: 3 }));
        assert_eq!(cs.background_color, Some(style::Color::Cyan));
        assert!(cs.attributes.has(style::Attribute::Bold));
        assert!(!cs.attributes.has(style::Attribute::Dim));
    }

    #[test]
    fn resize_reserves_menu_and_status_rows() {
        let mut player = Player::new(TracksideConfig::default());
        player.resize(80, 24);
        assert_eq!(player.layout.contract.height, 22);
        assert_eq!(player.grid.len(), 22);
        assert_eq!(player.grid[0].len(), 80);
    }

    #[test]
    fn clicks_above_the_canvas_are_ignored() {
        let mut player = Player::new(TracksideConfig::default());
        player.resize(80, 24);
        player.click(40, 0);
        assert!(!player.ride.hud().panel_open());
    }
}
