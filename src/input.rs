//! Terminal input — crossterm events to actions.
//!
//! Terminals without keyboard-enhancement support never report key
//! releases, so a held direction key is approximated: each press (including
//! auto-repeat) keeps the key down for `HOLD_WINDOW`.

use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseButton, MouseEventKind};

use crate::config::{KeyBindings, matches_any};

/// Long enough to bridge the usual auto-repeat start delay.
pub const HOLD_WINDOW: Duration = Duration::from_millis(550);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Continue,
    Redraw,
    Quit,
    /// Keyboard equivalent of clicking the banner.
    Activate,
    Close,
    /// Left mouse button pressed at a terminal cell.
    Click { column: u16, row: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct HeldKeys {
    release_events: bool,
    left: Option<Instant>,
    right: Option<Instant>,
}

impl HeldKeys {
    /// `release_events` says whether the terminal reports key releases.
    pub fn new(release_events: bool) -> Self {
        HeldKeys {
            release_events,
            left: None,
            right: None,
        }
    }

    pub fn press(&mut self, side: Side, now: Instant) {
        if !self.release_events {
            // A tap in one direction cancels a lingering hold in the other.
            *self.slot(opposite(side)) = None;
        }
        *self.slot(side) = Some(now);
    }

    pub fn release(&mut self, side: Side) {
        *self.slot(side) = None;
    }

    pub fn clear(&mut self) {
        self.left = None;
        self.right = None;
    }

    /// -1, 0 or 1.
    pub fn horizontal_axis(&self, now: Instant) -> f64 {
        let left = self.is_held(self.left, now);
        let right = self.is_held(self.right, now);
        (right as i8 - left as i8) as f64
    }

    fn is_held(&self, pressed: Option<Instant>, now: Instant) -> bool {
        match pressed {
            None => false,
            Some(_) if self.release_events => true,
            Some(at) => now.saturating_duration_since(at) < HOLD_WINDOW,
        }
    }

    fn slot(&mut self, side: Side) -> &mut Option<Instant> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

fn opposite(side: Side) -> Side {
    match side {
        Side::Left => Side::Right,
        Side::Right => Side::Left,
    }
}

pub fn handle_event(
    held: &mut HeldKeys,
    bindings: &KeyBindings,
    event: Event,
    now: Instant,
) -> Action {
    match event {
        Event::Key(key) => handle_key(held, bindings, key, now),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Action::Click {
                column: mouse.column,
                row: mouse.row,
            },
            _ => Action::Continue,
        },
        Event::Resize(_, _) => Action::Redraw,
        Event::FocusLost => {
            held.clear();
            Action::Continue
        }
        _ => Action::Continue,
    }
}

fn handle_key(held: &mut HeldKeys, bindings: &KeyBindings, key: KeyEvent, now: Instant) -> Action {
    let side = if matches_any(&bindings.left, &key) {
        Some(Side::Left)
    } else if matches_any(&bindings.right, &key) {
        Some(Side::Right)
    } else {
        None
    };

    if let Some(side) = side {
        match key.kind {
            KeyEventKind::Release => held.release(side),
            KeyEventKind::Press | KeyEventKind::Repeat => held.press(side, now),
        }
        return Action::Continue;
    }

    // Everything else acts on press only.
    if key.kind == KeyEventKind::Release {
        return Action::Continue;
    }
    if matches_any(&bindings.quit, &key) {
        return Action::Quit;
    }
    if matches_any(&bindings.close, &key) {
        return Action::Close;
    }
    if matches_any(&bindings.activate, &key) {
        return Action::Activate;
    }
    Action::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers, MouseEvent};

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn hold_window_expires_without_release_events() {
        let bindings = KeyBindings::default();
        let mut held = HeldKeys::new(false);
        let t0 = Instant::now();
        handle_event(&mut held, &bindings, key(KeyCode::Char('d'), KeyEventKind::Press), t0);
        assert_eq!(held.horizontal_axis(t0), 1.0);
        assert_eq!(held.horizontal_axis(t0 + Duration::from_millis(300)), 1.0);
        assert_eq!(held.horizontal_axis(t0 + HOLD_WINDOW), 0.0);
    }

    #[test]
    fn opposite_tap_cancels_hold() {
        let bindings = KeyBindings::default();
        let mut held = HeldKeys::new(false);
        let t0 = Instant::now();
        handle_event(&mut held, &bindings, key(KeyCode::Right, KeyEventKind::Press), t0);
        handle_event(&mut held, &bindings, key(KeyCode::Left, KeyEventKind::Press), t0);
        assert_eq!(held.horizontal_axis(t0), -1.0);
    }

    #[test]
    fn release_events_drive_the_axis_directly() {
        let bindings = KeyBindings::default();
        let mut held = HeldKeys::new(true);
        let t0 = Instant::now();
        handle_event(&mut held, &bindings, key(KeyCode::Char('a'), KeyEventKind::Press), t0);
        assert_eq!(held.horizontal_axis(t0 + Duration::from_secs(5)), -1.0);
        handle_event(&mut held, &bindings, key(KeyCode::Char('a'), KeyEventKind::Release), t0);
        assert_eq!(held.horizontal_axis(t0), 0.0);
    }

    #[test]
    fn maps_discrete_keys_and_clicks() {
        let bindings = KeyBindings::default();
        let mut held = HeldKeys::new(false);
        let now = Instant::now();
        let mut act = |e| handle_event(&mut held, &bindings, e, now);

        assert_eq!(act(key(KeyCode::Esc, KeyEventKind::Press)), Action::Close);
        assert_eq!(act(key(KeyCode::Enter, KeyEventKind::Press)), Action::Activate);
        assert_eq!(act(key(KeyCode::Enter, KeyEventKind::Release)), Action::Continue);
        assert_eq!(act(key(KeyCode::Char('q'), KeyEventKind::Press)), Action::Quit);
        assert_eq!(act(Event::Resize(80, 24)), Action::Redraw);

        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 7,
            row: 3,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(act(click), Action::Click { column: 7, row: 3 });
    }
}
