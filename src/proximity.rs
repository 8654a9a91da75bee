//! Nearest-trigger lookup along the track.

use crate::types::Trigger;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest<'a> {
    pub trigger: &'a Trigger,
    pub distance: f64,
}

/// Find the trigger closest to `train_x`.
///
/// Ties go to the earliest trigger in iteration order. Returns `None` for an
/// empty set.
pub fn nearest<'a, I>(train_x: f64, triggers: I) -> Option<Nearest<'a>>
where
    I: IntoIterator<Item = &'a Trigger>,
{
    let mut best: Option<Nearest<'a>> = None;
    for trigger in triggers {
        let distance = trigger.distance_to(train_x);
        match best {
            Some(b) if b.distance <= distance => {}
            _ => best = Some(Nearest { trigger, distance }),
        }
    }
    best
}
