/// Suspends player input while the detail panel is open.
///
/// Only the disclosure controller writes it; the motion model reads it once
/// per tick through [`DisclosureController::are_controls_enabled`].
///
/// [`DisclosureController::are_controls_enabled`]: super::DisclosureController::are_controls_enabled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlLock {
    engaged: bool,
}

impl ControlLock {
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    pub(crate) fn engage(&mut self) {
        if !self.engaged {
            log::debug!("controls locked");
        }
        self.engaged = true;
    }

    pub(crate) fn release(&mut self) {
        if self.engaged {
            log::debug!("controls released");
        }
        self.engaged = false;
    }
}
