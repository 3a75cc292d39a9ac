//! One-shot delay state.

use crate::action::OutputAction;

/// Where a one-shot delay is in its life.
///
/// `deadline` is the match value, in counter ticks, the armed action fires at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OneShot {
    #[default]
    Idle,
    Armed {
        action: OutputAction,
        deadline: u16,
    },
    Fired {
        action: OutputAction,
    },
}

impl OneShot {
    pub const fn new() -> Self {
        OneShot::Idle
    }

    /// Arm `action` at `deadline` from any state. Returns the action that was
    /// still pending, which the new one replaces.
    pub fn arm(&mut self, action: OutputAction, deadline: u16) -> Option<OutputAction> {
        let cancelled = self.pending();
        *self = OneShot::Armed { action, deadline };
        cancelled
    }

    /// Armed -> Fired. `None` if nothing was armed.
    pub fn complete(&mut self) -> Option<OutputAction> {
        match *self {
            OneShot::Armed { action, .. } => {
                *self = OneShot::Fired { action };
                Some(action)
            }
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<OutputAction> {
        match *self {
            OneShot::Armed { action, .. } => Some(action),
            _ => None,
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self, OneShot::Armed { .. })
    }

    pub fn deadline(&self) -> Option<u16> {
        match *self {
            OneShot::Armed { deadline, .. } => Some(deadline),
            _ => None,
        }
    }

    /// Action of the most recent completed delay.
    pub fn last_fired(&self) -> Option<OutputAction> {
        match *self {
            OneShot::Fired { action } => Some(action),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arm_then_complete() {
        let mut shot = OneShot::new();
        assert_eq!(shot.arm(OutputAction::Set, 100), None);
        assert_eq!(shot.deadline(), Some(100));
        assert_eq!(shot.complete(), Some(OutputAction::Set));
        assert_eq!(shot.last_fired(), Some(OutputAction::Set));
        assert!(!shot.is_armed());
    }

    #[test]
    fn rearm_reports_cancelled_action() {
        let mut shot = OneShot::new();
        shot.arm(OutputAction::Set, 10);
        assert_eq!(shot.arm(OutputAction::Clear, 20), Some(OutputAction::Set));
        assert_eq!(shot.pending(), Some(OutputAction::Clear));
    }

    #[test]
    fn completion_without_arm_is_ignored() {
        let mut shot = OneShot::new();
        assert_eq!(shot.complete(), None);
        shot.arm(OutputAction::Toggle, 1);
        shot.complete();
        // A second completion for the same arm reports nothing.
        assert_eq!(shot.complete(), None);
    }
}
