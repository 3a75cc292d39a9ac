//! Output actions and LED polarity.
//!
//! A match event acts on a pin level (`OutputAction`), while the exercises
//! think in terms of the LED (`LedCommand`). `Polarity` maps one onto the
//! other, since the Alakart LEDs are wired active-low on some exercises and
//! active-high on others.

/// What a match event does to its output when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputAction {
    Set,
    Clear,
    Toggle,
}

impl OutputAction {
    /// Output level after applying the action to `level`.
    pub fn apply(self, level: bool) -> bool {
        match self {
            OutputAction::Set => true,
            OutputAction::Clear => false,
            OutputAction::Toggle => !level,
        }
    }
}

/// Logical LED command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedCommand {
    On,
    Off,
    Toggle,
}

/// Pin level at which the LED (or button) is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    pub fn action_for(self, command: LedCommand) -> OutputAction {
        match (self, command) {
            (_, LedCommand::Toggle) => OutputAction::Toggle,
            (Polarity::ActiveHigh, LedCommand::On) | (Polarity::ActiveLow, LedCommand::Off) => {
                OutputAction::Set
            }
            (Polarity::ActiveHigh, LedCommand::Off) | (Polarity::ActiveLow, LedCommand::On) => {
                OutputAction::Clear
            }
        }
    }

    /// Whether a raw pin `level` means "active".
    pub fn is_active(self, level: bool) -> bool {
        match self {
            Polarity::ActiveHigh => level,
            Polarity::ActiveLow => !level,
        }
    }

    /// Raw pin level for the inactive (LED off, button released) state.
    pub fn idle_level(self) -> bool {
        matches!(self, Polarity::ActiveLow)
    }
}
