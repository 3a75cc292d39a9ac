use crate::action::OutputAction;

pub trait Led {
    fn on(&mut self);
    fn off(&mut self);
    fn toggle(&mut self);
}

pub trait Button {
    fn is_pressed(&mut self) -> bool;
}

/// Index of a match event inside a timer (SCT has eight).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventId(pub u8);

impl EventId {
    pub const fn mask(self) -> u32 {
        1 << self.0
    }
}

/// One counter with match events that drive a single output.
///
/// Implemented by the SCT counter halves and by the simulated timer used in
/// tests. A configured event fires when the counter reaches its match value,
/// applies its output action, raises its flag and halts the counter.
pub trait MatchTimer {
    /// Halt the counter and reset its count to zero.
    fn halt_and_clear(&mut self);

    /// Release the counter from halt.
    fn start(&mut self);

    fn is_running(&self) -> bool;

    /// Install `event` at `ticks`, replacing any earlier action on it.
    /// The event is left disabled.
    fn configure(&mut self, event: EventId, ticks: u16, action: OutputAction);

    fn set_event_enabled(&mut self, event: EventId, enabled: bool);

    fn clear_flag(&mut self, event: EventId);

    fn flag(&self, event: EventId) -> bool;
}

/// ADC conversion sequence that reports completion through a flag.
pub trait AdcSequence {
    /// Whether the sequence-complete flag is raised.
    fn sequence_complete(&self) -> bool;

    fn clear_sequence_complete(&mut self);

    /// Raw 12-bit result of `channel`, if the data register holds a valid one.
    fn channel_result(&mut self, channel: u8) -> Option<u16>;
}
