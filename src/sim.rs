//! Host-side stand-ins for the peripherals the exercises drive.
//!
//! `SimSct` models one 16-bit SCT counter half with its match events and one
//! output, `SimAdc` the trigger-to-completion cycle of a conversion sequence,
//! and `SimPin` a GPIO pin whose level the test controls.

use crate::action::OutputAction;
use crate::hardware::sct::EVENTS;
use crate::hardware::traits::{AdcSequence, EventId, MatchTimer};
use core::cell::Cell;
use core::convert::Infallible;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin, StatefulOutputPin};

/// A pin level shared between the test and the driver under test.
#[derive(Clone, Copy)]
pub struct SimPin<'a> {
    level: &'a Cell<bool>,
}

impl<'a> SimPin<'a> {
    pub fn new(level: &'a Cell<bool>) -> Self {
        Self { level }
    }

    pub fn level(&self) -> bool {
        self.level.get()
    }

    pub fn set_level(&self, high: bool) {
        self.level.set(high);
    }
}

impl ErrorType for SimPin<'_> {
    type Error = Infallible;
}

impl InputPin for SimPin<'_> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level())
    }
}

impl OutputPin for SimPin<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_level(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_level(true);
        Ok(())
    }
}

impl StatefulOutputPin for SimPin<'_> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level())
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SimEvent {
    ticks: u16,
    action: OutputAction,
    enabled: bool,
}

/// One SCT counter half in one-shot mode.
///
/// A firing event applies its action to the output, raises its flag and
/// halts the counter, as `SctCounter::configure` sets it up on the chip.
#[derive(Debug, Clone)]
pub struct SimSct {
    count: u16,
    running: bool,
    output: bool,
    flags: u8,
    events: [Option<SimEvent>; EVENTS as usize],
    fired: u32,
}

impl SimSct {
    pub fn new(output: bool) -> Self {
        Self {
            count: 0,
            running: false,
            output,
            flags: 0,
            events: [None; EVENTS as usize],
            fired: 0,
        }
    }

    /// Run the counter for `ticks` prescaled clocks.
    pub fn advance(&mut self, mut ticks: u32) {
        while ticks > 0 && self.running {
            // Distance to the next enabled match, counting through wrap-around.
            let next = self
                .events
                .iter()
                .flatten()
                .filter(|e| e.enabled)
                .map(|e| match e.ticks.wrapping_sub(self.count) {
                    0 => 0x1_0000,
                    d => d as u32,
                })
                .min();

            match next {
                Some(distance) if distance <= ticks => {
                    ticks -= distance;
                    self.count = self.count.wrapping_add(distance as u16);
                    self.fire_matches();
                }
                _ => {
                    self.count = self.count.wrapping_add(ticks as u16);
                    ticks = 0;
                }
            }
        }
    }

    fn fire_matches(&mut self) {
        for (n, slot) in self.events.iter().enumerate() {
            if let Some(event) = slot {
                if event.enabled && event.ticks == self.count {
                    self.output = event.action.apply(self.output);
                    self.flags |= 1 << n;
                    self.running = false;
                    self.fired += 1;
                }
            }
        }
    }

    pub fn output(&self) -> bool {
        self.output
    }

    pub fn count(&self) -> u16 {
        self.count
    }

    /// Enabled events that could still fire.
    pub fn enabled_events(&self) -> usize {
        self.events.iter().flatten().filter(|e| e.enabled).count()
    }

    pub fn pending_flags(&self) -> u32 {
        self.flags.count_ones()
    }

    /// Total number of event firings since creation.
    pub fn fired(&self) -> u32 {
        self.fired
    }
}

impl MatchTimer for SimSct {
    fn halt_and_clear(&mut self) {
        self.running = false;
        self.count = 0;
    }

    fn start(&mut self) {
        self.running = true;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn configure(&mut self, event: EventId, ticks: u16, action: OutputAction) {
        self.events[event.0 as usize] = Some(SimEvent {
            ticks,
            action,
            enabled: false,
        });
    }

    fn set_event_enabled(&mut self, event: EventId, enabled: bool) {
        if let Some(e) = self.events[event.0 as usize].as_mut() {
            e.enabled = enabled;
        }
    }

    fn clear_flag(&mut self, event: EventId) {
        self.flags &= !(event.mask() as u8);
    }

    fn flag(&self, event: EventId) -> bool {
        self.flags & event.mask() as u8 != 0
    }
}

/// Conversion sequence state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcState {
    Idle,
    Triggered,
    Converting,
    Complete,
}

/// A single-channel sequence started by the rising edge of a trigger line.
#[derive(Debug, Clone)]
pub struct SimAdc {
    channel: u8,
    input: u16,
    state: AdcState,
    trigger_level: bool,
    result: Option<u16>,
    missed_triggers: u32,
}

impl SimAdc {
    pub fn new(channel: u8) -> Self {
        Self {
            channel,
            input: 0,
            state: AdcState::Idle,
            trigger_level: false,
            result: None,
            missed_triggers: 0,
        }
    }

    /// Voltage on the input pin, as a raw 12-bit code.
    pub fn set_input(&mut self, raw: u16) {
        self.input = raw & 0x0FFF;
    }

    /// New level of the trigger line. A rising edge starts a conversion
    /// from `Idle`; edges arriving at any other time are lost.
    pub fn trigger_level(&mut self, high: bool) {
        let rising = high && !self.trigger_level;
        self.trigger_level = high;
        if !rising {
            return;
        }
        if self.state == AdcState::Idle {
            self.state = AdcState::Triggered;
        } else {
            self.missed_triggers += 1;
        }
    }

    /// Advance the converter by one step.
    pub fn step(&mut self) {
        self.state = match self.state {
            AdcState::Triggered => AdcState::Converting,
            AdcState::Converting => {
                self.result = Some(self.input);
                AdcState::Complete
            }
            other => other,
        };
    }

    pub fn state(&self) -> AdcState {
        self.state
    }

    pub fn missed_triggers(&self) -> u32 {
        self.missed_triggers
    }
}

impl AdcSequence for SimAdc {
    fn sequence_complete(&self) -> bool {
        self.state == AdcState::Complete
    }

    fn clear_sequence_complete(&mut self) {
        if self.state == AdcState::Complete {
            self.state = AdcState::Idle;
        }
    }

    fn channel_result(&mut self, channel: u8) -> Option<u16> {
        if channel == self.channel {
            self.result
        } else {
            None
        }
    }
}
