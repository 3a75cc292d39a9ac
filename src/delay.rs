//! Button-driven delayed output on a match timer.
//!
//! A press arms a one-shot: after `delay_ticks` counter ticks the timer applies
//! an output action to the LED pin and halts. Completion is observed either by
//! polling the event flag from the main loop or from the timer interrupt.

use crate::action::{LedCommand, OutputAction, Polarity};
use crate::error::{Error, Result};
use crate::hardware::traits::{EventId, MatchTimer};
use crate::one_shot::OneShot;

/// What a press does while a delay is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RetriggerPolicy {
    /// Drop the press.
    Ignore,
    /// Restart the pending transition from zero.
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DelayConfig {
    pub event: EventId,
    pub delay_ticks: u16,
    pub polarity: Polarity,
    pub retrigger: RetriggerPolicy,
    /// Quiet time after each button edge, 0 to disable.
    pub debounce_ms: u32,
}

/// Result of handling one button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressOutcome {
    Armed(OutputAction),
    Restarted(OutputAction),
    Ignored,
    /// The press landed on a delay that had already fired but was not yet
    /// acknowledged. The completion is kept for the next `poll` and nothing
    /// new is started.
    Completed(OutputAction),
}

/// Check a delay against the 16-bit counter: `1..=65535` ticks.
pub fn check_delay(ticks: u32) -> Result<u16> {
    match u16::try_from(ticks) {
        Ok(t) if t > 0 => Ok(t),
        _ => Err(Error::DelayOutOfRange { ticks }),
    }
}

/// `On, Off, On, ...`, starting from an LED that is off after reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Alternator {
    next: LedCommand,
}

impl Alternator {
    pub const fn new() -> Self {
        Alternator {
            next: LedCommand::On,
        }
    }

    pub fn peek(&self) -> LedCommand {
        self.next
    }

    pub fn advance(&mut self) -> LedCommand {
        let current = self.next;
        self.next = match current {
            LedCommand::On => LedCommand::Off,
            _ => LedCommand::On,
        };
        current
    }
}

impl Default for Alternator {
    fn default() -> Self {
        Self::new()
    }
}

/// A single match event re-created on every arm.
pub struct DelayedOutput<T> {
    timer: T,
    event: EventId,
    delay_ticks: u16,
    polarity: Polarity,
    policy: RetriggerPolicy,
    state: OneShot,
    alternator: Alternator,
    /// Completion picked up by a press before `poll` saw it.
    unreported: Option<OutputAction>,
}

impl<T: MatchTimer> DelayedOutput<T> {
    pub fn new(mut timer: T, config: &DelayConfig) -> Self {
        timer.halt_and_clear();
        timer.set_event_enabled(config.event, false);
        timer.clear_flag(config.event);
        Self {
            timer,
            event: config.event,
            delay_ticks: config.delay_ticks,
            polarity: config.polarity,
            policy: config.retrigger,
            state: OneShot::new(),
            alternator: Alternator::new(),
            unreported: None,
        }
    }

    /// Arm `action` to fire after `delay_ticks` and start counting.
    pub fn arm(&mut self, delay_ticks: u32, action: OutputAction) -> Result<()> {
        self.prepare(delay_ticks, action)?;
        self.start()
    }

    /// Install `action` at `delay_ticks` with the counter left halted at zero.
    pub fn prepare(&mut self, delay_ticks: u32, action: OutputAction) -> Result<()> {
        let ticks = check_delay(delay_ticks)?;
        self.timer.halt_and_clear();
        self.collect();
        self.timer.clear_flag(self.event);
        self.timer.configure(self.event, ticks, action);
        self.timer.set_event_enabled(self.event, true);
        self.state.arm(action, ticks);
        Ok(())
    }

    /// Start a prepared delay.
    pub fn start(&mut self) -> Result<()> {
        if !self.state.is_armed() {
            return Err(Error::NotPrepared);
        }
        self.timer.start();
        Ok(())
    }

    /// Main-loop completion check. Returns the action that fired.
    pub fn poll(&mut self) -> Option<OutputAction> {
        if let Some(action) = self.unreported.take() {
            return Some(action);
        }
        if !self.timer.flag(self.event) {
            return None;
        }
        self.complete()
    }

    /// Completion step for the timer interrupt handler.
    pub fn on_interrupt(&mut self) -> Option<OutputAction> {
        self.poll()
    }

    fn complete(&mut self) -> Option<OutputAction> {
        self.timer.clear_flag(self.event);
        self.timer.set_event_enabled(self.event, false);
        self.state.complete()
    }

    /// Complete an armed delay whose event already fired, keeping the action
    /// for the next `poll`.
    fn collect(&mut self) {
        if self.state.is_armed() && self.timer.flag(self.event) {
            self.unreported = self.complete();
        }
    }

    /// A delay is armed and the counter is running toward it.
    pub fn is_busy(&self) -> bool {
        self.state.is_armed() && self.timer.is_running()
    }

    /// Arm the configured delay for `command`, honouring the retrigger policy.
    pub fn on_press(&mut self, command: LedCommand) -> Result<PressOutcome> {
        self.collect();
        if self.is_busy() {
            return match (self.policy, self.state.pending()) {
                (RetriggerPolicy::Restart, Some(pending)) => {
                    self.arm(self.delay_ticks as u32, pending)?;
                    Ok(PressOutcome::Restarted(pending))
                }
                _ => Ok(PressOutcome::Ignored),
            };
        }
        let action = self.polarity.action_for(command);
        self.arm(self.delay_ticks as u32, action)?;
        Ok(PressOutcome::Armed(action))
    }

    /// `on_press` with the command taken from the on/off alternation.
    pub fn press_alternating(&mut self) -> Result<PressOutcome> {
        let outcome = self.on_press(self.alternator.peek())?;
        if let PressOutcome::Armed(_) = outcome {
            self.alternator.advance();
        }
        Ok(outcome)
    }

    /// Pre-install the next alternating transition without starting it, so
    /// a later press only has to `trigger`.
    pub fn prepare_alternating(&mut self) -> Result<LedCommand> {
        let command = self.alternator.peek();
        self.prepare(self.delay_ticks as u32, self.polarity.action_for(command))?;
        self.alternator.advance();
        Ok(command)
    }

    /// Start whatever was prepared. A running delay is handled by the
    /// retrigger policy; one that fired unacknowledged is only collected.
    pub fn trigger(&mut self) -> Result<PressOutcome> {
        self.collect();
        let Some(action) = self.state.pending() else {
            return match self.unreported {
                Some(action) => Ok(PressOutcome::Completed(action)),
                None => Err(Error::NotPrepared),
            };
        };
        let running = self.timer.is_running();
        if running && self.policy == RetriggerPolicy::Ignore {
            return Ok(PressOutcome::Ignored);
        }

        self.timer.halt_and_clear();
        // The match may have fired between the checks above and the halt.
        self.collect();
        if !self.state.is_armed() {
            return Ok(PressOutcome::Completed(action));
        }
        self.timer.clear_flag(self.event);
        self.timer.start();
        Ok(if running {
            PressOutcome::Restarted(action)
        } else {
            PressOutcome::Armed(action)
        })
    }

    pub fn state(&self) -> OneShot {
        self.state
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }
}

/// Two events created once, LED-on and LED-off; a press enables exactly one.
pub struct DualEventDelay<T> {
    timer: T,
    on_event: EventId,
    off_event: EventId,
    delay_ticks: u16,
    polarity: Polarity,
    policy: RetriggerPolicy,
    state: OneShot,
    unreported: Option<LedCommand>,
}

impl<T: MatchTimer> DualEventDelay<T> {
    pub fn new(
        mut timer: T,
        (on_event, off_event): (EventId, EventId),
        delay_ticks: u32,
        polarity: Polarity,
        policy: RetriggerPolicy,
    ) -> Result<Self> {
        let ticks = check_delay(delay_ticks)?;
        timer.halt_and_clear();
        for (event, command) in [(on_event, LedCommand::On), (off_event, LedCommand::Off)] {
            timer.configure(event, ticks, polarity.action_for(command));
            timer.set_event_enabled(event, false);
            timer.clear_flag(event);
        }
        Ok(Self {
            timer,
            on_event,
            off_event,
            delay_ticks: ticks,
            polarity,
            policy,
            state: OneShot::new(),
            unreported: None,
        })
    }

    fn event_for(&self, command: LedCommand) -> EventId {
        match command {
            LedCommand::Off => self.off_event,
            _ => self.on_event,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_armed() && self.timer.is_running()
    }

    /// Run the pre-created event for `command` (`Toggle` counts as `On`).
    pub fn on_press(&mut self, command: LedCommand) -> PressOutcome {
        if self.state.is_armed() {
            if let Some(fired) = self.take_fired() {
                self.unreported = Some(fired);
            }
        }
        if self.is_busy() && self.policy == RetriggerPolicy::Ignore {
            return PressOutcome::Ignored;
        }
        let restarted = self.is_busy();
        let enabled = self.event_for(command);

        self.timer.halt_and_clear();
        for event in [self.on_event, self.off_event] {
            self.timer.clear_flag(event);
            self.timer.set_event_enabled(event, event == enabled);
        }
        self.timer.start();

        let action = match command {
            LedCommand::Off => self.polarity.action_for(LedCommand::Off),
            _ => self.polarity.action_for(LedCommand::On),
        };
        self.state.arm(action, self.delay_ticks);
        if restarted {
            PressOutcome::Restarted(action)
        } else {
            PressOutcome::Armed(action)
        }
    }

    /// Completion check; returns the command whose event fired.
    pub fn poll(&mut self) -> Option<LedCommand> {
        self.unreported.take().or_else(|| self.take_fired())
    }

    fn take_fired(&mut self) -> Option<LedCommand> {
        let fired = if self.timer.flag(self.on_event) {
            LedCommand::On
        } else if self.timer.flag(self.off_event) {
            LedCommand::Off
        } else {
            return None;
        };
        for event in [self.on_event, self.off_event] {
            self.timer.clear_flag(event);
            self.timer.set_event_enabled(event, false);
        }
        self.state.complete().map(|_| fired)
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimSct;

    const CONFIG: DelayConfig = DelayConfig {
        event: EventId(0),
        delay_ticks: 100,
        polarity: Polarity::ActiveHigh,
        retrigger: RetriggerPolicy::Ignore,
        debounce_ms: 0,
    };

    #[test]
    fn delay_range_is_sixteen_bit_nonzero() {
        assert_eq!(check_delay(1), Ok(1));
        assert_eq!(check_delay(65_535), Ok(65_535));
        assert_eq!(check_delay(0), Err(Error::DelayOutOfRange { ticks: 0 }));
        assert_eq!(
            check_delay(65_536),
            Err(Error::DelayOutOfRange { ticks: 65_536 })
        );
    }

    #[test]
    fn alternator_starts_with_on() {
        let mut alt = Alternator::new();
        assert_eq!(alt.advance(), LedCommand::On);
        assert_eq!(alt.advance(), LedCommand::Off);
        assert_eq!(alt.advance(), LedCommand::On);
    }

    #[test]
    fn start_without_prepare_fails() {
        let mut delay = DelayedOutput::new(SimSct::new(false), &CONFIG);
        assert_eq!(delay.start(), Err(Error::NotPrepared));
        assert_eq!(delay.trigger(), Err(Error::NotPrepared));
    }

    #[test]
    fn out_of_range_arm_leaves_timer_untouched() {
        let mut delay = DelayedOutput::new(SimSct::new(false), &CONFIG);
        assert!(delay.arm(0, OutputAction::Set).is_err());
        assert!(!delay.timer().is_running());
        assert_eq!(delay.state(), OneShot::Idle);
    }

    #[test]
    fn ignore_policy_drops_press_while_running() {
        let mut delay = DelayedOutput::new(SimSct::new(false), &CONFIG);
        assert_eq!(
            delay.press_alternating(),
            Ok(PressOutcome::Armed(OutputAction::Set))
        );
        delay.timer_mut().advance(50);
        assert_eq!(delay.press_alternating(), Ok(PressOutcome::Ignored));
        delay.timer_mut().advance(50);
        assert_eq!(delay.poll(), Some(OutputAction::Set));
        assert!(delay.timer().output());
    }

    #[test]
    fn restart_policy_rearms_from_zero() {
        let config = DelayConfig {
            retrigger: RetriggerPolicy::Restart,
            ..CONFIG
        };
        let mut delay = DelayedOutput::new(SimSct::new(false), &config);
        delay.press_alternating().unwrap();
        delay.timer_mut().advance(90);
        assert_eq!(
            delay.press_alternating(),
            Ok(PressOutcome::Restarted(OutputAction::Set))
        );
        delay.timer_mut().advance(90);
        assert_eq!(delay.poll(), None);
        delay.timer_mut().advance(10);
        assert_eq!(delay.poll(), Some(OutputAction::Set));
    }

    #[test]
    fn prepared_transition_waits_for_trigger() {
        let mut delay = DelayedOutput::new(SimSct::new(false), &CONFIG);
        assert_eq!(delay.prepare_alternating(), Ok(LedCommand::On));
        delay.timer_mut().advance(1_000);
        assert_eq!(delay.on_interrupt(), None);

        assert_eq!(delay.trigger(), Ok(PressOutcome::Armed(OutputAction::Set)));
        delay.timer_mut().advance(100);
        assert_eq!(delay.on_interrupt(), Some(OutputAction::Set));

        assert_eq!(delay.prepare_alternating(), Ok(LedCommand::Off));
        delay.trigger().unwrap();
        delay.timer_mut().advance(100);
        assert_eq!(delay.on_interrupt(), Some(OutputAction::Clear));
        assert!(!delay.timer().output());
    }

    #[test]
    fn active_low_press_clears_the_pin() {
        let config = DelayConfig {
            polarity: Polarity::ActiveLow,
            ..CONFIG
        };
        let mut delay = DelayedOutput::new(SimSct::new(true), &config);
        delay.on_press(LedCommand::On).unwrap();
        delay.timer_mut().advance(100);
        assert_eq!(delay.poll(), Some(OutputAction::Clear));
        assert!(!delay.timer().output());
    }

    #[test]
    fn dual_event_enables_one_event_per_press() {
        let mut dual = DualEventDelay::new(
            SimSct::new(false),
            (EventId(0), EventId(1)),
            200,
            Polarity::ActiveHigh,
            RetriggerPolicy::Ignore,
        )
        .unwrap();
        assert_eq!(dual.timer().enabled_events(), 0);

        dual.on_press(LedCommand::On);
        assert_eq!(dual.timer().enabled_events(), 1);
        assert_eq!(dual.on_press(LedCommand::Off), PressOutcome::Ignored);
        dual.timer_mut().advance(200);
        assert_eq!(dual.poll(), Some(LedCommand::On));
        assert!(dual.timer().output());

        dual.on_press(LedCommand::Off);
        dual.timer_mut().advance(200);
        assert_eq!(dual.poll(), Some(LedCommand::Off));
        assert!(!dual.timer().output());
    }

    #[test]
    fn press_after_unpolled_match_keeps_the_completion() {
        let mut delay = DelayedOutput::new(SimSct::new(false), &CONFIG);
        delay.press_alternating().unwrap();
        delay.timer_mut().advance(100);

        assert_eq!(
            delay.press_alternating(),
            Ok(PressOutcome::Armed(OutputAction::Clear))
        );
        assert_eq!(delay.poll(), Some(OutputAction::Set));
        assert_eq!(delay.poll(), None);
        delay.timer_mut().advance(100);
        assert_eq!(delay.poll(), Some(OutputAction::Clear));
        assert_eq!(delay.timer().fired(), 2);
    }

    #[test]
    fn trigger_on_fired_delay_collects_instead_of_restarting() {
        let mut delay = DelayedOutput::new(SimSct::new(false), &CONFIG);
        delay.prepare_alternating().unwrap();
        delay.trigger().unwrap();
        delay.timer_mut().advance(100);

        assert_eq!(delay.trigger(), Ok(PressOutcome::Completed(OutputAction::Set)));
        assert!(!delay.timer().is_running());
        assert_eq!(delay.timer().pending_flags(), 0);
        assert_eq!(delay.on_interrupt(), Some(OutputAction::Set));

        delay.prepare_alternating().unwrap();
        assert_eq!(delay.trigger(), Ok(PressOutcome::Armed(OutputAction::Clear)));
        assert_eq!(delay.timer().count(), 0);
        delay.timer_mut().advance(99);
        assert_eq!(delay.on_interrupt(), None);
        delay.timer_mut().advance(1);
        assert_eq!(delay.on_interrupt(), Some(OutputAction::Clear));
    }

    #[test]
    fn trigger_restart_moves_completion_by_a_full_delay() {
        let config = DelayConfig {
            retrigger: RetriggerPolicy::Restart,
            ..CONFIG
        };
        let mut delay = DelayedOutput::new(SimSct::new(false), &config);
        delay.prepare_alternating().unwrap();
        assert_eq!(delay.trigger(), Ok(PressOutcome::Armed(OutputAction::Set)));
        delay.timer_mut().advance(60);

        assert_eq!(delay.trigger(), Ok(PressOutcome::Restarted(OutputAction::Set)));
        assert_eq!(delay.timer().count(), 0);
        delay.timer_mut().advance(99);
        assert_eq!(delay.on_interrupt(), None);
        assert!(!delay.timer().output());
        delay.timer_mut().advance(1);
        assert_eq!(delay.on_interrupt(), Some(OutputAction::Set));
        assert_eq!(delay.timer().fired(), 1);
    }

    #[test]
    fn trigger_ignore_leaves_running_delay_alone() {
        let mut delay = DelayedOutput::new(SimSct::new(false), &CONFIG);
        delay.prepare_alternating().unwrap();
        delay.trigger().unwrap();
        delay.timer_mut().advance(60);
        assert_eq!(delay.trigger(), Ok(PressOutcome::Ignored));
        assert_eq!(delay.timer().count(), 60);
        delay.timer_mut().advance(40);
        assert_eq!(delay.on_interrupt(), Some(OutputAction::Set));
    }

    #[test]
    fn dual_event_restart_moves_completion_by_a_full_delay() {
        let mut dual = DualEventDelay::new(
            SimSct::new(false),
            (EventId(0), EventId(1)),
            200,
            Polarity::ActiveHigh,
            RetriggerPolicy::Restart,
        )
        .unwrap();
        assert_eq!(dual.on_press(LedCommand::On), PressOutcome::Armed(OutputAction::Set));
        dual.timer_mut().advance(150);

        assert_eq!(
            dual.on_press(LedCommand::On),
            PressOutcome::Restarted(OutputAction::Set)
        );
        assert_eq!(dual.timer().count(), 0);
        dual.timer_mut().advance(199);
        assert_eq!(dual.poll(), None);
        dual.timer_mut().advance(1);
        assert_eq!(dual.poll(), Some(LedCommand::On));
        assert_eq!(dual.timer().fired(), 1);
    }

    #[test]
    fn dual_event_press_after_unpolled_match_keeps_the_completion() {
        let mut dual = DualEventDelay::new(
            SimSct::new(false),
            (EventId(0), EventId(1)),
            200,
            Polarity::ActiveHigh,
            RetriggerPolicy::Ignore,
        )
        .unwrap();
        dual.on_press(LedCommand::On);
        dual.timer_mut().advance(200);

        assert_eq!(dual.on_press(LedCommand::Off), PressOutcome::Armed(OutputAction::Clear));
        assert_eq!(dual.poll(), Some(LedCommand::On));
        dual.timer_mut().advance(200);
        assert_eq!(dual.poll(), Some(LedCommand::Off));
        assert!(!dual.timer().output());
    }
}
