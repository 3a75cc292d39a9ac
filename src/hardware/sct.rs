//! State configurable timer (SCT0).
//!
//! The exercises run the SCT as two independent 16-bit up-counters, L and H,
//! clocked from the system clock through an 8-bit prescaler. Match events are
//! mapped one-to-one onto match registers: event `n` compares against match
//! register `n` of the counter it belongs to.
//!
//! The driver works on any `Registers<Reg = Reg>`; on the target that is the
//! `pac::SCT0` register block.

use super::regs::Registers;
use super::traits::{EventId, Led, MatchTimer};
use crate::action::{OutputAction, Polarity};
use crate::error::{Error, Result};

/// SCT registers used by the driver. Split-mode registers carry the L half
/// in bits 15:0 and the H half in bits 31:16.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Reg {
    Config,
    Ctrl,
    Limit,
    Halt,
    Stop,
    Start,
    Output,
    Res,
    Even,
    EvFlag,
    Match(u8),
    MatchRel(u8),
    EvState(u8),
    EvCtrl(u8),
    OutSet(u8),
    OutClr(u8),
}

#[cfg(feature = "board")]
impl Registers for lpc8xx_hal::pac::SCT0 {
    type Reg = Reg;

    fn read(&self, reg: Reg) -> u32 {
        match reg {
            Reg::Config => self.config.read().bits(),
            Reg::Ctrl => self.ctrl.read().bits(),
            Reg::Limit => self.limit.read().bits(),
            Reg::Halt => self.halt.read().bits(),
            Reg::Stop => self.stop.read().bits(),
            Reg::Start => self.start.read().bits(),
            Reg::Output => self.output.read().bits(),
            Reg::Res => self.res.read().bits(),
            Reg::Even => self.even.read().bits(),
            Reg::EvFlag => self.evflag.read().bits(),
            Reg::Match(n) => self.match_[n as usize].read().bits(),
            Reg::MatchRel(n) => self.matchrel[n as usize].read().bits(),
            Reg::EvState(n) => self.ev[n as usize].ev_state.read().bits(),
            Reg::EvCtrl(n) => self.ev[n as usize].ev_ctrl.read().bits(),
            Reg::OutSet(n) => self.out[n as usize].out_set.read().bits(),
            Reg::OutClr(n) => self.out[n as usize].out_clr.read().bits(),
        }
    }

    fn write(&mut self, reg: Reg, value: u32) {
        // SAFETY: every SCT register accepts any 32-bit value; reserved bits
        // are never set by the driver.
        match reg {
            Reg::Config => self.config.write(|w| unsafe { w.bits(value) }),
            Reg::Ctrl => self.ctrl.write(|w| unsafe { w.bits(value) }),
            Reg::Limit => self.limit.write(|w| unsafe { w.bits(value) }),
            Reg::Halt => self.halt.write(|w| unsafe { w.bits(value) }),
            Reg::Stop => self.stop.write(|w| unsafe { w.bits(value) }),
            Reg::Start => self.start.write(|w| unsafe { w.bits(value) }),
            Reg::Output => self.output.write(|w| unsafe { w.bits(value) }),
            Reg::Res => self.res.write(|w| unsafe { w.bits(value) }),
            Reg::Even => self.even.write(|w| unsafe { w.bits(value) }),
            Reg::EvFlag => self.evflag.write(|w| unsafe { w.bits(value) }),
            Reg::Match(n) => self.match_[n as usize].write(|w| unsafe { w.bits(value) }),
            Reg::MatchRel(n) => self.matchrel[n as usize].write(|w| unsafe { w.bits(value) }),
            Reg::EvState(n) => self.ev[n as usize].ev_state.write(|w| unsafe { w.bits(value) }),
            Reg::EvCtrl(n) => self.ev[n as usize].ev_ctrl.write(|w| unsafe { w.bits(value) }),
            Reg::OutSet(n) => self.out[n as usize].out_set.write(|w| unsafe { w.bits(value) }),
            Reg::OutClr(n) => self.out[n as usize].out_clr.write(|w| unsafe { w.bits(value) }),
        }
    }
}

const CONFIG_UNIFY: u32 = 1 << 0;

const CTRL_STOP: u32 = 1 << 1;
const CTRL_HALT: u32 = 1 << 2;
const CTRL_CLRCTR: u32 = 1 << 3;
const CTRL_PRE_SHIFT: u32 = 5;

const EV_CTRL_HEVENT: u32 = 1 << 4;
const EV_CTRL_COMBMODE_MATCH: u32 = 1 << 12;

pub const EVENTS: u8 = 8;
pub const OUTPUTS: u8 = 6;

/// Counter half in split (16-bit) mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Counter {
    L,
    H,
}

impl Counter {
    const fn shift(self) -> u32 {
        match self {
            Counter::L => 0,
            Counter::H => 16,
        }
    }

    const fn half_mask(self) -> u32 {
        0xFFFF << self.shift()
    }
}

/// Output conflict resolution when an event both sets and clears an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    NoChange = 0,
    Set = 1,
    Clear = 2,
    Toggle = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SctConfig {
    /// Two 16-bit counters instead of one 32-bit counter.
    pub split: bool,
    pub prescale_l: u8,
    pub prescale_h: u8,
}

impl SctConfig {
    pub const fn split(prescale_l: u8, prescale_h: u8) -> Self {
        SctConfig {
            split: true,
            prescale_l,
            prescale_h,
        }
    }
}

/// Counter tick rate for a given SCT input clock and prescaler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SctTiming {
    pub input_hz: u32,
    /// The counter advances every `prescale + 1` input clocks.
    pub prescale: u8,
}

impl SctTiming {
    pub const fn tick_hz(&self) -> u32 {
        self.input_hz / (self.prescale as u32 + 1)
    }

    /// Ticks in `ms` milliseconds, checked against the 16-bit counter.
    pub fn ticks_for_millis(&self, ms: u32) -> Result<u16> {
        let ticks = self.tick_hz() as u64 * ms as u64 / 1000;
        match u16::try_from(ticks) {
            Ok(t) if t > 0 => Ok(t),
            _ => Err(Error::DelayOutOfRange {
                ticks: ticks.min(u32::MAX as u64) as u32,
            }),
        }
    }
}

pub struct Sct<R> {
    regs: R,
}

impl<R: Registers<Reg = Reg>> Sct<R> {
    /// The SCT clock must be enabled and its reset released.
    pub fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Configure clocking and counter width, halt both counters and clear
    /// every event, output action and flag.
    pub fn init(&mut self, config: &SctConfig) {
        let unify = if config.split { 0 } else { CONFIG_UNIFY };
        self.regs.write(Reg::Config, unify);

        let ctrl_l = CTRL_HALT | CTRL_CLRCTR | ((config.prescale_l as u32) << CTRL_PRE_SHIFT);
        let ctrl_h = CTRL_HALT | CTRL_CLRCTR | ((config.prescale_h as u32) << CTRL_PRE_SHIFT);
        self.regs.write(Reg::Ctrl, ctrl_l | (ctrl_h << 16));

        for reg in [Reg::Limit, Reg::Halt, Reg::Stop, Reg::Start, Reg::Even, Reg::Res] {
            self.regs.write(reg, 0);
        }
        for n in 0..EVENTS {
            self.regs.write(Reg::EvState(n), 0);
            self.regs.write(Reg::EvCtrl(n), 0);
        }
        for n in 0..OUTPUTS {
            self.regs.write(Reg::OutSet(n), 0);
            self.regs.write(Reg::OutClr(n), 0);
        }
        self.regs.write(Reg::EvFlag, 0xFF);
    }

    pub fn halt(&mut self, counter: Counter) {
        self.regs.set_bits(Reg::Ctrl, CTRL_HALT << counter.shift());
    }

    /// Reset the count of a halted counter to zero.
    pub fn clear_count(&mut self, counter: Counter) {
        self.regs.set_bits(Reg::Ctrl, CTRL_CLRCTR << counter.shift());
    }

    pub fn start(&mut self, counter: Counter) {
        self.regs
            .clear_bits(Reg::Ctrl, (CTRL_HALT | CTRL_STOP) << counter.shift());
    }

    pub fn is_running(&self, counter: Counter) -> bool {
        self.regs.read(Reg::Ctrl) & ((CTRL_HALT | CTRL_STOP) << counter.shift()) == 0
    }

    /// Write match register `index` and its reload register for `counter`.
    /// The counter must be halted.
    pub fn set_match(&mut self, counter: Counter, index: u8, value: u16) {
        self.write_half(Reg::Match(index), counter, value);
        self.set_match_reload(counter, index, value);
    }

    /// Write only the reload register; takes effect at the next limit.
    pub fn set_match_reload(&mut self, counter: Counter, index: u8, value: u16) {
        self.write_half(Reg::MatchRel(index), counter, value);
    }

    fn write_half(&mut self, reg: Reg, counter: Counter, value: u16) {
        let shift = counter.shift();
        self.regs.modify(reg, |v| {
            (v & !counter.half_mask()) | ((value as u32) << shift)
        });
    }

    /// Make `event` a pure match event on match register `event` of `counter`.
    pub fn configure_match_event(&mut self, event: EventId, counter: Counter) {
        let hevent = match counter {
            Counter::L => 0,
            Counter::H => EV_CTRL_HEVENT,
        };
        let ctrl = (event.0 as u32 & 0xF) | hevent | EV_CTRL_COMBMODE_MATCH;
        self.regs.write(Reg::EvCtrl(event.0), ctrl);
    }

    /// States in which `event` may fire; the exercises only use state 0.
    pub fn set_event_states(&mut self, event: EventId, states: u32) {
        self.regs.write(Reg::EvState(event.0), states);
    }

    /// Replace whatever `event` did to `output` with `action`.
    pub fn set_output_action(&mut self, output: u8, event: EventId, action: Option<OutputAction>) {
        let set = Reg::OutSet(output);
        let clr = Reg::OutClr(output);
        self.regs.clear_bits(set, event.mask());
        self.regs.clear_bits(clr, event.mask());
        match action {
            Some(OutputAction::Set) => self.regs.set_bits(set, event.mask()),
            Some(OutputAction::Clear) => self.regs.set_bits(clr, event.mask()),
            Some(OutputAction::Toggle) => {
                self.regs.set_bits(set, event.mask());
                self.regs.set_bits(clr, event.mask());
                self.set_resolution(output, Resolution::Toggle);
            }
            None => {}
        }
    }

    /// Remove `event` from the set (`true`) or clear (`false`) mask of `output`.
    pub fn drop_output_edge(&mut self, output: u8, event: EventId, set_edge: bool) {
        self.regs.clear_bits(Self::edge_reg(output, set_edge), event.mask());
    }

    /// Add `event` to the set (`true`) or clear (`false`) mask of `output`.
    pub fn add_output_edge(&mut self, output: u8, event: EventId, set_edge: bool) {
        self.regs.set_bits(Self::edge_reg(output, set_edge), event.mask());
    }

    fn edge_reg(output: u8, set_edge: bool) -> Reg {
        if set_edge {
            Reg::OutSet(output)
        } else {
            Reg::OutClr(output)
        }
    }

    pub fn set_resolution(&mut self, output: u8, resolution: Resolution) {
        let shift = 2 * output as u32;
        self.regs
            .modify(Reg::Res, |v| (v & !(0b11 << shift)) | ((resolution as u32) << shift));
    }

    /// Halt `counter` when `event` fires.
    pub fn set_halt_on(&mut self, counter: Counter, event: EventId, enabled: bool) {
        self.update_mask(Reg::Halt, counter, event, enabled);
    }

    /// Reset `counter` to zero when `event` fires.
    pub fn set_limit_on(&mut self, counter: Counter, event: EventId, enabled: bool) {
        self.update_mask(Reg::Limit, counter, event, enabled);
    }

    fn update_mask(&mut self, reg: Reg, counter: Counter, event: EventId, enabled: bool) {
        let mask = event.mask() << counter.shift();
        if enabled {
            self.regs.set_bits(reg, mask);
        } else {
            self.regs.clear_bits(reg, mask);
        }
    }

    pub fn flags(&self) -> u32 {
        self.regs.read(Reg::EvFlag)
    }

    pub fn clear_flags(&mut self, mask: u32) {
        self.regs.write(Reg::EvFlag, mask);
    }

    pub fn listen(&mut self, event: EventId) {
        self.regs.set_bits(Reg::Even, event.mask());
    }

    pub fn set_output_level(&mut self, output: u8, high: bool) {
        if high {
            self.regs.set_bits(Reg::Output, 1 << output);
        } else {
            self.regs.clear_bits(Reg::Output, 1 << output);
        }
    }

    pub fn output_level(&self, output: u8) -> bool {
        self.regs.read(Reg::Output) & (1 << output) != 0
    }
}

/// One counter half driving one output, as a `MatchTimer`.
pub struct SctCounter<R> {
    sct: Sct<R>,
    counter: Counter,
    output: u8,
}

impl<R: Registers<Reg = Reg>> SctCounter<R> {
    pub fn new(sct: Sct<R>, counter: Counter, output: u8) -> Self {
        Self {
            sct,
            counter,
            output,
        }
    }

    /// Free-running variant: the event resets the counter and keeps it
    /// running instead of halting it.
    pub fn configure_periodic(&mut self, event: EventId, ticks: u16, action: OutputAction) {
        self.configure(event, ticks, action);
        self.sct.set_halt_on(self.counter, event, false);
        self.sct.set_limit_on(self.counter, event, true);
        self.sct.set_event_states(event, 1);
    }

    /// Route the event's flag to the SCT interrupt.
    pub fn listen(&mut self, event: EventId) {
        self.sct.listen(event);
    }

    pub fn output_level(&self) -> bool {
        self.sct.output_level(self.output)
    }

    /// Give the SCT back, e.g. to set up the other counter half.
    pub fn release(self) -> Sct<R> {
        self.sct
    }
}

impl<R: Registers<Reg = Reg>> MatchTimer for SctCounter<R> {
    fn halt_and_clear(&mut self) {
        self.sct.halt(self.counter);
        self.sct.clear_count(self.counter);
    }

    fn start(&mut self) {
        self.sct.start(self.counter);
    }

    fn is_running(&self) -> bool {
        self.sct.is_running(self.counter)
    }

    fn configure(&mut self, event: EventId, ticks: u16, action: OutputAction) {
        self.sct.set_event_states(event, 0);
        self.sct.set_match(self.counter, event.0, ticks);
        self.sct.configure_match_event(event, self.counter);
        self.sct.set_output_action(self.output, event, Some(action));
        self.sct.set_limit_on(self.counter, event, false);
        self.sct.set_halt_on(self.counter, event, true);
    }

    fn set_event_enabled(&mut self, event: EventId, enabled: bool) {
        self.sct.set_event_states(event, if enabled { 1 } else { 0 });
    }

    fn clear_flag(&mut self, event: EventId) {
        self.sct.clear_flags(event.mask());
    }

    fn flag(&self, event: EventId) -> bool {
        self.sct.flags() & event.mask() != 0
    }
}

/// Edge-aligned PWM on one counter half.
///
/// `period` resets the counter and raises the output, `duty` lowers it.
pub struct SctPwm<R> {
    sct: Sct<R>,
    counter: Counter,
    output: u8,
    period: EventId,
    duty: EventId,
    period_ticks: u16,
}

impl<R: Registers<Reg = Reg>> SctPwm<R> {
    pub fn new(
        mut sct: Sct<R>,
        counter: Counter,
        output: u8,
        (period, duty): (EventId, EventId),
        period_ticks: u16,
    ) -> Self {
        sct.halt(counter);
        sct.clear_count(counter);

        // The counter wraps after matching, so a limit at N - 1 gives N counts.
        sct.set_match(counter, period.0, period_ticks.saturating_sub(1));
        sct.configure_match_event(period, counter);
        sct.set_limit_on(counter, period, true);
        sct.set_event_states(period, 1);

        sct.set_match(counter, duty.0, 0);
        sct.configure_match_event(duty, counter);
        sct.set_event_states(duty, 1);

        sct.set_output_action(output, period, None);
        sct.set_output_action(output, duty, None);
        sct.set_resolution(output, Resolution::Clear);

        let mut pwm = Self {
            sct,
            counter,
            output,
            period,
            duty,
            period_ticks,
        };
        pwm.set_duty_percent(0);
        pwm
    }

    /// Change the duty cycle; takes effect from the next period.
    pub fn set_duty_percent(&mut self, percent: u8) {
        let percent = percent.min(100) as u32;
        let ticks = (self.period_ticks as u32 * percent / 100) as u16;
        self.sct.set_match_reload(self.counter, self.duty.0, ticks);

        // 0 % never raises the output, 100 % never lowers it.
        if percent == 0 {
            self.sct.drop_output_edge(self.output, self.period, true);
        } else {
            self.sct.add_output_edge(self.output, self.period, true);
        }
        if percent == 100 {
            self.sct.drop_output_edge(self.output, self.duty, false);
        } else {
            self.sct.add_output_edge(self.output, self.duty, false);
        }
    }

    pub fn start(&mut self) {
        self.sct.start(self.counter);
    }
}

/// SCT outputs driven directly from software, switched together as one LED.
pub struct SctOutput<R> {
    sct: Sct<R>,
    mask: u32,
    polarity: Polarity,
}

impl<R: Registers<Reg = Reg>> SctOutput<R> {
    pub fn new(sct: Sct<R>, outputs: &[u8], polarity: Polarity) -> Self {
        let mask = outputs.iter().fold(0, |m, &o| m | (1 << o));
        let mut led = Self {
            sct,
            mask,
            polarity,
        };
        led.drive(polarity.idle_level());
        led
    }

    fn drive(&mut self, high: bool) {
        let mask = self.mask;
        self.sct
            .regs
            .modify(Reg::Output, |v| if high { v | mask } else { v & !mask });
    }
}

impl<R: Registers<Reg = Reg>> Led for SctOutput<R> {
    fn on(&mut self) {
        self.drive(!self.polarity.idle_level());
    }

    fn off(&mut self) {
        self.drive(self.polarity.idle_level());
    }

    fn toggle(&mut self) {
        let mask = self.mask;
        self.sct.regs.modify(Reg::Output, |v| v ^ mask);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::regs::recording::RecordingRegisters;

    type Recorded = RecordingRegisters<Reg>;

    fn split_sct() -> Sct<Recorded> {
        let mut sct = Sct::new(RecordingRegisters::new());
        sct.init(&SctConfig::split(249, 249));
        sct.regs.writes.clear();
        sct
    }

    #[test]
    fn init_halts_both_halves_with_prescaler() {
        let mut sct = Sct::new(Recorded::new());
        sct.init(&SctConfig::split(249, 9));
        assert_eq!(sct.regs.value(Reg::Config) & CONFIG_UNIFY, 0);
        let ctrl = sct.regs.value(Reg::Ctrl);
        assert_eq!((ctrl >> CTRL_PRE_SHIFT) & 0xFF, 249);
        assert_eq!((ctrl >> (16 + CTRL_PRE_SHIFT)) & 0xFF, 9);
        assert!(!sct.is_running(Counter::L));
        assert!(!sct.is_running(Counter::H));
        assert_eq!(sct.regs.value(Reg::EvFlag), 0xFF);
    }

    #[test]
    fn match_values_keep_the_other_half() {
        let mut sct = split_sct();
        sct.set_match(Counter::L, 0, 48_000);
        sct.set_match(Counter::H, 0, 1_000);
        assert_eq!(sct.regs.value(Reg::Match(0)), (1_000 << 16) | 48_000);
        assert_eq!(sct.regs.value(Reg::MatchRel(0)), (1_000 << 16) | 48_000);
    }

    #[test]
    fn arm_sequence_replaces_stale_output_action() {
        let mut counter = SctCounter::new(split_sct(), Counter::L, 2);
        let event = EventId(0);
        counter.configure(event, 100, OutputAction::Set);
        counter.configure(event, 100, OutputAction::Clear);

        let regs = &counter.sct.regs;
        assert_eq!(regs.value(Reg::OutSet(2)) & 1, 0);
        assert_eq!(regs.value(Reg::OutClr(2)) & 1, 1);
        assert_eq!(regs.value(Reg::Halt) & 1, 1);
        assert_eq!(regs.value(Reg::Limit) & 1, 0);
        assert_eq!(regs.value(Reg::EvCtrl(0)), EV_CTRL_COMBMODE_MATCH);
        // Left disabled until explicitly enabled.
        assert_eq!(regs.value(Reg::EvState(0)), 0);
    }

    #[test]
    fn toggle_sets_both_masks_and_resolution() {
        let mut counter = SctCounter::new(split_sct(), Counter::L, 3);
        counter.configure_periodic(EventId(0), 5_000, OutputAction::Toggle);
        let regs = &counter.sct.regs;
        assert_eq!(regs.value(Reg::OutSet(3)), 1);
        assert_eq!(regs.value(Reg::OutClr(3)), 1);
        assert_eq!((regs.value(Reg::Res) >> 6) & 0b11, Resolution::Toggle as u32);
        assert_eq!(regs.value(Reg::Limit), 1);
        assert_eq!(regs.value(Reg::Halt), 0);
        assert_eq!(regs.value(Reg::EvState(0)), 1);
    }

    #[test]
    fn h_counter_events_use_upper_halfword() {
        let mut counter = SctCounter::new(split_sct(), Counter::H, 4);
        counter.configure(EventId(1), 10, OutputAction::Set);
        let regs = &counter.sct.regs;
        assert_eq!(regs.value(Reg::Halt), 1 << 17);
        assert_eq!(
            regs.value(Reg::EvCtrl(1)),
            1 | EV_CTRL_HEVENT | EV_CTRL_COMBMODE_MATCH
        );
        assert_eq!(regs.value(Reg::Match(1)), 10 << 16);
    }

    #[test]
    fn start_and_halt_only_touch_their_half() {
        let mut sct = split_sct();
        sct.start(Counter::H);
        assert!(sct.is_running(Counter::H));
        assert!(!sct.is_running(Counter::L));
        sct.halt(Counter::H);
        assert!(!sct.is_running(Counter::H));
    }

    #[test]
    fn halt_and_clear_resets_the_count_of_its_half() {
        let mut counter = SctCounter::new(split_sct(), Counter::L, 2);
        counter.start();
        counter.halt_and_clear();
        let ctrl = counter.sct.regs.value(Reg::Ctrl);
        assert_ne!(ctrl & CTRL_HALT, 0);
        assert_ne!(ctrl & CTRL_CLRCTR, 0);
        assert!(!counter.is_running());
    }

    #[test]
    fn flags_clear_by_writing_ones() {
        let mut counter = SctCounter::new(split_sct(), Counter::L, 2);
        counter.sct.regs.regs.insert(Reg::EvFlag, 0b10);
        assert!(counter.flag(EventId(1)));
        assert!(!counter.flag(EventId(0)));
        counter.clear_flag(EventId(1));
        assert_eq!(counter.sct.regs.writes.last(), Some(&(Reg::EvFlag, 0b10)));
    }

    #[test]
    fn pwm_period_counts_exactly_period_ticks() {
        let pwm = SctPwm::new(split_sct(), Counter::H, 4, (EventId(1), EventId(2)), 3_000);
        let regs = &pwm.sct.regs;
        assert_eq!(regs.value(Reg::Match(1)) >> 16, 2_999);
        assert_eq!(regs.value(Reg::MatchRel(1)) >> 16, 2_999);
        assert_eq!(regs.value(Reg::Limit), 1 << (16 + 1));
    }

    #[test]
    fn pwm_duty_extremes_drop_an_edge() {
        let mut pwm = SctPwm::new(split_sct(), Counter::H, 4, (EventId(1), EventId(2)), 3_000);
        assert_eq!(pwm.sct.regs.value(Reg::OutSet(4)), 0);

        pwm.set_duty_percent(25);
        let regs = &pwm.sct.regs;
        assert_eq!(regs.value(Reg::MatchRel(2)) >> 16, 750);
        assert_eq!(regs.value(Reg::OutSet(4)), 1 << 1);
        assert_eq!(regs.value(Reg::OutClr(4)), 1 << 2);

        pwm.set_duty_percent(100);
        assert_eq!(pwm.sct.regs.value(Reg::OutClr(4)), 0);
    }

    #[test]
    fn timing_matches_alakart_prescaler() {
        let timing = SctTiming {
            input_hz: 12_000_000,
            prescale: 249,
        };
        assert_eq!(timing.tick_hz(), 48_000);
        assert_eq!(timing.ticks_for_millis(1000), Ok(48_000));
        assert_eq!(
            timing.ticks_for_millis(2000),
            Err(Error::DelayOutOfRange { ticks: 96_000 })
        );
        assert!(timing.ticks_for_millis(0).is_err());
    }

    #[test]
    fn sct_outputs_switch_together_with_polarity() {
        let mut led = SctOutput::new(split_sct(), &[2, 4], Polarity::ActiveLow);
        assert_eq!(led.sct.regs.value(Reg::Output), 0b1_0100);
        led.on();
        assert_eq!(led.sct.regs.value(Reg::Output), 0);
        led.toggle();
        assert!(led.sct.output_level(2));
        assert!(led.sct.output_level(4));
        assert!(!led.sct.output_level(3));
    }
}
