//! Per-exercise settings.
//!
//! Pin assignments live in each binary, where the HAL's typed pins name them.

use crate::action::Polarity;
use crate::delay::{DelayConfig, RetriggerPolicy};
use crate::hardware::adc::{AdcConfig, SequenceConfig, Trigger, VoltageRange};
use crate::hardware::sct::{SctConfig, SctTiming};
use crate::hardware::syscon::{ClockConfig, IRC_HZ};
use crate::hardware::traits::EventId;

pub const CONSOLE_BAUD: u32 = 115_200;
/// CLKOUT = main clock / 100, slow enough for a hand-held scope.
pub const CLKOUT_DIVIDER: u8 = 100;

/// SCT output numbers.
pub mod outputs {
    pub const GREEN: u8 = 2;
    pub const ADC_TRIGGER: u8 = 3;
    pub const BLUE: u8 = 4;
}

/// Button-driven one-shot delay on counter L.
///
/// 12 MHz IRC with the prescaler at 250 gives 48 000 ticks per second, so a
/// one second delay fits the 16-bit counter.
pub mod sct_delay {
    use super::*;

    pub const CLOCKS: ClockConfig = ClockConfig::irc().with_clkout(CLKOUT_DIVIDER);
    pub const PRESCALE: u8 = 249;
    pub const SCT: SctConfig = SctConfig::split(PRESCALE, PRESCALE);
    pub const TIMING: SctTiming = SctTiming {
        input_hz: IRC_HZ,
        prescale: PRESCALE,
    };
    pub const DELAY_TICKS: u16 = 48_000;

    /// Polling variant: presses during a delay are dropped.
    pub const POLL: DelayConfig = DelayConfig {
        event: EventId(0),
        delay_ticks: DELAY_TICKS,
        polarity: Polarity::ActiveHigh,
        retrigger: RetriggerPolicy::Ignore,
        debounce_ms: 20,
    };

    /// Interrupt variant: a press during a delay starts it over.
    pub const IRQ: DelayConfig = DelayConfig {
        event: EventId(0),
        delay_ticks: DELAY_TICKS,
        polarity: Polarity::ActiveHigh,
        retrigger: RetriggerPolicy::Restart,
        debounce_ms: 20,
    };

    pub const BUTTON_POLARITY: Polarity = Polarity::ActiveHigh;
}

/// Two pre-built events, one turning the LED on and one turning it off.
pub mod sct_dual_event {
    use super::*;

    pub const CLOCKS: ClockConfig = ClockConfig::pll(12_000_000, 1).with_clkout(CLKOUT_DIVIDER);
    pub const SCT: SctConfig = SctConfig::split(249, 249);
    pub const EVENTS: (EventId, EventId) = (EventId(0), EventId(1));
    /// 1.25 s at 48 kHz.
    pub const DELAY_TICKS: u32 = 60_000;
    pub const POLARITY: Polarity = Polarity::ActiveHigh;
    pub const RETRIGGER: RetriggerPolicy = RetriggerPolicy::Ignore;
    pub const DEBOUNCE_MS: u32 = 20;
}

/// Both LEDs switched from software, timed by SysTick.
pub mod sct_manual_systick {
    use super::*;

    pub const CLOCKS: ClockConfig = ClockConfig::irc().with_clkout(CLKOUT_DIVIDER);
    pub const SCT: SctConfig = SctConfig::split(249, 249);
    /// The LEDs on these outputs are wired active-low.
    pub const POLARITY: Polarity = Polarity::ActiveLow;
    pub const ON_MS: u32 = 1_000;
    pub const DEBOUNCE_MS: u32 = 200;
}

/// ADC sequence A started by SCT_OUT3, result mirrored as PWM duty on OUT4.
pub mod adc_sct_trigger {
    use super::*;

    /// 60 MHz PLL, 30 MHz system clock.
    pub const CLOCKS: ClockConfig = ClockConfig::pll(60_000_000, 2).with_clkout(CLKOUT_DIVIDER);
    /// Counter L at 120 kHz, counter H undivided for the PWM.
    pub const SCT: SctConfig = SctConfig::split(249, 0);
    /// OUT3 toggles every 5000 ticks; conversions start on its rising edge.
    pub const TRIGGER_TICKS: u16 = 5_000;
    pub const TRIGGER_EVENT: EventId = EventId(0);
    pub const PWM_EVENTS: (EventId, EventId) = (EventId(1), EventId(2));
    pub const PWM_HZ: u32 = 10_000;
    pub const CHANNEL: u8 = 1;

    pub const ADC: AdcConfig = AdcConfig {
        clock_divider: 1,
        low_power: false,
        range: VoltageRange::High,
    };

    pub const SEQUENCE: SequenceConfig = SequenceConfig {
        channels: 1 << CHANNEL,
        trigger: Trigger::SctOut3,
        rising_edge: true,
        single_step: false,
        sync_bypass: false,
        end_of_sequence: true,
    };

    /// PWM period in counter H ticks.
    pub const fn pwm_period_ticks() -> u16 {
        (CLOCKS.system_hz() / PWM_HZ) as u16
    }
}

/// MRT channel 0 blinking the blue LED.
pub mod mrt_blink {
    use super::*;

    pub const CLOCKS: ClockConfig = ClockConfig::pll(60_000_000, 2);
    pub const INTERRUPTS_PER_SECOND: u32 = 2;
    pub const LED_POLARITY: Polarity = Polarity::ActiveLow;
}

/// PIO0_12 falling edges through pin interrupt 1.
pub mod pint_button {
    use super::*;

    pub const CLOCKS: ClockConfig = ClockConfig::pll(60_000_000, 2);
    pub const CHANNEL: u8 = 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_second_is_48000_ticks() {
        assert_eq!(sct_delay::TIMING.tick_hz(), 48_000);
        assert_eq!(
            sct_delay::TIMING.ticks_for_millis(1_000),
            Ok(sct_delay::DELAY_TICKS)
        );
    }

    #[test]
    fn pwm_period_at_thirty_megahertz() {
        assert_eq!(adc_sct_trigger::CLOCKS.system_hz(), 30_000_000);
        assert_eq!(adc_sct_trigger::pwm_period_ticks(), 3_000);
    }

    #[test]
    fn exercise_clocks_are_reachable() {
        use crate::hardware::syscon::{MainClock, PllSettings};
        for clocks in [
            sct_dual_event::CLOCKS,
            adc_sct_trigger::CLOCKS,
            mrt_blink::CLOCKS,
            pint_button::CLOCKS,
        ] {
            if let MainClock::Pll(hz) = clocks.main {
                assert!(PllSettings::for_output(hz).is_ok(), "{hz} Hz");
            }
        }
    }
}
