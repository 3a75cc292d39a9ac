//! Alakart SCT Dual-Event Delay
//! =============================================================================================
//!
//! Variant of the one-shot delay that builds two match events once at start
//! up, one setting the green LED and one clearing it. Each press enables
//! exactly one of them and restarts counter L, so the event configuration is
//! never rewritten while the program runs.
//!
//! Hardware Connections:
//!   Alakart board
//!      B1 button   -> PIO0_25 (active high)
//!      Green LED   -> PIO0_27 (SCT_OUT2, active high)
//!      CLKOUT      -> PIO0_26 (main clock / 100)
//!
//! Features:
//! 1. 12 MHz from the PLL, SCT prescaler 250 -> 48 kHz counter ticks
//! 2. Event 0 sets OUT2, event 1 clears it, both at 60000 ticks
//! 3. Presses alternate between the two events

#![no_std] // Disable Rust standard library (required for embedded)
#![no_main] // Use the cortex-m-rt entry point instead of main

use alakart_labs::action::LedCommand;
use alakart_labs::board::{self, HalPin};
use alakart_labs::config::{outputs, sct_delay, sct_dual_event};
use alakart_labs::debounce::{Edge, EdgeSampler};
use alakart_labs::delay::{Alternator, DualEventDelay, PressOutcome};
use alakart_labs::hardware::gpio_button::GpioButton;
use alakart_labs::hardware::sct::{Counter, SctCounter};
use defmt::info;
use lpc8xx_hal::{
    CorePeripherals, Peripherals,
    cortex_m_rt::{entry, exception},
};
use {defmt_rtt as _, panic_probe as _}; // Logging and panic handlers

#[entry]
fn main() -> ! {
    let mut cp = CorePeripherals::take().unwrap();
    let p = Peripherals::take().unwrap();

    let mut syscon = p.SYSCON.split();
    let mut swm = p.SWM.split();
    let mut swm_handle = swm.handle;
    let gpio = p.GPIO;

    let system_hz = board::init_clocks(&mut syscon, &sct_dual_event::CLOCKS)
        .unwrap_or_else(|e| board::halt(e));
    swm.movable_functions
        .clkout
        .assign(p.pins.pio0_26.into_swm_pin(), &mut swm_handle);
    board::start_systick(&mut cp.SYST, system_hz).unwrap_or_else(|e| board::halt(e));
    info!("SCT dual-event delay");

    p.IOCON.pio0_25.modify(|_, w| w.mode().pull_down());
    let mut button = GpioButton::new(
        HalPin(p.pins.pio0_25.into_input_pin(gpio.tokens.pio0_25)),
        sct_delay::BUTTON_POLARITY,
    );

    let mut sct = board::sct(p.SCT0, &mut syscon.handle, &sct_dual_event::SCT);
    sct.set_output_level(outputs::GREEN, sct_dual_event::POLARITY.idle_level());
    swm.movable_functions
        .sct_out2
        .assign(p.pins.pio0_27.into_swm_pin(), &mut swm_handle);

    // Both events are created here and never rebuilt
    let mut delay = DualEventDelay::new(
        SctCounter::new(sct, Counter::L, outputs::GREEN),
        sct_dual_event::EVENTS,
        sct_dual_event::DELAY_TICKS,
        sct_dual_event::POLARITY,
        sct_dual_event::RETRIGGER,
    )
    .unwrap_or_else(|e| board::halt(e));

    let mut sampler = EdgeSampler::new(sct_dual_event::DEBOUNCE_MS);
    let mut alternator = Alternator::new();

    loop {
        if let Some(command) = delay.poll() {
            info!("event for {} fired", command);
            if command == LedCommand::Off {
                info!("LED off, next press turns it on");
            }
        }

        if let Some(Edge::Pressed) = sampler.poll(&mut button, board::MILLIS.now()) {
            let command = alternator.peek();
            match delay.on_press(command) {
                PressOutcome::Ignored => info!("press ignored, delay running"),
                outcome => {
                    alternator.advance();
                    info!("{} -> {}", command, outcome);
                }
            }
        }
    }
}

/// 1 ms time base for the debounce window
#[exception]
fn SysTick() {
    board::on_systick();
}

/* Implementation Notes:
1. Disabling an event is done through its state mask, so the unused event
   keeps its match value and output action.
2. Halting and clearing the counter before enabling the other event keeps
   a half-finished delay from firing the wrong action.
*/
