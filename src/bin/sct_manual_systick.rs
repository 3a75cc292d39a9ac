//! Alakart SCT Outputs with SysTick Delay
//! =============================================================================================
//!
//! The SCT outputs are written directly by software here: on a press both
//! LEDs are switched on, held for one second with a SysTick countdown, then
//! switched off again, followed by a 200 ms pause that doubles as debounce.
//!
//! Hardware Connections:
//!   Alakart board
//!      B1 button   -> PIO0_25 (active high)
//!      Green LED   -> PIO0_27 (SCT_OUT2, active low)
//!      Blue LED    -> PIO0_16 (SCT_OUT4, active low)
//!
//! Features:
//! 1. SysTick at 1 kHz decrementing a millisecond countdown
//! 2. SCT OUTPUT register driven from the main loop, no match events

#![no_std] // Disable Rust standard library (required for embedded)
#![no_main] // Use the cortex-m-rt entry point instead of main

use alakart_labs::board::{self, HalPin};
use alakart_labs::config::{outputs, sct_delay, sct_manual_systick};
use alakart_labs::hardware::gpio_button::GpioButton;
use alakart_labs::hardware::sct::SctOutput;
use alakart_labs::hardware::traits::{Button, Led};
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

    let system_hz = board::init_clocks(&mut syscon, &sct_manual_systick::CLOCKS)
        .unwrap_or_else(|e| board::halt(e));
    swm.movable_functions
        .clkout
        .assign(p.pins.pio0_26.into_swm_pin(), &mut swm_handle);
    board::start_systick(&mut cp.SYST, system_hz).unwrap_or_else(|e| board::halt(e));
    info!("SCT outputs with SysTick delay");

    p.IOCON.pio0_25.modify(|_, w| w.mode().pull_down());
    let mut button = GpioButton::new(
        HalPin(p.pins.pio0_25.into_input_pin(gpio.tokens.pio0_25)),
        sct_delay::BUTTON_POLARITY,
    );

    let sct = board::sct(p.SCT0, &mut syscon.handle, &sct_manual_systick::SCT);
    swm.movable_functions
        .sct_out2
        .assign(p.pins.pio0_27.into_swm_pin(), &mut swm_handle);
    swm.movable_functions
        .sct_out4
        .assign(p.pins.pio0_16.into_swm_pin(), &mut swm_handle);

    // Both LEDs off (outputs high) from the start
    let mut leds = SctOutput::new(
        sct,
        &[outputs::GREEN, outputs::BLUE],
        sct_manual_systick::POLARITY,
    );

    loop {
        if button.is_pressed() {
            leds.on();
            info!("LEDs on");
            board::countdown_ms(sct_manual_systick::ON_MS);

            leds.off();
            info!("LEDs off");
            // Debounce delay
            board::countdown_ms(sct_manual_systick::DEBOUNCE_MS);
        }
    }
}

#[exception]
fn SysTick() {
    board::on_systick();
}

/* Implementation Notes:
1. A button held down re-triggers after the 200 ms pause, which is the
   intended "repeat while held" behaviour of this exercise.
2. The SysTick reload is checked against its 24-bit limit at start up.
*/
