//! Alakart MRT Blink
//! =============================================================================================
//!
//! Multi-rate timer channel 0 runs in repeat mode and expires twice per
//! second. The main loop waits on the channel and toggles the blue LED on
//! GPIO each time it expires.
//!
//! Hardware Connections:
//!   Alakart board
//!      Blue LED -> PIO0_16 (GPIO, active low)
//!
//! Features:
//! 1. 30 MHz system clock, 15 000 000-tick MRT interval (24-bit limit checked)
//! 2. MRT expiry -> LED toggle in the main loop

#![no_std] // Disable Rust standard library (required for embedded)
#![no_main] // Use the cortex-m-rt entry point instead of main

use alakart_labs::board::{self, HalPin};
use alakart_labs::config::mrt_blink as cfg;
use alakart_labs::hardware::gpio_led::GpioLed;
use alakart_labs::hardware::mrt::interval_for;
use alakart_labs::hardware::traits::Led;
use defmt::info;
use lpc8xx_hal::{Peripherals, cortex_m_rt::entry, gpio::Level, prelude::*};
use {defmt_rtt as _, panic_probe as _}; // Logging and panic handlers

#[entry]
fn main() -> ! {
    let p = Peripherals::take().unwrap();

    let mut syscon = p.SYSCON.split();
    let gpio = p.GPIO;

    let system_hz =
        board::init_clocks(&mut syscon, &cfg::CLOCKS).unwrap_or_else(|e| board::halt(e));

    // LED starts off
    let idle = if cfg::LED_POLARITY.idle_level() {
        Level::High
    } else {
        Level::Low
    };
    let pin = p.pins.pio0_16.into_output_pin(gpio.tokens.pio0_16, idle);
    let mut led = GpioLed::new(HalPin(pin), cfg::LED_POLARITY);

    // MRT runs from the system clock and reloads by itself
    let interval =
        interval_for(system_hz, cfg::INTERRUPTS_PER_SECOND).unwrap_or_else(|e| board::halt(e));
    let mut mrt = p.MRT0.split(&mut syscon.handle).mrt0;
    mrt.start(interval);
    info!("MRT channel 0 interval {} ticks", interval);

    loop {
        let Ok(()) = nb::block!(mrt.wait());
        led.toggle();
    }
}

/* Implementation Notes:
1. The MRT counts down and reloads by itself in repeat mode; `wait` only
   acknowledges the expiry flag.
2. At 60 MHz the same 2 Hz rate would need 30 000 000 ticks, which does not
   fit 24 bits and is rejected at start up.
*/
