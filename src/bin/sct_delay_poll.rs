//! Alakart SCT One-Shot Delay (polling)
//! =============================================================================================
//!
//! Pressing button B1 arms a one second one-shot on SCT counter L. When the
//! counter reaches its match value the SCT itself switches the green LED and
//! halts; the main loop only notices afterwards by polling the event flag.
//! Successive presses alternate between "LED on" and "LED off".
//!
//! Hardware Connections:
//!   Alakart board
//!      B1 button   -> PIO0_25 (active high)
//!      Green LED   -> PIO0_27 (SCT_OUT2, active high)
//!      CLKOUT      -> PIO0_26 (main clock / 100)
//!      USART0 TXD  -> PIO0_4, RXD -> PIO0_0 (115200 8N1)
//!
//! Features:
//! 1. 12 MHz IRC, SCT prescaler 250 -> 48 kHz counter ticks
//! 2. 48000-tick match event: set or clear OUT2, then halt the counter
//! 3. Presses during a running delay are ignored
//! 4. 20 ms settle window against contact bounce

#![no_std] // Disable Rust standard library (required for embedded)
#![no_main] // Use the cortex-m-rt entry point instead of main

use core::fmt::Write;

use alakart_labs::board::{self, HalPin};
use alakart_labs::config::{outputs, sct_delay};
use alakart_labs::debounce::{Edge, EdgeSampler};
use alakart_labs::delay::{DelayedOutput, PressOutcome};
use alakart_labs::hardware::gpio_button::GpioButton;
use alakart_labs::hardware::sct::{Counter, SctCounter};
use alakart_labs::hardware::usart::OVERSAMPLING;
use defmt::{error, info};
use lpc8xx_hal::{
    CorePeripherals, Peripherals,
    cortex_m_rt::{entry, exception},
    prelude::*,
    usart,
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

    // Clock tree: IRC straight to the core, CLKOUT on PIO0_26
    let system_hz =
        board::init_clocks(&mut syscon, &sct_delay::CLOCKS).unwrap_or_else(|e| board::halt(e));
    swm.movable_functions
        .clkout
        .assign(p.pins.pio0_26.into_swm_pin(), &mut swm_handle);
    board::start_systick(&mut cp.SYST, system_hz).unwrap_or_else(|e| board::halt(e));

    // USART0 console on PIO0_0 / PIO0_4
    let baud = board::console_baud(&sct_delay::CLOCKS).unwrap_or_else(|e| board::halt(e));
    syscon.uartfrg.set_clkdiv(baud.clock_divider);
    syscon.uartfrg.set_frgmult(baud.frg_mult);
    syscon.uartfrg.set_frgdiv(0xff);
    let clock = usart::Clock::new(&syscon.uartfrg, baud.brg, OVERSAMPLING);
    let (rxd, _) = swm
        .movable_functions
        .u0_rxd
        .assign(p.pins.pio0_0.into_swm_pin(), &mut swm_handle);
    let (txd, _) = swm
        .movable_functions
        .u0_txd
        .assign(p.pins.pio0_4.into_swm_pin(), &mut swm_handle);
    let mut console =
        p.USART0
            .enable_async(&clock, &mut syscon.handle, rxd, txd, usart::Settings::default());
    let _ = write!(console, "SCT one-shot delay, polling\r\n");
    info!("SCT one-shot delay, polling");

    // B1 on PIO0_25 reads high while pressed
    p.IOCON.pio0_25.modify(|_, w| w.mode().pull_down());
    let mut button = GpioButton::new(
        HalPin(p.pins.pio0_25.into_input_pin(gpio.tokens.pio0_25)),
        sct_delay::BUTTON_POLARITY,
    );

    // Two 16-bit counters, only L is used here; OUT2 drives the green LED
    let mut sct = board::sct(p.SCT0, &mut syscon.handle, &sct_delay::SCT);
    sct.set_output_level(outputs::GREEN, sct_delay::POLL.polarity.idle_level());
    swm.movable_functions
        .sct_out2
        .assign(p.pins.pio0_27.into_swm_pin(), &mut swm_handle);

    let counter = SctCounter::new(sct, Counter::L, outputs::GREEN);
    let mut delay = DelayedOutput::new(counter, &sct_delay::POLL);
    let mut sampler = EdgeSampler::new(sct_delay::POLL.debounce_ms);

    info!(
        "delay {} ticks at {} Hz",
        sct_delay::POLL.delay_ticks,
        sct_delay::TIMING.tick_hz()
    );

    loop {
        // Match event flag -> delay complete, the SCT already moved the pin.
        // Checked before the button so a completed delay is never re-armed
        // without being reported.
        if let Some(action) = delay.poll() {
            let on = sct_delay::POLL
                .polarity
                .is_active(delay.timer().output_level());
            info!("delay complete: {}, LED {}", action, on);
            let _ = write!(console, "LED {}\r\n", if on { "on" } else { "off" });
        }

        // Button edge -> arm the next transition
        if let Some(Edge::Pressed) = sampler.poll(&mut button, board::MILLIS.now()) {
            match delay.press_alternating() {
                Ok(PressOutcome::Armed(action)) => info!("armed: {}", action),
                Ok(PressOutcome::Restarted(action)) => info!("restarted: {}", action),
                Ok(PressOutcome::Ignored) => info!("press ignored, delay running"),
                Ok(PressOutcome::Completed(action)) => {
                    info!("press found {} already done", action)
                }
                Err(e) => error!("arm failed: {}", e),
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
1. The match event halts counter L itself, so a missed poll only delays the
   log message, never the LED.
2. Every arm rewrites both the SET and CLR masks of OUT2 for event 0.
   A completion the loop has not polled yet is kept by the delay and
   reported on the next pass.
3. CLKOUT on PIO0_26 can be checked with a scope: 12 MHz / 100 = 120 kHz.
*/
