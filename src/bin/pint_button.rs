//! Alakart Pin Interrupt
//! =============================================================================================
//!
//! PIO0_12 is attached to pin interrupt 1 and configured for falling edges.
//! The core sleeps between events; every edge is reported on the console.
//!
//! Hardware Connections:
//!   Alakart board
//!      SW2         -> PIO0_12 (active low, internal pull-up)
//!      USART0 TXD  -> PIO0_4, RXD -> PIO0_0 (115200 8N1)
//!
//! Features:
//! 1. PINT channel 1, falling-edge sensitive
//! 2. WFI idle loop, console output outside the handler

#![no_std] // Disable Rust standard library (required for embedded)
#![no_main] // Use the cortex-m-rt entry point instead of main

use core::fmt::Write;
use core::sync::atomic::{AtomicBool, Ordering};

use alakart_labs::board::{self, Shared};
use alakart_labs::config::pint_button as cfg;
use alakart_labs::hardware::usart::OVERSAMPLING;
use defmt::info;
use lpc8xx_hal::{
    Peripherals,
    cortex_m_rt::entry,
    init_state::Enabled,
    pac::{self, interrupt},
    pinint::{self, PININT1},
    pins::PIO0_12,
    prelude::*,
    usart,
};
use {defmt_rtt as _, panic_probe as _}; // Logging and panic handlers

type Sw2Interrupt = pinint::Interrupt<PININT1, PIO0_12, Enabled>;

static PIN_INTERRUPT: Shared<Sw2Interrupt> = Shared::new();
static EDGE: AtomicBool = AtomicBool::new(false);

#[entry]
fn main() -> ! {
    let p = Peripherals::take().unwrap();

    let mut syscon = p.SYSCON.split();
    let mut swm = p.SWM.split();
    let mut swm_handle = swm.handle;
    let gpio = p.GPIO;

    board::init_clocks(&mut syscon, &cfg::CLOCKS).unwrap_or_else(|e| board::halt(e));

    let baud = board::console_baud(&cfg::CLOCKS).unwrap_or_else(|e| board::halt(e));
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

    // SW2 pulls PIO0_12 low; GPIO input with the pull-up on
    p.IOCON.pio0_12.modify(|_, w| w.mode().pull_up());
    let _sw2 = p.pins.pio0_12.into_input_pin(gpio.tokens.pio0_12);

    let mut pint = p
        .PININT
        .enable(&mut syscon.handle)
        .interrupts
        .pinint1
        .select::<PIO0_12>(&mut syscon.handle);
    pint.enable_falling_edge();
    PIN_INTERRUPT.put(pint);
    board::unmask(pac::Interrupt::PIN_INT1);

    let _ = write!(console, "PINT Pin Interrupt events are configured\r\n");
    let _ = write!(console, "Press SW2 to generate events\r\n");
    info!("waiting for falling edges on PIO0_12");

    loop {
        cortex_m::asm::wfi();
        if EDGE.load(Ordering::Relaxed) {
            EDGE.store(false, Ordering::Relaxed);
            let _ = write!(
                console,
                "PINT Pin Interrupt {} event detected.\r\n",
                cfg::CHANNEL
            );
        }
    }
}

#[interrupt]
fn PIN_INT1() {
    PIN_INTERRUPT.with(|pint| pint.clear_falling_edge_flag());
    EDGE.store(true, Ordering::Relaxed);
}

/* Implementation Notes:
1. Pressing again before the main loop prints merges the two events into
   one line; nothing else is lost.
2. No debounce: a bouncing contact may print several lines per press.
3. The pin stays a GPIO input; the pin interrupt block samples it there.
*/
