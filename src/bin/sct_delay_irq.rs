//! Alakart SCT One-Shot Delay (interrupt)
//! =============================================================================================
//!
//! Same LED behaviour as `sct_delay_poll`, but completion is handled in the
//! SCT interrupt. The handler immediately prepares the opposite transition,
//! so a button press only has to release the counter.
//!
//! Hardware Connections:
//!   Alakart board
//!      B1 button   -> PIO0_25 (active high)
//!      Green LED   -> PIO0_27 (SCT_OUT2, active high)
//!      USART0 TXD  -> PIO0_4, RXD -> PIO0_0 (115200 8N1)
//!
//! Features:
//! 1. 48000-tick one-shot on counter L, event 0 routed to the SCT interrupt
//! 2. Next on/off transition pre-installed from the interrupt handler
//! 3. A press during a running delay restarts it from zero

#![no_std] // Disable Rust standard library (required for embedded)
#![no_main] // Use the cortex-m-rt entry point instead of main

use core::fmt::Write;
use core::sync::atomic::{AtomicBool, Ordering};

use alakart_labs::board::{self, HalPin, Shared};
use alakart_labs::config::{outputs, sct_delay};
use alakart_labs::debounce::{Edge, EdgeSampler};
use alakart_labs::delay::{DelayedOutput, PressOutcome};
use alakart_labs::hardware::gpio_button::GpioButton;
use alakart_labs::hardware::sct::{Counter, SctCounter};
use alakart_labs::hardware::usart::OVERSAMPLING;
use defmt::{error, info, warn};
use lpc8xx_hal::{
    CorePeripherals, Peripherals,
    cortex_m_rt::{entry, exception},
    pac::{self, interrupt},
    prelude::*,
    usart,
};
use {defmt_rtt as _, panic_probe as _}; // Logging and panic handlers

// Delay state, owned by main loop and SCT handler together
static DELAY: Shared<DelayedOutput<SctCounter<pac::SCT0>>> = Shared::new();

// Set by the handler on completion, cleared by the main loop
static COMPLETED: AtomicBool = AtomicBool::new(false);
static LED_ON: AtomicBool = AtomicBool::new(false);

#[entry]
fn main() -> ! {
    let mut cp = CorePeripherals::take().unwrap();
    let p = Peripherals::take().unwrap();

    let mut syscon = p.SYSCON.split();
    let mut swm = p.SWM.split();
    let mut swm_handle = swm.handle;
    let gpio = p.GPIO;

    let system_hz =
        board::init_clocks(&mut syscon, &sct_delay::CLOCKS).unwrap_or_else(|e| board::halt(e));
    board::start_systick(&mut cp.SYST, system_hz).unwrap_or_else(|e| board::halt(e));

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
    let _ = write!(console, "SCT one-shot delay, interrupt\r\n");
    info!("SCT one-shot delay, interrupt");

    p.IOCON.pio0_25.modify(|_, w| w.mode().pull_down());
    let mut button = GpioButton::new(
        HalPin(p.pins.pio0_25.into_input_pin(gpio.tokens.pio0_25)),
        sct_delay::BUTTON_POLARITY,
    );

    let mut sct = board::sct(p.SCT0, &mut syscon.handle, &sct_delay::SCT);
    sct.set_output_level(outputs::GREEN, sct_delay::IRQ.polarity.idle_level());
    swm.movable_functions
        .sct_out2
        .assign(p.pins.pio0_27.into_swm_pin(), &mut swm_handle);

    let mut counter = SctCounter::new(sct, Counter::L, outputs::GREEN);
    counter.listen(sct_delay::IRQ.event);

    // First transition (LED on) is ready before the first press
    let mut delay = DelayedOutput::new(counter, &sct_delay::IRQ);
    if let Err(e) = delay.prepare_alternating() {
        board::halt(e);
    }
    DELAY.put(delay);
    board::unmask(pac::Interrupt::SCT);

    let mut sampler = EdgeSampler::new(sct_delay::IRQ.debounce_ms);

    loop {
        if let Some(Edge::Pressed) = sampler.poll(&mut button, board::MILLIS.now()) {
            match DELAY.with(|delay| delay.trigger()) {
                Some(Ok(PressOutcome::Armed(action))) => info!("started: {}", action),
                Some(Ok(PressOutcome::Restarted(action))) => info!("restarted: {}", action),
                Some(Ok(PressOutcome::Ignored)) => info!("press ignored"),
                // The handler reports it once it runs
                Some(Ok(PressOutcome::Completed(action))) => info!("{} already done", action),
                Some(Err(e)) => warn!("nothing prepared: {}", e),
                None => error!("delay state missing"),
            }
        }

        if COMPLETED.load(Ordering::Relaxed) {
            COMPLETED.store(false, Ordering::Relaxed);
            let on = LED_ON.load(Ordering::Relaxed);
            info!("delay complete, LED {}", on);
            let _ = write!(console, "LED {}\r\n", if on { "on" } else { "off" });
        }
    }
}

#[interrupt]
fn SCT() {
    DELAY.with(|delay| {
        if delay.on_interrupt().is_none() {
            return;
        }
        let level = delay.timer().output_level();
        LED_ON.store(sct_delay::IRQ.polarity.is_active(level), Ordering::Relaxed);
        COMPLETED.store(true, Ordering::Relaxed);

        // Pre-install the opposite transition for the next press
        if let Err(e) = delay.prepare_alternating() {
            error!("prepare failed: {}", e);
        }
    });
}

/// 1 ms time base for the debounce window
#[exception]
fn SysTick() {
    board::on_systick();
}

/* Implementation Notes:
1. The handler and the main loop reach the delay only inside a critical
   section (`Shared`), so a press can never interleave with a completion.
2. COMPLETED has one producer (the SCT handler) and one consumer (main).
3. Printing happens in the main loop; the handler never waits on the USART.
*/
