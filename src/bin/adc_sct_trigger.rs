//! Alakart ADC Triggered by the SCT
//! =============================================================================================
//!
//! SCT counter L toggles output 3 every 5000 ticks. SCT_OUT3 is wired inside
//! the chip to the ADC trigger input, so every rising edge starts sequence A
//! on channel 1. The sequence-complete interrupt reads the result; the main
//! loop prints it as a percentage of full scale and uses the same value as
//! the duty cycle of a 10 kHz PWM on the blue LED.
//!
//! Hardware Connections:
//!   Alakart board
//!      Potentiometer -> PIO0_6 (ADC channel 1)
//!      Blue LED      -> PIO0_16 (SCT_OUT4, PWM)
//!      USART0 TXD    -> PIO0_4, RXD -> PIO0_0 (115200 8N1)
//!      CLKOUT        -> PIO0_26 (main clock / 100)
//!
//! Features:
//! 1. 60 MHz PLL, 30 MHz system clock
//! 2. Counter L at 120 kHz as a periodic ADC trigger (about 12 conversions/s)
//! 3. Counter H undivided as a 3000-tick PWM period
//! 4. "Ch 1 result = N" report lines on the serial console

#![no_std] // Disable Rust standard library (required for embedded)
#![no_main] // Use the cortex-m-rt entry point instead of main

use core::fmt::Write;
use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use alakart_labs::action::OutputAction;
use alakart_labs::adc::{AdcReading, on_sequence_complete};
use alakart_labs::board::{self, Shared};
use alakart_labs::config::{adc_sct_trigger as cfg, outputs};
use alakart_labs::hardware::adc::Adc;
use alakart_labs::hardware::sct::{Counter, SctCounter, SctPwm};
use alakart_labs::hardware::traits::{AdcSequence, MatchTimer};
use alakart_labs::hardware::usart::OVERSAMPLING;
use defmt::info;
use lpc8xx_hal::{
    Peripherals,
    cortex_m_rt::entry,
    pac::{self, interrupt},
    prelude::*,
    usart,
};
use {defmt_rtt as _, panic_probe as _}; // Logging and panic handlers

// ADC sequence A, used only by the interrupt handler after start up
static ADC: Shared<Adc<pac::ADC0>> = Shared::new();

// Latest raw result, handed from the handler to the main loop
static RESULT: AtomicU16 = AtomicU16::new(0);
static RESULT_READY: AtomicBool = AtomicBool::new(false);

#[entry]
fn main() -> ! {
    let p = Peripherals::take().unwrap();

    let mut syscon = p.SYSCON.split();
    let mut swm = p.SWM.split();
    let mut swm_handle = swm.handle;

    let system_hz =
        board::init_clocks(&mut syscon, &cfg::CLOCKS).unwrap_or_else(|e| board::halt(e));
    swm.movable_functions
        .clkout
        .assign(p.pins.pio0_26.into_swm_pin(), &mut swm_handle);

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
    let _ = write!(console, "ADC interrupt example.\r\n");

    // ADC: power, calibration, channel 1 on its fixed pin PIO0_6
    swm.fixed_functions
        .adc_1
        .assign(p.pins.pio0_6.into_swm_pin(), &mut swm_handle);
    p.IOCON.pio0_6.modify(|_, w| w.mode().inactive());
    let mut adc = board::adc(p.ADC.free(), &mut syscon.handle, system_hz);
    adc.configure(&cfg::ADC);
    adc.configure_sequence_a(&cfg::SEQUENCE);
    adc.enable_sequence_a();

    // One software-started conversion so the first line does not wait for OUT3
    adc.start_sequence_a();
    let Ok(result) = nb::block!(adc.read_channel(cfg::CHANNEL));
    let initial = AdcReading {
        channel: cfg::CHANNEL,
        raw: result.value,
    };
    adc.clear_sequence_complete();
    let _ = console.write_str(initial.report_line().as_str());
    adc.listen_sequence_a();

    // Counter L: periodic toggle of OUT3, the ADC trigger
    let sct = board::sct(p.SCT0, &mut syscon.handle, &cfg::SCT);
    let mut trigger = SctCounter::new(sct, Counter::L, outputs::ADC_TRIGGER);
    trigger.configure_periodic(cfg::TRIGGER_EVENT, cfg::TRIGGER_TICKS, OutputAction::Toggle);
    trigger.start();

    // Counter H: 10 kHz PWM on OUT4 (PIO0_16), duty follows the potentiometer
    let mut pwm = SctPwm::new(
        trigger.release(),
        Counter::H,
        outputs::BLUE,
        cfg::PWM_EVENTS,
        cfg::pwm_period_ticks(),
    );
    swm.movable_functions
        .sct_out4
        .assign(p.pins.pio0_16.into_swm_pin(), &mut swm_handle);
    pwm.set_duty_percent(initial.percent());
    pwm.start();

    ADC.put(adc);
    board::unmask(pac::Interrupt::ADC_SEQA);
    let _ = write!(console, "Configuration Done.\r\n\n");
    info!("ADC triggered by SCT_OUT3, PWM period {} ticks", cfg::pwm_period_ticks());

    loop {
        if RESULT_READY.load(Ordering::Relaxed) {
            RESULT_READY.store(false, Ordering::Relaxed);
            let reading = AdcReading {
                channel: cfg::CHANNEL,
                raw: RESULT.load(Ordering::Relaxed),
            };

            let _ = console.write_str(reading.report_line().as_str());
            pwm.set_duty_percent(reading.percent());
            info!(
                "raw {} -> {}% ({} mV)",
                reading.raw,
                reading.percent(),
                reading.millivolts()
            );
        }
        cortex_m::asm::wfi();
    }
}

#[interrupt]
fn ADC_SEQA() {
    if let Some(Some(reading)) = ADC.with(|adc| on_sequence_complete(adc, cfg::CHANNEL)) {
        RESULT.store(reading.raw, Ordering::Relaxed);
        RESULT_READY.store(true, Ordering::Relaxed);
    }
}

/* Implementation Notes:
1. Conversions have no timeout: if OUT3 stops toggling the console simply
   goes quiet. The first line comes from a software start before the SCT
   runs, so it is printed even then.
2. The scale factor 0.02442 is applied in integer arithmetic
   (raw * 2442 / 100000), so 4095 reports 99.
3. Results arriving faster than the main loop prints them overwrite each
   other; only the latest one is reported.
*/
