//! Target glue shared by the exercise binaries.
//!
//! Pins, switch matrix, USART, MRT and pin interrupts come straight from
//! `lpc8xx_hal`. The helpers here bring up what the HAL leaves to us: the
//! clock tree, the SCT and the ADC, each driven through its PAC register
//! block. State that an interrupt handler shares with the main loop goes into
//! a `Shared`.

use core::cell::RefCell;
use core::convert::Infallible;

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::{NVIC, SYST};
use defmt::{error, info};
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin, StatefulOutputPin};
use lpc8xx_hal::gpio::{GpioPin, direction};
use lpc8xx_hal::{pac, pins, syscon};

use crate::config::CONSOLE_BAUD;
use crate::error::{Error, Result};
use crate::hardware::adc::Adc;
use crate::hardware::sct::{Sct, SctConfig};
use crate::hardware::syscon::{ClockConfig, ClockTree};
use crate::hardware::usart::BaudSettings;
use crate::tick::{Countdown, Millis, systick_reload};

/// Milliseconds since `start_systick`.
pub static MILLIS: Millis = Millis::new();
/// Countdown for `sct_manual_systick`-style blocking delays.
pub static COUNTDOWN: Countdown = Countdown::new();

/// Value owned jointly by the main loop and an interrupt handler.
pub struct Shared<T> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Option<T>>>,
}

impl<T> Shared<T> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Install the value; done once, before the interrupt is unmasked.
    pub fn put(&self, value: T) {
        self.inner.lock(|cell| {
            cell.replace(Some(value));
        });
    }

    /// Run `f` on the value inside a critical section. `None` until `put`.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.inner.lock(|cell| cell.borrow_mut().as_mut().map(f))
    }
}

impl<T> Default for Shared<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply `config` to the clock tree and return the system clock frequency.
pub fn init_clocks(syscon: &mut syscon::Parts, config: &ClockConfig) -> Result<u32> {
    // SAFETY: the PLL, clock select and CLKOUT registers have no HAL owner;
    // `syscon::Parts` only covers gates, resets and power.
    let regs = unsafe { &*pac::SYSCON::ptr() };
    let handle = &mut syscon.handle;
    let syspll = &syscon.syspll;
    let system_hz = ClockTree::new(regs).init(config, |on| {
        if on {
            handle.power_up(syspll);
        } else {
            handle.power_down(syspll);
        }
    })?;
    info!(
        "clocks: main {} Hz, system {} Hz",
        config.main_hz(),
        system_hz
    );
    Ok(system_hz)
}

/// Divider chain for the USART0 console, 115200 8N1.
pub fn console_baud(config: &ClockConfig) -> Result<BaudSettings> {
    let settings = BaudSettings::new(config.main_hz(), CONSOLE_BAUD)?;
    info!(
        "console: {} baud requested, {} actual",
        CONSOLE_BAUD,
        settings.actual(config.main_hz())
    );
    Ok(settings)
}

/// SCT with its clock on, both counters halted and every event cleared.
pub fn sct(sct: pac::SCT0, handle: &mut syscon::Handle, config: &SctConfig) -> Sct<pac::SCT0> {
    handle.enable_clock(&sct);
    let mut sct = Sct::new(sct);
    sct.init(config);
    sct
}

/// Powered and calibrated ADC. A failed calibration is reported and the ADC
/// is used anyway.
pub fn adc(adc: pac::ADC0, handle: &mut syscon::Handle, system_hz: u32) -> Adc<pac::ADC0> {
    handle.enable_clock(&adc);
    handle.power_up(&adc);

    let mut adc = Adc::new(adc);
    match adc.calibrate(system_hz) {
        Ok(()) => info!("ADC calibration done"),
        Err(e) => error!("ADC calibration failed: {}", e),
    }
    adc
}

/// `embedded-hal` 1.0 view of an `lpc8xx_hal` GPIO pin, so `GpioLed` and
/// `GpioButton` work on the board the same way they do on `SimPin`.
pub struct HalPin<T: pins::Trait, D>(pub GpioPin<T, D>);

impl<T: pins::Trait, D> ErrorType for HalPin<T, D> {
    type Error = Infallible;
}

impl<T: pins::Trait> OutputPin for HalPin<T, direction::Output> {
    fn set_low(&mut self) -> core::result::Result<(), Infallible> {
        self.0.set_low();
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Infallible> {
        self.0.set_high();
        Ok(())
    }
}

impl<T: pins::Trait> StatefulOutputPin for HalPin<T, direction::Output> {
    fn is_set_high(&mut self) -> core::result::Result<bool, Infallible> {
        Ok(self.0.is_set_high())
    }

    fn is_set_low(&mut self) -> core::result::Result<bool, Infallible> {
        Ok(self.0.is_set_low())
    }
}

impl<T: pins::Trait> InputPin for HalPin<T, direction::Input> {
    fn is_high(&mut self) -> core::result::Result<bool, Infallible> {
        Ok(self.0.is_high())
    }

    fn is_low(&mut self) -> core::result::Result<bool, Infallible> {
        Ok(self.0.is_low())
    }
}

/// 1 kHz SysTick from the core clock, driving `MILLIS` and `COUNTDOWN`.
pub fn start_systick(syst: &mut SYST, core_hz: u32) -> Result<()> {
    let reload = systick_reload(core_hz, 1_000)?;
    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(reload);
    syst.clear_current();
    syst.enable_interrupt();
    syst.enable_counter();
    Ok(())
}

/// Body of the SysTick exception handler.
pub fn on_systick() {
    MILLIS.tick();
    COUNTDOWN.tick();
}

/// Sleep until `ms` milliseconds have passed. Needs `start_systick`.
pub fn delay_ms(ms: u32) {
    let start = MILLIS.now();
    while MILLIS.elapsed_since(start) < ms {
        cortex_m::asm::wfi();
    }
}

/// Blocking delay on the SysTick countdown.
pub fn countdown_ms(ms: u32) {
    COUNTDOWN.start(ms);
    while !COUNTDOWN.expired() {
        cortex_m::asm::wfi();
    }
}

/// Stop on a bring-up error that leaves nothing to run.
pub fn halt(err: Error) -> ! {
    defmt::panic!("bring-up failed: {}", err)
}

pub fn unmask(interrupt: pac::Interrupt) {
    // SAFETY: every handler in the exercises reaches shared state only
    // through `Shared` or atomics.
    unsafe { NVIC::unmask(interrupt) }
}
