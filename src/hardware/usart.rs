//! USART0 baud rate divider chain.
//!
//! The console itself is `lpc8xx_hal::usart`; this module picks the UARTCLKDIV,
//! fractional generator and BRG values handed to `usart::Clock` for a given
//! main clock.

use crate::error::{Error, Result};

/// Samples per bit, also handed to `usart::Clock::new`.
pub const OVERSAMPLING: u8 = 16;

/// Divider chain for one baud rate:
/// baud = main / clkdiv / (1 + frg_mult / 256) / 16 / (brg + 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BaudSettings {
    pub clock_divider: u8,
    pub frg_mult: u8,
    pub brg: u16,
}

impl BaudSettings {
    /// Settings for `baud` from a `main_hz` main clock, using UARTCLKDIV = 1
    /// and the fractional generator to trim the error.
    pub fn new(main_hz: u32, baud: u32) -> Result<Self> {
        let per_bit = baud as u64 * OVERSAMPLING as u64;
        if per_bit == 0 {
            return Err(Error::BaudUnreachable { baud });
        }
        let divisor = main_hz as u64 / per_bit;
        if divisor == 0 || divisor > 0x1_0000 {
            return Err(Error::BaudUnreachable { baud });
        }
        // U_PCLK the BRG needs; the FRG can only slow the clock down.
        let u_pclk = per_bit * divisor;
        let frg = (256 * (main_hz as u64 - u_pclk) + u_pclk / 2) / u_pclk;
        if frg > 0xFF {
            return Err(Error::BaudUnreachable { baud });
        }
        Ok(BaudSettings {
            clock_divider: 1,
            frg_mult: frg as u8,
            brg: (divisor - 1) as u16,
        })
    }

    /// Baud rate these settings produce from `main_hz`.
    pub fn actual(&self, main_hz: u32) -> u32 {
        let u_pclk = main_hz as u64 * 256
            / self.clock_divider as u64
            / (256 + self.frg_mult as u64);
        (u_pclk / OVERSAMPLING as u64 / (self.brg as u64 + 1)) as u32
    }
}
