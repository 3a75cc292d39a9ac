//! ADC results as the exercises report them.
//!
//! A conversion is reported as a percentage of full scale using the fixed
//! factor 0.02442 (100 / 4095, rounded), truncated toward zero.

use crate::hardware::traits::AdcSequence;
use core::fmt::Write;
use heapless::String;

pub const FULL_SCALE: u16 = 4095;
pub const VREF_MV: u32 = 3300;

/// 0.02442 as a fraction over 100 000.
const PERCENT_NUM: u32 = 2442;
const PERCENT_DEN: u32 = 100_000;

pub const REPORT_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcReading {
    pub channel: u8,
    pub raw: u16,
}

impl AdcReading {
    pub fn percent(&self) -> u8 {
        percent(self.raw)
    }

    pub fn millivolts(&self) -> u32 {
        millivolts(self.raw)
    }

    /// Console line, e.g. `Ch 1 result = 50\r\n`.
    pub fn report_line(&self) -> String<REPORT_CAPACITY> {
        let mut line = String::new();
        // 28 bytes at most, always fits
        let _ = write!(line, "Ch {} result = {}\r\n", self.channel, self.percent());
        line
    }
}

pub fn percent(raw: u16) -> u8 {
    (raw.min(FULL_SCALE) as u32 * PERCENT_NUM / PERCENT_DEN) as u8
}

pub fn millivolts(raw: u16) -> u32 {
    raw.min(FULL_SCALE) as u32 * VREF_MV / FULL_SCALE as u32
}

/// Interrupt-side completion: if the sequence finished, read `channel` and
/// acknowledge the flag.
pub fn on_sequence_complete<A: AdcSequence>(adc: &mut A, channel: u8) -> Option<AdcReading> {
    if !adc.sequence_complete() {
        return None;
    }
    let raw = adc.channel_result(channel);
    adc.clear_sequence_complete();
    raw.map(|raw| AdcReading { channel, raw })
}
