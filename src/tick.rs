//! SysTick millisecond time base.
//!
//! The SysTick exception is the only writer of both counters below. ARMv6-M
//! has no atomic read-modify-write, so the handler updates them with a plain
//! load and store; readers only ever load.

use crate::error::{Error, Result};
use core::sync::atomic::{AtomicU32, Ordering};

/// SysTick counts down from a 24-bit reload value.
pub const SYSTICK_MAX_RELOAD: u32 = 0x00FF_FFFF;

/// Reload value for `rate_hz` SysTick interrupts from a `core_hz` core clock.
pub fn systick_reload(core_hz: u32, rate_hz: u32) -> Result<u32> {
    let ticks = core_hz / rate_hz.max(1);
    if ticks == 0 || ticks - 1 > SYSTICK_MAX_RELOAD {
        return Err(Error::ReloadOutOfRange {
            ticks,
            max: SYSTICK_MAX_RELOAD + 1,
        });
    }
    Ok(ticks - 1)
}

/// Milliseconds since the time base started, wrapping after about 49 days.
pub struct Millis {
    ms: AtomicU32,
}

impl Millis {
    pub const fn new() -> Self {
        Millis {
            ms: AtomicU32::new(0),
        }
    }

    /// Called once per millisecond from the SysTick handler.
    pub fn tick(&self) {
        let now = self.ms.load(Ordering::Relaxed);
        self.ms.store(now.wrapping_add(1), Ordering::Relaxed);
    }

    pub fn now(&self) -> u32 {
        self.ms.load(Ordering::Relaxed)
    }

    pub fn elapsed_since(&self, start: u32) -> u32 {
        self.now().wrapping_sub(start)
    }
}

impl Default for Millis {
    fn default() -> Self {
        Self::new()
    }
}

/// Millisecond countdown decremented by the SysTick handler.
pub struct Countdown {
    remaining: AtomicU32,
}

impl Countdown {
    pub const fn new() -> Self {
        Countdown {
            remaining: AtomicU32::new(0),
        }
    }

    pub fn start(&self, ms: u32) {
        self.remaining.store(ms, Ordering::Relaxed);
    }

    pub fn tick(&self) {
        let left = self.remaining.load(Ordering::Relaxed);
        if left > 0 {
            self.remaining.store(left - 1, Ordering::Relaxed);
        }
    }

    pub fn expired(&self) -> bool {
        self.remaining.load(Ordering::Relaxed) == 0
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_millisecond_reload() {
        assert_eq!(systick_reload(12_000_000, 1_000), Ok(11_999));
        assert_eq!(systick_reload(30_000_000, 1_000), Ok(29_999));
    }

    #[test]
    fn reload_beyond_24_bits_is_rejected() {
        // 1 Hz from 30 MHz needs 30 000 000 counts.
        assert_eq!(
            systick_reload(30_000_000, 1),
            Err(Error::ReloadOutOfRange {
                ticks: 30_000_000,
                max: SYSTICK_MAX_RELOAD + 1
            })
        );
        assert_eq!(systick_reload(16_777_216, 1), Ok(SYSTICK_MAX_RELOAD));
    }

    #[test]
    fn countdown_stops_at_zero() {
        let countdown = Countdown::new();
        countdown.start(2);
        countdown.tick();
        assert!(!countdown.expired());
        countdown.tick();
        countdown.tick();
        assert!(countdown.expired());
    }

    #[test]
    fn millis_wraps() {
        let millis = Millis::new();
        millis.ms.store(u32::MAX, Ordering::Relaxed);
        let start = millis.now();
        millis.tick();
        millis.tick();
        assert_eq!(millis.now(), 1);
        assert_eq!(millis.elapsed_since(start), 2);
    }
}
