//! Multi-rate timer reload limits. The channels are `lpc8xx_hal::mrt`.

use crate::error::{Error, Result};

/// Largest interval this firmware loads into a channel.
pub const MAX_INTERVAL: u32 = 0x00FF_FFFF;

/// Counter reload for `per_second` interrupts from a `clock_hz` input.
pub fn interval_for(clock_hz: u32, per_second: u32) -> Result<u32> {
    let ticks = clock_hz / per_second.max(1);
    if ticks == 0 || ticks > MAX_INTERVAL {
        return Err(Error::ReloadOutOfRange {
            ticks,
            max: MAX_INTERVAL,
        });
    }
    Ok(ticks)
}
