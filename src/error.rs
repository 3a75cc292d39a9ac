use core::fmt;

/// Errors reported by the configuration and driver functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A one-shot delay must be between 1 and 65535 counter ticks.
    DelayOutOfRange { ticks: u32 },
    /// The requested reload does not fit the counter width.
    ReloadOutOfRange { ticks: u32, max: u32 },
    /// The PLL cannot produce this main clock from the 12 MHz IRC.
    ClockUnreachable { hz: u32 },
    /// No USART divider setting reaches this baud rate.
    BaudUnreachable { baud: u32 },
    /// The ADC never cleared CALMODE.
    CalibrationTimeout,
    /// `start()` was called with no delay prepared.
    NotPrepared,
}

pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DelayOutOfRange { ticks } => {
                write!(f, "delay of {} ticks outside 1..=65535", ticks)
            }
            Error::ReloadOutOfRange { ticks, max } => {
                write!(f, "reload value {} exceeds {}", ticks, max)
            }
            Error::ClockUnreachable { hz } => write!(f, "main clock {} Hz unreachable", hz),
            Error::BaudUnreachable { baud } => write!(f, "baud rate {} unreachable", baud),
            Error::CalibrationTimeout => f.write_str("ADC calibration timed out"),
            Error::NotPrepared => f.write_str("no delay prepared"),
        }
    }
}
