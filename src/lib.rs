//! LPC824 (Alakart) laboratory exercises.
//!
//! The library holds everything the exercises share: drivers for the
//! peripherals `lpc8xx_hal` leaves to us (`hardware`), the one-shot delay
//! and button logic they are built around (`one_shot`, `delay`, `debounce`),
//! the ADC report formatting (`adc`) and the per-exercise settings (`config`).
//! Everything except `board` builds on the host, where `sim` stands in for
//! the SCT, ADC and GPIO pins.

#![cfg_attr(not(test), no_std)]

pub mod action;
pub mod adc;
pub mod config;
pub mod debounce;
pub mod delay;
pub mod error;
pub mod hardware;
pub mod one_shot;
pub mod sim;
pub mod tick;

#[cfg(feature = "board")]
pub mod board;

pub use error::{Error, Result};
