//! Push-button edge detection.
//!
//! `EdgeSampler` latches the pressed state so a held button reports a single
//! press. After every reported edge the input is ignored for `settle_ms`,
//! which swallows contact bounce on both closing and opening.

use crate::hardware::traits::Button;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Pressed,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeSampler {
    pressed: bool,
    settle_ms: u32,
    last_edge_ms: Option<u32>,
}

impl EdgeSampler {
    pub const fn new(settle_ms: u32) -> Self {
        EdgeSampler {
            pressed: false,
            settle_ms,
            last_edge_ms: None,
        }
    }

    /// Feed one reading of the logical button level taken at `now_ms`.
    pub fn sample(&mut self, active: bool, now_ms: u32) -> Option<Edge> {
        if let Some(at) = self.last_edge_ms {
            // wrapping_sub keeps working across the u32 millisecond rollover
            if now_ms.wrapping_sub(at) < self.settle_ms {
                return None;
            }
        }
        let edge = match (self.pressed, active) {
            (false, true) => Edge::Pressed,
            (true, false) => Edge::Released,
            _ => return None,
        };
        self.pressed = active;
        self.last_edge_ms = Some(now_ms);
        Some(edge)
    }

    pub fn poll<B: Button>(&mut self, button: &mut B, now_ms: u32) -> Option<Edge> {
        self.sample(button.is_pressed(), now_ms)
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}
