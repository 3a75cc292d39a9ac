use super::traits::Button;
use crate::action::Polarity;
use embedded_hal::digital::InputPin;

pub struct GpioButton<P> {
    pin: P,
    polarity: Polarity,
}

impl<P: InputPin> GpioButton<P> {
    pub fn new(pin: P, polarity: Polarity) -> Self {
        Self { pin, polarity }
    }
}

impl<P: InputPin> Button for GpioButton<P> {
    fn is_pressed(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(high) => self.polarity.is_active(high),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimPin;
    use core::cell::Cell;

    #[test]
    fn polarity_decides_pressed_level() {
        let level = Cell::new(false);
        let pin = SimPin::new(&level);
        let mut high = GpioButton::new(pin, Polarity::ActiveHigh);
        let mut low = GpioButton::new(pin, Polarity::ActiveLow);
        assert!(!high.is_pressed());
        assert!(low.is_pressed());

        pin.set_level(true);
        assert!(high.is_pressed());
        assert!(!low.is_pressed());
    }
}
