use super::traits::Led;
use crate::action::Polarity;
use embedded_hal::digital::StatefulOutputPin;

pub struct GpioLed<P> {
    pin: P,
    polarity: Polarity,
}

impl<P: StatefulOutputPin> GpioLed<P> {
    /// Wrap `pin` and drive it to the LED-off level.
    pub fn new(mut pin: P, polarity: Polarity) -> Self {
        let _ = pin.set_state(polarity.idle_level().into());
        Self { pin, polarity }
    }

    pub fn is_on(&mut self) -> bool {
        let high = self.pin.is_set_high().unwrap_or(false);
        self.polarity.is_active(high)
    }
}

impl<P: StatefulOutputPin> Led for GpioLed<P> {
    fn on(&mut self) {
        let _ = self.pin.set_state((!self.polarity.idle_level()).into());
    }

    fn off(&mut self) {
        let _ = self.pin.set_state(self.polarity.idle_level().into());
    }

    fn toggle(&mut self) {
        let _ = self.pin.toggle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimPin;
    use core::cell::Cell;

    #[test]
    fn active_low_led_starts_off_with_pin_high() {
        let level = Cell::new(false);
        let pin = SimPin::new(&level);
        let mut led = GpioLed::new(pin, Polarity::ActiveLow);
        assert!(pin.level());
        assert!(!led.is_on());

        led.on();
        assert!(!pin.level());
        assert!(led.is_on());

        led.toggle();
        assert!(!led.is_on());
    }
}
