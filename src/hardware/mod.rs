pub mod traits;

pub mod gpio_button;
pub mod gpio_led;

pub mod regs;

pub mod adc;
pub mod mrt;
pub mod sct;
pub mod syscon;
pub mod usart;
