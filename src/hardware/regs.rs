//! Register seam for the drivers the HAL does not cover (SCT, ADC, clock tree).
//!
//! Each driver names its registers with a small `Reg` enum and talks to them
//! through `Registers`. On the target the implementation is the `lpc8xx_hal`
//! PAC register block of that peripheral; host tests use `RecordingRegisters`
//! to check register sequences without hardware.

/// Word-wide access to the registers of one peripheral.
pub trait Registers {
    type Reg: Copy + Ord;

    fn read(&self, reg: Self::Reg) -> u32;

    fn write(&mut self, reg: Self::Reg, value: u32);

    /// Read-modify-write.
    fn modify(&mut self, reg: Self::Reg, f: impl FnOnce(u32) -> u32) {
        let value = self.read(reg);
        self.write(reg, f(value));
    }

    fn set_bits(&mut self, reg: Self::Reg, mask: u32) {
        self.modify(reg, |v| v | mask);
    }

    fn clear_bits(&mut self, reg: Self::Reg, mask: u32) {
        self.modify(reg, |v| v & !mask);
    }
}

/// Extract `width` bits of `value` starting at `shift`.
pub const fn field(value: u32, shift: u32, width: u32) -> u32 {
    (value >> shift) & ((1 << width) - 1)
}
