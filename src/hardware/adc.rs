//! 12-bit ADC0 with conversion sequence A.
//!
//! - CTRL: CLKDIV 7:0, LPWRMODE 10, CALMODE 30
//! - SEQA_CTRL: CHANNELS 11:0, TRIGGER 14:12, TRIGPOL 18, SYNCBYPASS 19,
//!   START 26, BURST 27, SINGLESTEP 28, MODE 30, SEQ_ENA 31
//! - DATn: RESULT 15:4, CHN 29:26, DATAVALID 31
//! - INTEN, FLAGS: SEQA_INT is bit 28 of FLAGS (write 1 to clear)
//! - TRM: VRANGE bit 5

use super::regs::{Registers, field};
use super::traits::AdcSequence;
use crate::error::{Error, Result};
use core::convert::Infallible;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Reg {
    Ctrl,
    SeqACtrl,
    Dat(u8),
    IntEn,
    Flags,
    Trm,
}

#[cfg(feature = "board")]
impl Registers for lpc8xx_hal::pac::ADC0 {
    type Reg = Reg;

    fn read(&self, reg: Reg) -> u32 {
        match reg {
            Reg::Ctrl => self.ctrl.read().bits(),
            Reg::SeqACtrl => self.seqa_ctrl.read().bits(),
            Reg::Dat(n) => self.dat[n as usize].read().bits(),
            Reg::IntEn => self.inten.read().bits(),
            Reg::Flags => self.flags.read().bits(),
            Reg::Trm => self.trm.read().bits(),
        }
    }

    fn write(&mut self, reg: Reg, value: u32) {
        // SAFETY: the driver only writes documented fields.
        match reg {
            Reg::Ctrl => self.ctrl.write(|w| unsafe { w.bits(value) }),
            Reg::SeqACtrl => self.seqa_ctrl.write(|w| unsafe { w.bits(value) }),
            // Data registers are read-only.
            Reg::Dat(_) => {}
            Reg::IntEn => self.inten.write(|w| unsafe { w.bits(value) }),
            Reg::Flags => self.flags.write(|w| unsafe { w.bits(value) }),
            Reg::Trm => self.trm.write(|w| unsafe { w.bits(value) }),
        }
    }
}

const CTRL_CALMODE: u32 = 1 << 30;
const CTRL_LPWRMODE: u32 = 1 << 10;

const SEQ_TRIGGER_SHIFT: u32 = 12;
const SEQ_TRIGPOL_POSITIVE: u32 = 1 << 18;
const SEQ_SYNCBYPASS: u32 = 1 << 19;
const SEQ_START: u32 = 1 << 26;
const SEQ_SINGLESTEP: u32 = 1 << 28;
const SEQ_MODE_END_OF_SEQUENCE: u32 = 1 << 30;
const SEQ_ENA: u32 = 1 << 31;

const DAT_VALID: u32 = 1 << 31;

const INTEN_SEQA: u32 = 1 << 0;
const FLAGS_SEQA_INT: u32 = 1 << 28;

const TRM_VRANGE_LOW: u32 = 1 << 5;

/// Clock used during self-calibration.
const CALIBRATION_HZ: u32 = 500_000;
/// Status polls before calibration is declared failed.
const CALIBRATION_POLLS: u32 = 100_000;

/// Hardware trigger inputs of a conversion sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    Software = 0,
    PinInt0 = 1,
    PinInt1 = 2,
    SctOut3 = 3,
    AcmpOut = 4,
    ArmTxev = 5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VoltageRange {
    /// 2.7 V to 3.6 V supply.
    High,
    /// 1.8 V to 2.7 V supply.
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcConfig {
    pub clock_divider: u8,
    pub low_power: bool,
    pub range: VoltageRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequenceConfig {
    pub channels: u16,
    pub trigger: Trigger,
    pub rising_edge: bool,
    pub single_step: bool,
    pub sync_bypass: bool,
    /// Interrupt once per sequence instead of once per conversion.
    pub end_of_sequence: bool,
}

impl SequenceConfig {
    fn bits(&self) -> u32 {
        let mut bits = (self.channels as u32 & 0xFFF) | ((self.trigger as u32) << SEQ_TRIGGER_SHIFT);
        if self.rising_edge {
            bits |= SEQ_TRIGPOL_POSITIVE;
        }
        if self.sync_bypass {
            bits |= SEQ_SYNCBYPASS;
        }
        if self.single_step {
            bits |= SEQ_SINGLESTEP;
        }
        if self.end_of_sequence {
            bits |= SEQ_MODE_END_OF_SEQUENCE;
        }
        bits
    }
}

/// Decoded data register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawResult {
    pub channel: u8,
    pub value: u16,
}

impl RawResult {
    fn decode(dat: u32) -> Option<Self> {
        if dat & DAT_VALID == 0 {
            return None;
        }
        Some(RawResult {
            channel: field(dat, 26, 4) as u8,
            value: field(dat, 4, 12) as u16,
        })
    }
}

pub struct Adc<R> {
    regs: R,
}

impl<R: Registers<Reg = Reg>> Adc<R> {
    /// The ADC clock must be enabled and the block powered.
    pub fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Hardware self-calibration, required after every reset.
    /// `system_hz` is the ADC bus clock.
    pub fn calibrate(&mut self, system_hz: u32) -> Result<()> {
        let divider = (system_hz / CALIBRATION_HZ).saturating_sub(1).min(0xFF);
        let saved = self.regs.read(Reg::Ctrl);
        self.regs.write(Reg::Ctrl, CTRL_CALMODE | divider);

        let mut polls = 0;
        while self.regs.read(Reg::Ctrl) & CTRL_CALMODE != 0 {
            polls += 1;
            if polls >= CALIBRATION_POLLS {
                self.regs.write(Reg::Ctrl, saved);
                return Err(Error::CalibrationTimeout);
            }
        }
        self.regs.write(Reg::Ctrl, saved);
        Ok(())
    }

    pub fn configure(&mut self, config: &AdcConfig) {
        let mut ctrl = config.clock_divider as u32;
        if config.low_power {
            ctrl |= CTRL_LPWRMODE;
        }
        self.regs.write(Reg::Ctrl, ctrl);
        match config.range {
            VoltageRange::High => self.regs.clear_bits(Reg::Trm, TRM_VRANGE_LOW),
            VoltageRange::Low => self.regs.set_bits(Reg::Trm, TRM_VRANGE_LOW),
        }
    }

    /// Program sequence A; enabling is a separate step.
    pub fn configure_sequence_a(&mut self, config: &SequenceConfig) {
        // Trigger settings may only change while the sequence is disabled.
        self.regs.write(Reg::SeqACtrl, config.bits());
    }

    pub fn enable_sequence_a(&mut self) {
        self.regs.set_bits(Reg::SeqACtrl, SEQ_ENA);
    }

    pub fn start_sequence_a(&mut self) {
        self.regs.set_bits(Reg::SeqACtrl, SEQ_START);
    }

    pub fn listen_sequence_a(&mut self) {
        self.regs.set_bits(Reg::IntEn, INTEN_SEQA);
    }

    /// Result of `channel` once its data register is valid.
    pub fn read_channel(&mut self, channel: u8) -> nb::Result<RawResult, Infallible> {
        let dat = self.regs.read(Reg::Dat(channel));
        RawResult::decode(dat).ok_or(nb::Error::WouldBlock)
    }
}

impl<R: Registers<Reg = Reg>> AdcSequence for Adc<R> {
    fn sequence_complete(&self) -> bool {
        self.regs.read(Reg::Flags) & FLAGS_SEQA_INT != 0
    }

    fn clear_sequence_complete(&mut self) {
        self.regs.write(Reg::Flags, FLAGS_SEQA_INT);
    }

    fn channel_result(&mut self, channel: u8) -> Option<u16> {
        self.read_channel(channel).ok().map(|r| r.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::regs::recording::RecordingRegisters;

    type Recorded = RecordingRegisters<Reg>;

    fn sct_triggered() -> SequenceConfig {
        SequenceConfig {
            channels: 1 << 1,
            trigger: Trigger::SctOut3,
            rising_edge: true,
            single_step: false,
            sync_bypass: false,
            end_of_sequence: true,
        }
    }

    #[test]
    fn calibration_times_out_when_calmode_sticks() {
        let mut adc = Adc::new(Recorded::new());
        // The recording registers never clear CALMODE by themselves.
        assert_eq!(adc.calibrate(30_000_000), Err(Error::CalibrationTimeout));
        assert_eq!(adc.regs.writes[0], (Reg::Ctrl, CTRL_CALMODE | 59));
        // CTRL is restored either way.
        assert_eq!(adc.regs.value(Reg::Ctrl), 0);
    }

    #[test]
    fn sequence_triggered_by_sct_out3_on_rising_edge() {
        let mut adc = Adc::new(Recorded::new());
        adc.configure_sequence_a(&sct_triggered());
        adc.enable_sequence_a();
        let bits = adc.regs.value(Reg::SeqACtrl);
        assert_eq!(bits & 0xFFF, 0b10);
        assert_eq!(field(bits, 12, 3), 3);
        assert_ne!(bits & SEQ_TRIGPOL_POSITIVE, 0);
        assert_ne!(bits & SEQ_MODE_END_OF_SEQUENCE, 0);
        assert_ne!(bits & SEQ_ENA, 0);
        // Enable comes after the trigger configuration.
        assert_eq!(adc.regs.writes.len(), 2);
    }

    #[test]
    fn software_start_keeps_the_hardware_trigger() {
        let mut adc = Adc::new(Recorded::new());
        adc.configure_sequence_a(&sct_triggered());
        adc.enable_sequence_a();
        adc.start_sequence_a();
        let bits = adc.regs.value(Reg::SeqACtrl);
        assert_ne!(bits & SEQ_START, 0);
        assert_ne!(bits & SEQ_ENA, 0);
        assert_eq!(field(bits, 12, 3), Trigger::SctOut3 as u32);
    }

    #[test]
    fn data_register_decodes_only_when_valid() {
        let dat = DAT_VALID | (1 << 26) | (2048 << 4);
        let mut adc = Adc::new(Recorded::new().preset(Reg::Dat(1), dat));
        assert_eq!(
            adc.read_channel(1),
            Ok(RawResult {
                channel: 1,
                value: 2048
            })
        );
        assert_eq!(adc.read_channel(2), Err(nb::Error::WouldBlock));
    }

    #[test]
    fn started_conversion_is_read_by_blocking() {
        let dat = DAT_VALID | (1 << 26) | (1234 << 4);
        let mut adc = Adc::new(Recorded::new().preset(Reg::Dat(1), dat));
        adc.start_sequence_a();
        assert_eq!(nb::block!(adc.read_channel(1)).map(|r| r.value), Ok(1234));
    }

    #[test]
    fn completion_flag_is_write_one_to_clear() {
        let mut adc = Adc::new(Recorded::new().preset(Reg::Flags, FLAGS_SEQA_INT));
        assert!(adc.sequence_complete());
        adc.clear_sequence_complete();
        assert_eq!(adc.regs.writes.last(), Some(&(Reg::Flags, FLAGS_SEQA_INT)));
    }
}
