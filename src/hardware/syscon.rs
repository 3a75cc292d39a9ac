//! Clock tree: IRC, system PLL, main clock select, core divider and CLKOUT.
//!
//! The Alakart board has no crystal, so every clock derives from the 12 MHz
//! internal RC oscillator (IRC), optionally multiplied by the system PLL.
//! Peripheral clock gates, resets and power switches belong to the HAL's
//! `syscon::Handle`; this module only drives the clock selection registers.

use super::regs::Registers;
use crate::error::{Error, Result};

pub const IRC_HZ: u32 = 12_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Reg {
    SysPllCtrl,
    SysPllStat,
    SysPllClkSel,
    SysPllClkUen,
    MainClkSel,
    MainClkUen,
    SysAhbClkDiv,
    ClkOutSel,
    ClkOutUen,
    ClkOutDiv,
}

#[cfg(feature = "board")]
impl Registers for &lpc8xx_hal::pac::syscon::RegisterBlock {
    type Reg = Reg;

    fn read(&self, reg: Reg) -> u32 {
        match reg {
            Reg::SysPllCtrl => self.syspllctrl.read().bits(),
            Reg::SysPllStat => self.syspllstat.read().bits(),
            Reg::SysPllClkSel => self.syspllclksel.read().bits(),
            Reg::SysPllClkUen => self.syspllclkuen.read().bits(),
            Reg::MainClkSel => self.mainclksel.read().bits(),
            Reg::MainClkUen => self.mainclkuen.read().bits(),
            Reg::SysAhbClkDiv => self.sysahbclkdiv.read().bits(),
            Reg::ClkOutSel => self.clkoutsel.read().bits(),
            Reg::ClkOutUen => self.clkoutuen.read().bits(),
            Reg::ClkOutDiv => self.clkoutdiv.read().bits(),
        }
    }

    fn write(&mut self, reg: Reg, value: u32) {
        // SAFETY: selector and divider values come from `ClockConfig` and
        // `PllSettings`, which only produce documented encodings.
        match reg {
            Reg::SysPllCtrl => self.syspllctrl.write(|w| unsafe { w.bits(value) }),
            Reg::SysPllStat => {}
            Reg::SysPllClkSel => self.syspllclksel.write(|w| unsafe { w.bits(value) }),
            Reg::SysPllClkUen => self.syspllclkuen.write(|w| unsafe { w.bits(value) }),
            Reg::MainClkSel => self.mainclksel.write(|w| unsafe { w.bits(value) }),
            Reg::MainClkUen => self.mainclkuen.write(|w| unsafe { w.bits(value) }),
            Reg::SysAhbClkDiv => self.sysahbclkdiv.write(|w| unsafe { w.bits(value) }),
            Reg::ClkOutSel => self.clkoutsel.write(|w| unsafe { w.bits(value) }),
            Reg::ClkOutUen => self.clkoutuen.write(|w| unsafe { w.bits(value) }),
            Reg::ClkOutDiv => self.clkoutdiv.write(|w| unsafe { w.bits(value) }),
        }
    }
}

const SYSPLLSTAT_LOCK: u32 = 1 << 0;
const MAINCLKSEL_IRC: u32 = 0;
const MAINCLKSEL_PLL_OUT: u32 = 3;
const CLKOUTSEL_MAIN: u32 = 3;

/// Source of the main clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MainClock {
    Irc,
    /// PLL output at the given frequency.
    Pll(u32),
}

/// Clock tree of one exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    pub main: MainClock,
    /// SYSAHBCLKDIV, system clock = main clock / divider.
    pub core_divider: u8,
    /// CLKOUT divider for scope measurements on PIO0_26; `None` leaves CLKOUT off.
    pub clkout_divider: Option<u8>,
}

impl ClockConfig {
    /// Reset configuration: 12 MHz IRC straight to the core.
    pub const fn irc() -> Self {
        ClockConfig {
            main: MainClock::Irc,
            core_divider: 1,
            clkout_divider: None,
        }
    }

    /// PLL at `pll_hz`, divided by `core_divider` for the system clock.
    pub const fn pll(pll_hz: u32, core_divider: u8) -> Self {
        ClockConfig {
            main: MainClock::Pll(pll_hz),
            core_divider,
            clkout_divider: None,
        }
    }

    pub const fn with_clkout(mut self, divider: u8) -> Self {
        self.clkout_divider = Some(divider);
        self
    }

    pub const fn main_hz(&self) -> u32 {
        match self.main {
            MainClock::Irc => IRC_HZ,
            MainClock::Pll(hz) => hz,
        }
    }

    /// System (core, SCT, MRT, ADC bus) clock frequency.
    pub const fn system_hz(&self) -> u32 {
        self.main_hz() / self.core_divider as u32
    }
}

/// SYSPLLCTRL settings: output = IRC * M, CCO = output * 2 * P.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PllSettings {
    pub m: u32,
    pub p: u32,
}

impl PllSettings {
    const CCO_MIN_HZ: u64 = 156_000_000;
    const CCO_MAX_HZ: u64 = 320_000_000;
    const OUT_MAX_HZ: u32 = 100_000_000;

    /// Pick M and P for an output of `hz`, which must be an integer multiple
    /// of the IRC frequency.
    pub fn for_output(hz: u32) -> Result<Self> {
        if hz == 0 || hz % IRC_HZ != 0 || hz > Self::OUT_MAX_HZ {
            return Err(Error::ClockUnreachable { hz });
        }
        let m = hz / IRC_HZ;
        if !(1..=32).contains(&m) {
            return Err(Error::ClockUnreachable { hz });
        }
        [1, 2, 4, 8]
            .into_iter()
            .find(|p| {
                let cco = hz as u64 * 2 * *p as u64;
                (Self::CCO_MIN_HZ..=Self::CCO_MAX_HZ).contains(&cco)
            })
            .map(|p| PllSettings { m, p })
            .ok_or(Error::ClockUnreachable { hz })
    }

    /// Register value: MSEL in bits 4:0, PSEL in bits 6:5.
    pub fn bits(&self) -> u32 {
        let psel = self.p.trailing_zeros();
        (self.m - 1) | (psel << 5)
    }
}

pub struct ClockTree<R> {
    regs: R,
}

impl<R: Registers<Reg = Reg>> ClockTree<R> {
    pub fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Apply `config` and return the system clock frequency.
    ///
    /// `pll_power(false)` / `pll_power(true)` must switch the PLL's power,
    /// it is called around the SYSPLLCTRL write.
    pub fn init(&mut self, config: &ClockConfig, mut pll_power: impl FnMut(bool)) -> Result<u32> {
        match config.main {
            MainClock::Irc => self.select_main(MAINCLKSEL_IRC),
            MainClock::Pll(hz) => {
                let pll = PllSettings::for_output(hz)?;
                self.regs.write(Reg::SysPllClkSel, 0);
                self.latch(Reg::SysPllClkUen);

                pll_power(false);
                self.regs.write(Reg::SysPllCtrl, pll.bits());
                pll_power(true);
                while self.regs.read(Reg::SysPllStat) & SYSPLLSTAT_LOCK == 0 {}

                self.select_main(MAINCLKSEL_PLL_OUT);
            }
        }
        self.regs
            .write(Reg::SysAhbClkDiv, config.core_divider.max(1) as u32);

        if let Some(divider) = config.clkout_divider {
            self.regs.write(Reg::ClkOutSel, CLKOUTSEL_MAIN);
            self.latch(Reg::ClkOutUen);
            self.regs.write(Reg::ClkOutDiv, divider as u32);
        }

        Ok(config.system_hz())
    }

    fn select_main(&mut self, source: u32) {
        self.regs.write(Reg::MainClkSel, source);
        self.latch(Reg::MainClkUen);
    }

    /// A selector change takes effect on a 0 then 1 write to its update enable.
    fn latch(&mut self, uen: Reg) {
        self.regs.write(uen, 0);
        self.regs.write(uen, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::regs::recording::RecordingRegisters;

    type Recorded = RecordingRegisters<Reg>;

    #[test]
    fn pll_settings_keep_cco_in_range() {
        assert_eq!(PllSettings::for_output(60_000_000), Ok(PllSettings { m: 5, p: 2 }));
        assert_eq!(PllSettings::for_output(24_000_000), Ok(PllSettings { m: 2, p: 4 }));
        assert_eq!(PllSettings::for_output(12_000_000), Ok(PllSettings { m: 1, p: 8 }));
        assert_eq!(PllSettings::for_output(60_000_000).unwrap().bits(), 0b01_00100);
    }

    #[test]
    fn pll_rejects_fractional_and_excessive_outputs() {
        assert_eq!(
            PllSettings::for_output(30_000_000),
            Err(Error::ClockUnreachable { hz: 30_000_000 })
        );
        assert!(PllSettings::for_output(120_000_000).is_err());
        assert!(PllSettings::for_output(0).is_err());
    }

    #[test]
    fn thirty_megahertz_core_from_sixty_megahertz_pll() {
        let config = ClockConfig::pll(60_000_000, 2);
        assert_eq!(config.system_hz(), 30_000_000);

        let mut tree = ClockTree::new(Recorded::new().preset(Reg::SysPllStat, SYSPLLSTAT_LOCK));
        let mut power = Vec::new();
        assert_eq!(tree.init(&config, |on| power.push(on)), Ok(30_000_000));
        assert_eq!(power, [false, true]);

        let regs = &tree.regs;
        assert_eq!(regs.value(Reg::SysPllCtrl), PllSettings { m: 5, p: 2 }.bits());
        assert_eq!(regs.value(Reg::MainClkSel), MAINCLKSEL_PLL_OUT);
        assert_eq!(regs.value(Reg::SysAhbClkDiv), 2);
        // Main clock switches only after the PLL was programmed.
        let ctrl = regs.writes_to(Reg::SysPllCtrl)[0];
        let main = regs.writes_to(Reg::MainClkSel)[0];
        assert!(ctrl < main);
    }

    #[test]
    fn irc_configuration_never_touches_pll() {
        let mut tree = ClockTree::new(Recorded::new());
        let mut powered = false;
        assert_eq!(tree.init(&ClockConfig::irc(), |_| powered = true), Ok(12_000_000));
        assert!(!powered);
        assert!(tree.regs.writes_to(Reg::SysPllCtrl).is_empty());
        assert_eq!(tree.regs.value(Reg::MainClkSel), MAINCLKSEL_IRC);
    }

    #[test]
    fn selectors_latch_with_zero_then_one() {
        let mut tree = ClockTree::new(Recorded::new());
        tree.init(&ClockConfig::irc().with_clkout(10), |_| {}).unwrap();
        let values: Vec<u32> = tree
            .regs
            .writes
            .iter()
            .filter(|(r, _)| *r == Reg::ClkOutUen)
            .map(|(_, v)| *v)
            .collect();
        assert_eq!(values, [0, 1]);
        assert_eq!(tree.regs.value(Reg::ClkOutSel), CLKOUTSEL_MAIN);
        assert_eq!(tree.regs.value(Reg::ClkOutDiv), 10);
    }

    #[test]
    fn unreachable_pll_leaves_main_clock_alone() {
        let mut tree = ClockTree::new(Recorded::new());
        assert!(tree.init(&ClockConfig::pll(15_000_000, 1), |_| {}).is_err());
        assert!(tree.regs.writes.is_empty());
    }
}
