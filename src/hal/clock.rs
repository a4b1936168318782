//! Clock Configuration HAL
//!
//! This module programs the SLCR clock generators feeding a GEM instance.
//! The transmit reference clock must follow the negotiated link speed
//! (125 MHz, 25 MHz or 2.5 MHz), so it is reprogrammed after every link
//! establishment from a [`ClockTable`] supplied by the board configuration.

use crate::driver::config::{GemInstance, Speed};
use crate::internal::register::RegisterBlock;
use crate::internal::register::slcr::{
    CLK_CTRL_EMIO, RCLK_CTRL_EMIO, RCLK_CTRL_MIO, SLCR_LOCK_KEY, SLCR_UNLOCK_KEY, SlcrRegs,
    clk_ctrl,
};

/// Clock configuration state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockState {
    /// Clock not configured
    #[default]
    Unconfigured,
    /// Clock programmed for a link speed
    Configured(Speed),
}

/// Routing of the GEM clocks and data pins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockRouting {
    /// RGMII on the MIO pins; the GEM reference clock register drives TX
    #[default]
    Mio,
    /// Routed through the PL (EMIO); TX clock comes from an FPGA clock register
    Emio {
        /// SLCR offset of the FPGA clock control register driving TX
        fpga_clock_offset: usize,
    },
}

/// One reference clock divisor setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockDivisor {
    /// First divisor (bits 13:8)
    pub divisor0: u8,
    /// Second divisor (bits 25:20)
    pub divisor1: u8,
    /// Source select (bits 6:4)
    pub source: u8,
}

impl ClockDivisor {
    /// Create a divisor setting
    #[must_use]
    pub const fn new(divisor0: u8, divisor1: u8, source: u8) -> Self {
        Self {
            divisor0,
            divisor1,
            source,
        }
    }

    /// Register encoding with the clock enabled
    #[must_use]
    pub const fn encode(&self) -> u32 {
        ((self.divisor1 as u32 & clk_ctrl::DIVISOR_MASK) << clk_ctrl::DIVISOR1_SHIFT)
            | ((self.divisor0 as u32 & clk_ctrl::DIVISOR_MASK) << clk_ctrl::DIVISOR0_SHIFT)
            | ((self.source as u32 & clk_ctrl::SRCSEL_MASK) << clk_ctrl::SRCSEL_SHIFT)
            | clk_ctrl::CLKACT
    }
}

/// Transmit clock divisors keyed by link speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockTable {
    /// 1000 Mbps (125 MHz)
    pub gigabit: ClockDivisor,
    /// 100 Mbps (25 MHz)
    pub fast: ClockDivisor,
    /// 10 Mbps (2.5 MHz)
    pub slow: ClockDivisor,
}

impl ClockTable {
    /// IO PLL running at 1000 MHz
    pub const IO_PLL_1000MHZ: Self = Self {
        gigabit: ClockDivisor::new(8, 1, 0),
        fast: ClockDivisor::new(40, 1, 0),
        slow: ClockDivisor::new(40, 10, 0),
    };

    /// EP107 emulation platform: fixed divisors, source select per speed
    pub const EP107: Self = Self {
        gigabit: ClockDivisor::new(48, 1, 1),
        fast: ClockDivisor::new(48, 1, 0),
        slow: ClockDivisor::new(48, 1, 3),
    };

    /// Divisor setting for `speed`
    #[must_use]
    pub const fn divisor(&self, speed: Speed) -> ClockDivisor {
        match speed {
            Speed::Mbps1000 => self.gigabit,
            Speed::Mbps100 => self.fast,
            Speed::Mbps10 => self.slow,
        }
    }
}

/// Clock controller for a GEM instance
///
/// Owns the SLCR register view and remembers the last programmed speed.
#[derive(Debug)]
pub struct ClockController<B> {
    regs: SlcrRegs<B>,
    state: ClockState,
}

impl<B: RegisterBlock> ClockController<B> {
    /// Create a new clock controller over the SLCR block
    pub const fn new(bus: B) -> Self {
        Self {
            regs: SlcrRegs::new(bus),
            state: ClockState::Unconfigured,
        }
    }

    /// Program RX routing and the TX reference clock for `speed`.
    ///
    /// The SLCR is unlocked for the duration of the writes and locked again
    /// before returning. Returns the TX clock register value written.
    pub fn configure(
        &mut self,
        instance: GemInstance,
        routing: ClockRouting,
        table: &ClockTable,
        speed: Speed,
    ) -> u32 {
        let value = table.divisor(speed).encode();
        {
            let slcr = self.unlock();
            let tx_clock_offset = match routing {
                ClockRouting::Mio => {
                    slcr.write_raw(instance.rx_clock_offset(), RCLK_CTRL_MIO);
                    instance.clock_offset()
                }
                ClockRouting::Emio { fpga_clock_offset } => {
                    slcr.write_raw(instance.rx_clock_offset(), RCLK_CTRL_EMIO);
                    slcr.write_raw(instance.clock_offset(), CLK_CTRL_EMIO);
                    fpga_clock_offset
                }
            };
            slcr.write_raw(tx_clock_offset, value);
        }
        self.state = ClockState::Configured(speed);
        value
    }

    /// Unlock the SLCR; it is locked again when the guard drops
    fn unlock(&self) -> SlcrUnlocked<'_, B> {
        self.regs.set_unlock(SLCR_UNLOCK_KEY);
        SlcrUnlocked { regs: &self.regs }
    }

    /// Get current clock state
    pub fn state(&self) -> ClockState {
        self.state
    }
}

/// Write access to the SLCR between unlock and lock.
struct SlcrUnlocked<'a, B: RegisterBlock> {
    regs: &'a SlcrRegs<B>,
}

impl<B: RegisterBlock> SlcrUnlocked<'_, B> {
    fn write_raw(&self, offset: usize, value: u32) {
        self.regs.write_raw(offset, value);
    }
}

impl<B: RegisterBlock> Drop for SlcrUnlocked<'_, B> {
    fn drop(&mut self) {
        self.regs.set_lock(SLCR_LOCK_KEY);
    }
}
