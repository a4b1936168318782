//! SLCR (System Level Control Registers) used for GEM clocking
//!
//! Clock control registers are write-protected; every write must be
//! bracketed by an unlock/lock key pair.

use super::{RegisterBlock, reg_rw, reg_wo};

/// SLCR register block base address
pub const SLCR_BASE: usize = 0xF800_0000;

/// SLCR write-protection lock register offset
pub const SLCR_LOCK_OFFSET: usize = 0x004;
/// SLCR write-protection unlock register offset
pub const SLCR_UNLOCK_OFFSET: usize = 0x008;
/// GEM0 RX clock control register offset
pub const GEM0_RCLK_CTRL_OFFSET: usize = 0x138;
/// GEM1 RX clock control register offset
pub const GEM1_RCLK_CTRL_OFFSET: usize = 0x13C;
/// GEM0 reference clock control register offset
pub const GEM0_CLK_CTRL_OFFSET: usize = 0x140;
/// GEM1 reference clock control register offset
pub const GEM1_CLK_CTRL_OFFSET: usize = 0x144;

/// Key written to the lock register
pub const SLCR_LOCK_KEY: u32 = 0x767B;
/// Key written to the unlock register
pub const SLCR_UNLOCK_KEY: u32 = 0xDF0D;

/// RX clock from the MIO pins, clock enabled
pub const RCLK_CTRL_MIO: u32 = 0x01;
/// RX clock from EMIO, clock enabled
pub const RCLK_CTRL_EMIO: u32 = 0x11;
/// Reference clock sourced from EMIO, clock enabled
pub const CLK_CTRL_EMIO: u32 = 0x41;

/// Reference clock control field layout
pub mod clk_ctrl {
    /// Second divisor shift (bits 25:20)
    pub const DIVISOR1_SHIFT: u32 = 20;
    /// First divisor shift (bits 13:8)
    pub const DIVISOR0_SHIFT: u32 = 8;
    /// Source select shift (bits 6:4)
    pub const SRCSEL_SHIFT: u32 = 4;
    /// Divisor field mask (6 bits)
    pub const DIVISOR_MASK: u32 = 0x3F;
    /// Source select field mask (3 bits)
    pub const SRCSEL_MASK: u32 = 0x7;
    /// Clock active
    pub const CLKACT: u32 = 1 << 0;
}

/// SLCR register block.
#[derive(Debug, Clone, Copy)]
pub struct SlcrRegs<B> {
    bus: B,
}

impl<B: RegisterBlock> SlcrRegs<B> {
    /// Wrap a register block
    pub const fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Underlying register block
    pub fn bus(&self) -> &B {
        &self.bus
    }

    reg_wo!(set_lock, SLCR_LOCK_OFFSET, "SLCR lock register");
    reg_wo!(set_unlock, SLCR_UNLOCK_OFFSET, "SLCR unlock register");
    reg_rw!(gem0_rx_clock, set_gem0_rx_clock, GEM0_RCLK_CTRL_OFFSET, "GEM0 RX clock control");
    reg_rw!(gem1_rx_clock, set_gem1_rx_clock, GEM1_RCLK_CTRL_OFFSET, "GEM1 RX clock control");
    reg_rw!(gem0_clock, set_gem0_clock, GEM0_CLK_CTRL_OFFSET, "GEM0 reference clock control");
    reg_rw!(gem1_clock, set_gem1_clock, GEM1_CLK_CTRL_OFFSET, "GEM1 reference clock control");

    /// Write an arbitrary SLCR register (used for board-specific EMIO clocks)
    #[inline(always)]
    pub fn write_raw(&self, offset: usize, value: u32) {
        self.bus.write(offset, value);
    }
}
