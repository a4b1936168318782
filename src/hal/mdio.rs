//! MDIO (Management Data Input/Output) HAL
//!
//! This module provides the management bus used to reach Ethernet PHYs.
//! On the GEM it is driven through the PHY maintenance register: software
//! writes a Clause 22 frame and waits for the management logic to go idle
//! before and after every transfer.

use embedded_hal::delay::DelayNs;

use crate::driver::config::RetryPolicy;
use crate::driver::error::{ConfigError, IoError, Result};
use crate::internal::constants::MAX_PHY_ADDR;
use crate::internal::register::RegisterBlock;
use crate::internal::register::gem::{GemRegs, phymntnc};

pub use crate::internal::phy_regs::standard::{
    anar, anlpar, bmcr, bmsr, ctrl1000, phy_reg, stat1000,
};

/// Maximum valid register address (5-bit field)
pub const MAX_REG_ADDR: u8 = 31;

// =============================================================================
// MDIO Bus Trait
// =============================================================================

/// Trait for MDIO bus operations
///
/// This trait can be implemented by different backends, allowing
/// the PHY driver to work with various MDIO implementations.
pub trait MdioBus {
    /// Read a PHY register
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16>;

    /// Write a PHY register
    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()>;

    /// Check if the MDIO bus is busy
    fn is_busy(&self) -> bool;
}

impl<T: MdioBus + ?Sized> MdioBus for &mut T {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        (**self).read(phy_addr, reg_addr)
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        (**self).write(phy_addr, reg_addr, value)
    }

    fn is_busy(&self) -> bool {
        (**self).is_busy()
    }
}

// =============================================================================
// GEM Management Bus
// =============================================================================

/// Management bus of a GEM instance
///
/// The management port must have been enabled (NWCTRL.MDEN) on the instance,
/// which one-time initialization does. Every transfer waits for the
/// management logic to go idle, bounded by the idle [`RetryPolicy`].
#[derive(Debug)]
pub struct GemMdio<B, D> {
    regs: GemRegs<B>,
    delay: D,
    idle_policy: RetryPolicy,
}

impl<B: RegisterBlock, D: DelayNs> GemMdio<B, D> {
    /// Create a management bus over a GEM register block
    pub const fn new(bus: B, delay: D) -> Self {
        Self {
            regs: GemRegs::new(bus),
            delay,
            idle_policy: RetryPolicy::MDIO_IDLE,
        }
    }

    /// Override the idle wait
    #[must_use]
    pub const fn with_idle_policy(mut self, policy: RetryPolicy) -> Self {
        self.idle_policy = policy;
        self
    }

    /// Delay provider
    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Wait for the management logic to go idle
    fn wait_idle(&mut self) -> Result<()> {
        let regs = &self.regs;
        if self.idle_policy.poll(&mut self.delay, || Ok(regs.is_mdio_idle()))? {
            return Ok(());
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("GEM: management bus stuck busy");
        #[cfg(feature = "log")]
        log::warn!("GEM: management bus stuck busy");

        Err(IoError::ManagementBusTimeout.into())
    }

    fn check_address(phy_addr: u8, reg_addr: u8) -> Result<()> {
        if phy_addr > MAX_PHY_ADDR {
            return Err(ConfigError::InvalidPhyAddress.into());
        }
        if reg_addr > MAX_REG_ADDR {
            return Err(ConfigError::InvalidConfig.into());
        }
        Ok(())
    }
}

impl<B: RegisterBlock, D: DelayNs> MdioBus for GemMdio<B, D> {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        Self::check_address(phy_addr, reg_addr)?;
        self.wait_idle()?;
        self.regs
            .set_phy_maintenance(phymntnc::frame(phymntnc::OP_READ, phy_addr, reg_addr, 0));
        self.wait_idle()?;
        Ok((self.regs.phy_maintenance() & phymntnc::DATA_MASK) as u16)
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        Self::check_address(phy_addr, reg_addr)?;
        self.wait_idle()?;
        self.regs.set_phy_maintenance(phymntnc::frame(
            phymntnc::OP_WRITE,
            phy_addr,
            reg_addr,
            value,
        ));
        self.wait_idle()
    }

    fn is_busy(&self) -> bool {
        !self.regs.is_mdio_idle()
    }
}

// =============================================================================
// PHY Helper Functions
// =============================================================================

/// Read the PHY identifier (PHYIDR1 in the upper half)
pub fn read_phy_id<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<u32> {
    let id1 = mdio.read(phy_addr, phy_reg::PHYIDR1)? as u32;
    let id2 = mdio.read(phy_addr, phy_reg::PHYIDR2)? as u32;
    Ok((id1 << 16) | id2)
}

/// Read-modify-write a PHY register
pub fn modify<M, F>(mdio: &mut M, phy_addr: u8, reg_addr: u8, f: F) -> Result<()>
where
    M: MdioBus,
    F: FnOnce(u16) -> u16,
{
    let value = mdio.read(phy_addr, reg_addr)?;
    mdio.write(phy_addr, reg_addr, f(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::error::Error;
    use crate::internal::register::gem::{NWSR_OFFSET, PHYMNTNC_OFFSET, nwsr};
    use crate::testing::{MockDelay, MockMdioBus, MockRegisters};

    fn idle_registers() -> MockRegisters {
        let mock = MockRegisters::new();
        mock.set(NWSR_OFFSET, nwsr::MDIO_IDLE);
        mock
    }

    // =========================================================================
    // GemMdio
    // =========================================================================

    #[test]
    fn read_issues_clause22_frame() {
        let mock = idle_registers();
        let mut mdio = GemMdio::new(&mock, MockDelay::new());
        mdio.read(7, phy_reg::BMSR).unwrap();
        assert_eq!(
            mock.write_log(),
            std::vec![(
                PHYMNTNC_OFFSET,
                phymntnc::frame(phymntnc::OP_READ, 7, phy_reg::BMSR, 0)
            )]
        );
    }

    #[test]
    fn read_returns_data_field() {
        let mock = idle_registers();
        // Management logic completes the frame with the PHY's answer
        mock.on_write(PHYMNTNC_OFFSET, |regs, _| regs.set(PHYMNTNC_OFFSET, 0x6002_796D));
        let mut mdio = GemMdio::new(&mock, MockDelay::new());
        assert_eq!(mdio.read(0, phy_reg::BMSR).unwrap(), 0x796D);
    }

    #[test]
    fn write_encodes_value() {
        let mock = idle_registers();
        let mut mdio = GemMdio::new(&mock, MockDelay::new());
        mdio.write(3, phy_reg::BMCR, bmcr::RESET).unwrap();
        let frame = mock.get(PHYMNTNC_OFFSET);
        assert_eq!(frame & phymntnc::DATA_MASK, u32::from(bmcr::RESET));
        assert_eq!((frame >> phymntnc::PHYAD_SHIFT) & 0x1F, 3);
        assert_ne!(frame & phymntnc::OP_WRITE, 0);
    }

    #[test]
    fn stuck_bus_times_out() {
        let mock = MockRegisters::new();
        let mut mdio =
            GemMdio::new(&mock, MockDelay::new()).with_idle_policy(RetryPolicy::new(16, 5));
        assert_eq!(
            mdio.read(0, phy_reg::BMCR),
            Err(Error::Io(IoError::ManagementBusTimeout))
        );
        assert!(mdio.is_busy());
        assert_eq!(mdio.delay().total_us(), 16 * 5);
        // Nothing was issued on a busy bus
        assert_eq!(mock.writes_to(PHYMNTNC_OFFSET), 0);
    }

    #[test]
    fn idle_wait_sleeps_until_bus_frees() {
        let mock = MockRegisters::new();
        // Management logic goes idle on the fourth status read
        mock.set_after_reads(NWSR_OFFSET, 3, nwsr::MDIO_IDLE);
        let mut mdio =
            GemMdio::new(&mock, MockDelay::new()).with_idle_policy(RetryPolicy::new(10, 7));
        mdio.write(1, phy_reg::BMCR, 0).unwrap();
        assert_eq!(mdio.delay().total_us(), 3 * 7);
        assert_eq!(mock.writes_to(PHYMNTNC_OFFSET), 1);
    }

    #[test]
    fn invalid_phy_address_rejected() {
        let mock = idle_registers();
        let mut mdio = GemMdio::new(&mock, MockDelay::new());
        assert_eq!(
            mdio.write(32, 0, 0),
            Err(Error::Config(ConfigError::InvalidPhyAddress))
        );
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn read_phy_id_combines_registers() {
        let mut mdio = MockMdioBus::new();
        mdio.set_register(1, phy_reg::PHYIDR1, 0x0141);
        mdio.set_register(1, phy_reg::PHYIDR2, 0x0CC2);
        assert_eq!(read_phy_id(&mut mdio, 1).unwrap(), 0x0141_0CC2);
    }

    #[test]
    fn modify_preserves_bits() {
        let mut mdio = MockMdioBus::new();
        mdio.set_register(0, phy_reg::ANAR, anar::TX_FD | anar::SELECTOR_IEEE802_3);
        modify(&mut mdio, 0, phy_reg::ANAR, |v| v | anar::PAUSE).unwrap();
        assert_eq!(
            mdio.get_register(0, phy_reg::ANAR),
            Some(anar::TX_FD | anar::SELECTOR_IEEE802_3 | anar::PAUSE)
        );
    }
}
