//! Marvell 88E1111 / 88E1116R PHY Driver
//!
//! Gigabit PHYs found on the Zynq evaluation boards. Both come up fine with
//! the standard register defaults; the RGMII boards additionally need the
//! internal clock delays and speed downshift enabled in the extended control
//! register.

use crate::driver::error::Result;
use crate::hal::mdio::{MdioBus, modify};
use crate::internal::phy_regs::marvell::{PAGE_COPPER, ext_spec_ctrl, phy_id, reg};
use crate::internal::phy_regs::standard::bmcr;

use super::generic::{PhyDriver, ieee802_3};

/// Marvell 88E11xx PHY driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MarvellPhy {
    addr: u8,
    /// Program RGMII delays and downshift in register 20
    rgmii_quirks: bool,
}

impl MarvellPhy {
    /// Create a driver at `addr` using the standard register defaults
    pub const fn new(addr: u8) -> Self {
        Self {
            addr,
            rgmii_quirks: false,
        }
    }

    /// Create a driver that also programs RGMII timing and downshift
    pub const fn with_rgmii_quirks(addr: u8) -> Self {
        Self {
            addr,
            rgmii_quirks: true,
        }
    }

    /// Whether register 20 is programmed during configuration
    pub const fn rgmii_quirks(&self) -> bool {
        self.rgmii_quirks
    }

    /// Check that the PHY at this address is a Marvell 88E11xx
    pub fn verify_id<M: MdioBus>(&self, mdio: &mut M) -> Result<bool> {
        let id = self.phy_id(mdio)?;
        Ok(id & phy_id::OUI_MASK == phy_id::MARVELL_OUI)
    }

    /// Select a register page
    pub fn select_page<M: MdioBus>(&self, mdio: &mut M, page: u16) -> Result<()> {
        mdio.write(self.addr, reg::PAGE_ADDR, page)
    }
}

impl PhyDriver for MarvellPhy {
    fn address(&self) -> u8 {
        self.addr
    }

    fn configure<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        if !self.rgmii_quirks {
            return Ok(());
        }
        // Register 20 lives on the copper page
        self.select_page(mdio, PAGE_COPPER)?;
        modify(mdio, self.addr, reg::EXT_SPEC_CTRL, |v| {
            v | ext_spec_ctrl::RGMII_DOWNSHIFT
        })
    }

    fn enable_auto_negotiation<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        let extra = if self.rgmii_quirks { bmcr::DUPLEX_FULL } else { 0 };
        ieee802_3::enable_auto_negotiation(mdio, self.addr, extra)
    }
}
