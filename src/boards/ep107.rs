//! EP107 emulation platform (Marvell 88E1111 over RGMII).
//!
//! The PHY needs page 0 selected, RGMII clock delays with speed downshift in
//! register 20, full duplex forced in BMCR, and pause advertised. The
//! reference clock divisors are fixed; speed is selected by the source field.

use crate::driver::config::{GemConfig, GemInstance};
use crate::hal::clock::{ClockRouting, ClockTable};
use crate::internal::phy_regs::marvell::phy_id;
use crate::phy::MarvellPhy;

/// EP107 board configuration constants and helpers.
pub struct Ep107;

impl Ep107 {
    /// GEM instance in use
    pub const INSTANCE: GemInstance = GemInstance::Gem0;

    /// PHY address
    pub const PHY_ADDR: u8 = 0;

    /// Expected PHY ID (88E1111, any revision)
    pub const PHY_ID: u32 = phy_id::M88E1111;

    /// Board name
    pub const BOARD_NAME: &'static str = "EP107";

    /// Check if a PHY ID matches the 88E1111
    #[inline]
    pub const fn is_valid_phy_id(id: u32) -> bool {
        (id & phy_id::MODEL_MASK) == Self::PHY_ID
    }

    /// GEM configuration for the platform with station address `mac`
    #[must_use]
    pub const fn config(mac: [u8; 6]) -> GemConfig {
        GemConfig::new()
            .with_instance(Self::INSTANCE)
            .with_phy_address(Self::PHY_ADDR)
            .with_mac_address(mac)
            .with_clock_routing(ClockRouting::Mio)
            .with_clock_table(ClockTable::EP107)
            .with_advertise_gigabit(true)
            .with_advertise_pause(true)
    }

    /// PHY driver with the RGMII register quirks enabled
    #[must_use]
    pub const fn phy() -> MarvellPhy {
        MarvellPhy::with_rgmii_quirks(Self::PHY_ADDR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::config::Speed;

    #[test]
    fn phy_id_validation() {
        assert!(Ep107::is_valid_phy_id(0x0141_0CC2));
        assert!(!Ep107::is_valid_phy_id(0x0141_0E40));
    }

    #[test]
    fn config_enables_quirks_and_pause() {
        let config = Ep107::config([0x00, 0x0A, 0x35, 0x00, 0x00, 0x01]);
        assert!(config.advertise_pause);
        assert!(config.advertise_gigabit);
        assert_eq!(config.clock_table.divisor(Speed::Mbps10).source, 3);
        assert!(Ep107::phy().rgmii_quirks());
    }
}
