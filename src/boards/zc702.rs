//! ZC702 evaluation board (Zynq-7020 + Marvell 88E1116R).

use crate::driver::config::{GemConfig, GemInstance};
use crate::hal::clock::{ClockRouting, ClockTable};
use crate::internal::phy_regs::marvell::phy_id;
use crate::phy::MarvellPhy;

/// ZC702 board configuration constants and helpers.
pub struct Zc702;

impl Zc702 {
    /// GEM instance wired to the RJ45 jack
    pub const INSTANCE: GemInstance = GemInstance::Gem0;

    /// PHY address strapped on the board
    pub const PHY_ADDR: u8 = 7;

    /// Expected PHY ID (88E1116R, any revision)
    pub const PHY_ID: u32 = phy_id::M88E1116R;

    /// Board name
    pub const BOARD_NAME: &'static str = "ZC702";

    /// Check if a PHY ID matches the 88E1116R
    #[inline]
    pub const fn is_valid_phy_id(id: u32) -> bool {
        (id & phy_id::MODEL_MASK) == Self::PHY_ID
    }

    /// GEM configuration for the board with station address `mac`
    #[must_use]
    pub const fn config(mac: [u8; 6]) -> GemConfig {
        GemConfig::new()
            .with_instance(Self::INSTANCE)
            .with_phy_address(Self::PHY_ADDR)
            .with_mac_address(mac)
            .with_clock_routing(ClockRouting::Mio)
            .with_clock_table(ClockTable::IO_PLL_1000MHZ)
            .with_advertise_gigabit(true)
    }

    /// PHY driver at the board's address
    #[must_use]
    pub const fn phy() -> MarvellPhy {
        MarvellPhy::new(Self::PHY_ADDR)
    }
}
