//! Marvell 88E1111 / 88E1116R vendor-specific registers.
//!
//! # References
//!
//! - Marvell 88E1111 Datasheet, register map (pages 0-3)

/// PHY identifier constants
pub mod phy_id {
    /// Marvell OUI-derived identifier (upper bits shared by the 88E11xx family)
    pub const MARVELL_OUI: u32 = 0x0141_0C00;
    /// Mask selecting the OUI portion of the identifier
    pub const OUI_MASK: u32 = 0xFFFF_FC00;
    /// 88E1111
    pub const M88E1111: u32 = 0x0141_0CC0;
    /// 88E1116R
    pub const M88E1116R: u32 = 0x0141_0E40;
    /// Mask ignoring the revision nibble
    pub const MODEL_MASK: u32 = 0xFFFF_FFF0;
}

/// Vendor register addresses
pub mod reg {
    /// Extended PHY Specific Control Register
    pub const EXT_SPEC_CTRL: u8 = 20;
    /// Page Address Register
    pub const PAGE_ADDR: u8 = 22;
}

/// Extended PHY Specific Control Register bits
pub mod ext_spec_ctrl {
    /// Downshift counter shift (number of gigabit attempts)
    pub const DOWNSHIFT_COUNT_SHIFT: u16 = 9;
    /// Maximum downshift counter (8 attempts)
    pub const DOWNSHIFT_COUNT_MAX: u16 = 7 << DOWNSHIFT_COUNT_SHIFT;
    /// Downshift enable
    pub const DOWNSHIFT_ENABLE: u16 = 1 << 8;
    /// RGMII receive timing internally delayed
    pub const RGMII_RX_DELAY: u16 = 1 << 7;
    /// RGMII transmit clock internally delayed
    pub const RGMII_TX_DELAY: u16 = 1 << 1;

    /// Bits set for RGMII operation with downshift
    pub const RGMII_DOWNSHIFT: u16 =
        DOWNSHIFT_COUNT_MAX | DOWNSHIFT_ENABLE | RGMII_RX_DELAY | RGMII_TX_DELAY;
}

/// Copper register page
pub const PAGE_COPPER: u16 = 0;
