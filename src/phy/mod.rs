//! Ethernet PHY Drivers
//!
//! This module provides a generic PHY driver trait, implementations for the
//! PHY chips found on Zynq boards, and the link establishment sequence.
//!
//! # Architecture
//!
//! The PHY layer is independent of the MAC, communicating only through the
//! [`MdioBus`](crate::hal::mdio::MdioBus) interface. This allows:
//!
//! - Easy addition of new PHY drivers
//! - Testing with mock MDIO implementations
//! - Reaching a PHY through another GEM instance's management port
//!
//! # Supported PHY Chips
//!
//! - [`GenericPhy`]: any PHY that needs only the standard registers
//! - [`MarvellPhy`]: Marvell 88E1111 / 88E1116R
//!
//! # Example
//!
//! ```ignore
//! use zynq_gem::phy::{establish_link, MarvellPhy};
//!
//! let mut phy = MarvellPhy::new(7);
//! let link = establish_link(&mut mdio, &mut phy, &mut delay, &config)?;
//! ```

pub mod generic;
pub mod link;
pub mod marvell;
pub mod standard;

pub use generic::{LinkStatus, PhyCapabilities, PhyDriver, resolve_speed};
pub use link::establish_link;
pub use marvell::MarvellPhy;
pub use standard::{GenericPhy, scan_bus};

// Re-export IEEE 802.3 standard register definitions from mdio
pub use crate::hal::mdio::{anar, bmcr, bmsr, phy_reg};
