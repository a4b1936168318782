//! Standard-register PHY driver
//!
//! Any Clause 22 PHY that needs no vendor setup.

use crate::driver::error::Result;
use crate::hal::mdio::{MdioBus, read_phy_id};

use super::generic::PhyDriver;

/// PHY driven purely through IEEE 802.3 registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GenericPhy {
    addr: u8,
}

impl GenericPhy {
    /// Create a driver for the PHY at `addr`
    pub const fn new(addr: u8) -> Self {
        Self { addr }
    }
}

impl PhyDriver for GenericPhy {
    fn address(&self) -> u8 {
        self.addr
    }
}

/// Scan the management bus for responding PHYs
///
/// An address responds when its identifier reads as neither all zeros nor
/// all ones. Addresses whose read fails are skipped.
pub fn scan_bus<M: MdioBus>(mdio: &mut M) -> Result<[Option<u32>; 32]> {
    let mut found = [None; 32];

    for addr in 0..32u8 {
        match read_phy_id(mdio, addr) {
            Ok(0) | Ok(0xFFFF_FFFF) | Err(_) => {}
            Ok(id) => found[addr as usize] = Some(id),
        }
    }

    Ok(found)
}
