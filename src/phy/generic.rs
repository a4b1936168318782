//! Generic PHY Driver Trait
//!
//! This module defines the common interface for all Ethernet PHY drivers,
//! based on IEEE 802.3 Clause 22 standard registers. Every operation has a
//! standard-register default, so a chip driver only overrides what its
//! silicon does differently.

use embedded_hal::delay::DelayNs;

use crate::driver::config::{Duplex, RetryPolicy, Speed};
use crate::driver::error::{LinkError, Result};
use crate::hal::mdio::MdioBus;

// =============================================================================
// Link Status
// =============================================================================

/// Ethernet link status information
///
/// Contains the negotiated link parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStatus {
    /// Link speed
    pub speed: Speed,
    /// Duplex mode
    pub duplex: Duplex,
}

impl LinkStatus {
    /// Create a new link status
    pub const fn new(speed: Speed, duplex: Duplex) -> Self {
        Self { speed, duplex }
    }

    /// 1000 Mbps Full Duplex
    pub const fn gigabit_full() -> Self {
        Self::new(Speed::Mbps1000, Duplex::Full)
    }

    /// 100 Mbps Full Duplex
    pub const fn fast_full() -> Self {
        Self::new(Speed::Mbps100, Duplex::Full)
    }

    /// 10 Mbps Full Duplex
    pub const fn slow_full() -> Self {
        Self::new(Speed::Mbps10, Duplex::Full)
    }
}

// =============================================================================
// PHY Capabilities
// =============================================================================

/// Speed/duplex abilities advertised by one end of the link
///
/// Built from the local advertisement registers (ANAR, CTRL1000) or from
/// the partner's (ANLPAR, STAT1000). The negotiated speed is the best one
/// present in the intersection of both sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhyCapabilities {
    /// 1000BASE-T Full Duplex
    pub speed_1000_fd: bool,
    /// 1000BASE-T Half Duplex
    pub speed_1000_hd: bool,
    /// 100BASE-TX Full Duplex
    pub speed_100_fd: bool,
    /// 100BASE-TX Half Duplex
    pub speed_100_hd: bool,
    /// 10BASE-T Full Duplex
    pub speed_10_fd: bool,
    /// 10BASE-T Half Duplex
    pub speed_10_hd: bool,
    /// PAUSE flow control
    pub pause: bool,
    /// Asymmetric PAUSE
    pub pause_asymmetric: bool,
}

impl PhyCapabilities {
    /// Everything a gigabit PHY can advertise
    pub const fn all() -> Self {
        Self {
            speed_1000_fd: true,
            speed_1000_hd: true,
            speed_100_fd: true,
            speed_100_hd: true,
            speed_10_fd: true,
            speed_10_hd: true,
            pause: true,
            pause_asymmetric: true,
        }
    }

    /// Local advertisement from ANAR and CTRL1000
    pub const fn from_local(anar_val: u16, ctrl1000_val: u16) -> Self {
        use crate::internal::phy_regs::standard::{anar, ctrl1000};
        Self {
            speed_1000_fd: ctrl1000_val & ctrl1000::ADV_1000_FD != 0,
            speed_1000_hd: ctrl1000_val & ctrl1000::ADV_1000_HD != 0,
            speed_100_fd: anar_val & anar::TX_FD != 0,
            speed_100_hd: anar_val & anar::TX_HD != 0,
            speed_10_fd: anar_val & anar::T10_FD != 0,
            speed_10_hd: anar_val & anar::T10_HD != 0,
            pause: anar_val & anar::PAUSE != 0,
            pause_asymmetric: anar_val & anar::PAUSE_ASYM != 0,
        }
    }

    /// Link partner abilities from ANLPAR and STAT1000
    pub const fn from_partner(anlpar_val: u16, stat1000_val: u16) -> Self {
        use crate::internal::phy_regs::standard::{anlpar, stat1000};
        Self {
            speed_1000_fd: stat1000_val & stat1000::LPA_1000_FD != 0,
            speed_1000_hd: stat1000_val & stat1000::LPA_1000_HD != 0,
            speed_100_fd: anlpar_val & anlpar::CAN_100_FD != 0,
            speed_100_hd: anlpar_val & anlpar::CAN_100_HD != 0,
            speed_10_fd: anlpar_val & anlpar::CAN_10_FD != 0,
            speed_10_hd: anlpar_val & anlpar::CAN_10_HD != 0,
            pause: anlpar_val & anlpar::PAUSE != 0,
            pause_asymmetric: anlpar_val & anlpar::PAUSE_ASYM != 0,
        }
    }

    /// Abilities present on both sides
    #[must_use]
    pub const fn intersect(&self, other: &Self) -> Self {
        Self {
            speed_1000_fd: self.speed_1000_fd && other.speed_1000_fd,
            speed_1000_hd: self.speed_1000_hd && other.speed_1000_hd,
            speed_100_fd: self.speed_100_fd && other.speed_100_fd,
            speed_100_hd: self.speed_100_hd && other.speed_100_hd,
            speed_10_fd: self.speed_10_fd && other.speed_10_fd,
            speed_10_hd: self.speed_10_hd && other.speed_10_hd,
            pause: self.pause && other.pause,
            pause_asymmetric: self.pause_asymmetric && other.pause_asymmetric,
        }
    }

    /// Highest speed present, 10 Mbps when neither 1000 nor 100 is
    #[must_use]
    pub const fn best_speed(&self) -> Speed {
        if self.speed_1000_fd || self.speed_1000_hd {
            Speed::Mbps1000
        } else if self.speed_100_fd || self.speed_100_hd {
            Speed::Mbps100
        } else {
            Speed::Mbps10
        }
    }
}

/// Resolve the link speed from local and partner abilities
#[must_use]
pub const fn resolve_speed(local: &PhyCapabilities, partner: &PhyCapabilities) -> Speed {
    local.intersect(partner).best_speed()
}

// =============================================================================
// PHY Driver Trait
// =============================================================================

/// Trait for Ethernet PHY drivers
///
/// All PHY drivers must support the standard Clause 22 registers (0-15),
/// but may also use vendor-specific registers (16-31) for board quirks in
/// [`configure`](PhyDriver::configure).
///
/// # Example Implementation
///
/// ```ignore
/// struct MyPhy {
///     addr: u8,
/// }
///
/// impl PhyDriver for MyPhy {
///     fn address(&self) -> u8 { self.addr }
///
///     fn configure<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
///         mdio.write(self.addr, 0x1F, 0x0000)
///     }
/// }
/// ```
pub trait PhyDriver {
    /// Get the PHY address (0-31)
    fn address(&self) -> u8;

    /// Apply vendor-specific settings before advertising
    fn configure<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        let _ = mdio;
        Ok(())
    }

    /// Read the PHY identifier (OUI + model + revision)
    ///
    /// Returns a 32-bit value: `(PHYIDR1 << 16) | PHYIDR2`
    fn phy_id<M: MdioBus>(&self, mdio: &mut M) -> Result<u32> {
        crate::hal::mdio::read_phy_id(mdio, self.address())
    }

    /// Perform a soft reset
    ///
    /// Sets BMCR.RESET and waits for it to self-clear within `policy`.
    fn soft_reset<M: MdioBus, D: DelayNs>(
        &mut self,
        mdio: &mut M,
        delay: &mut D,
        policy: &RetryPolicy,
    ) -> Result<()> {
        ieee802_3::soft_reset(mdio, self.address(), delay, policy)
    }

    /// Program the advertisement registers
    fn advertise<M: MdioBus>(&mut self, mdio: &mut M, pause: bool, gigabit: bool) -> Result<()> {
        if pause {
            ieee802_3::advertise_pause(mdio, self.address())?;
        }
        if gigabit {
            ieee802_3::advertise_all_speeds(mdio, self.address())?;
        }
        Ok(())
    }

    /// Enable and restart auto-negotiation
    fn enable_auto_negotiation<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        ieee802_3::enable_auto_negotiation(mdio, self.address(), 0)
    }

    /// Check if auto-negotiation is complete
    fn is_auto_negotiation_complete<M: MdioBus>(&self, mdio: &mut M) -> Result<bool> {
        ieee802_3::is_an_complete(mdio, self.address())
    }

    /// Check if the link is up
    ///
    /// BMSR latches link failures, so it is read twice and the second
    /// value is used.
    fn is_link_up<M: MdioBus>(&self, mdio: &mut M) -> Result<bool> {
        ieee802_3::is_link_up(mdio, self.address())
    }

    /// Local abilities currently advertised
    fn local_capabilities<M: MdioBus>(&self, mdio: &mut M) -> Result<PhyCapabilities> {
        ieee802_3::read_local(mdio, self.address())
    }

    /// Abilities advertised by the link partner
    fn link_partner_abilities<M: MdioBus>(&self, mdio: &mut M) -> Result<PhyCapabilities> {
        ieee802_3::read_link_partner(mdio, self.address())
    }

    /// Negotiated speed: highest common ability of both sides
    fn resolve_speed<M: MdioBus>(&self, mdio: &mut M) -> Result<Speed> {
        ieee802_3::negotiated_speed(mdio, self.address())
    }
}

// =============================================================================
// Default Implementations
// =============================================================================

/// Helper functions using standard IEEE 802.3 registers
pub mod ieee802_3 {
    use super::*;
    use crate::internal::phy_regs::standard::{
        anar, anlpar, bmcr, bmsr, ctrl1000, phy_reg, stat1000,
    };

    /// Read BMSR twice and check the link status bit
    pub fn is_link_up<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<bool> {
        let _ = mdio.read(phy_addr, phy_reg::BMSR)?;
        let bmsr_val = mdio.read(phy_addr, phy_reg::BMSR)?;
        Ok((bmsr_val & bmsr::LINK_STATUS) != 0)
    }

    /// Read BMSR and check AN complete bit
    pub fn is_an_complete<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<bool> {
        let bmsr_val = mdio.read(phy_addr, phy_reg::BMSR)?;
        Ok((bmsr_val & bmsr::AN_COMPLETE) != 0)
    }

    /// Perform soft reset via BMCR
    ///
    /// Returns [`LinkError::ResetTimeout`] if the bit has not self-cleared
    /// when `policy` is exhausted.
    pub fn soft_reset<M: MdioBus, D: DelayNs>(
        mdio: &mut M,
        phy_addr: u8,
        delay: &mut D,
        policy: &RetryPolicy,
    ) -> Result<()> {
        let bmcr_val = mdio.read(phy_addr, phy_reg::BMCR)?;
        mdio.write(phy_addr, phy_reg::BMCR, bmcr_val | bmcr::RESET)?;

        let done = policy.poll(delay, || {
            Ok(mdio.read(phy_addr, phy_reg::BMCR)? & bmcr::RESET == 0)
        })?;
        if done {
            Ok(())
        } else {
            Err(LinkError::ResetTimeout.into())
        }
    }

    /// Enable auto-negotiation and restart it, OR-ing `extra` into BMCR
    pub fn enable_auto_negotiation<M: MdioBus>(
        mdio: &mut M,
        phy_addr: u8,
        extra: u16,
    ) -> Result<()> {
        let bmcr_val = mdio.read(phy_addr, phy_reg::BMCR)?;
        mdio.write(
            phy_addr,
            phy_reg::BMCR,
            (bmcr_val | bmcr::AN_ENABLE | bmcr::AN_RESTART | extra) & !bmcr::ISOLATE,
        )
    }

    /// Advertise symmetric and asymmetric pause
    pub fn advertise_pause<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<()> {
        crate::hal::mdio::modify(mdio, phy_addr, phy_reg::ANAR, |v| {
            v | anar::PAUSE | anar::PAUSE_ASYM
        })
    }

    /// Advertise every speed up to 1000BASE-T, both duplexes
    pub fn advertise_all_speeds<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<()> {
        crate::hal::mdio::modify(mdio, phy_addr, phy_reg::ANAR, |v| {
            v | anar::TX_FD | anar::TX_HD | anar::T10_FD | anar::T10_HD
        })?;
        crate::hal::mdio::modify(mdio, phy_addr, phy_reg::CTRL1000, |v| {
            v | ctrl1000::ADV_1000_FD | ctrl1000::ADV_1000_HD
        })
    }

    /// Read local advertisement from ANAR and CTRL1000
    pub fn read_local<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<PhyCapabilities> {
        let anar_val = mdio.read(phy_addr, phy_reg::ANAR)?;
        let ctrl1000_val = mdio.read(phy_addr, phy_reg::CTRL1000)?;
        Ok(PhyCapabilities::from_local(anar_val, ctrl1000_val))
    }

    /// Read link partner abilities from ANLPAR and STAT1000
    pub fn read_link_partner<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<PhyCapabilities> {
        let anlpar_val = mdio.read(phy_addr, phy_reg::ANLPAR)?;
        let stat1000_val = mdio.read(phy_addr, phy_reg::STAT1000)?;
        Ok(PhyCapabilities::from_partner(anlpar_val, stat1000_val))
    }

    /// Pick the negotiated speed straight from the registers
    ///
    /// 1000 if `STAT1000 & (CTRL1000 << 2)` has a gigabit bit, else 100 if
    /// `ANLPAR & ANAR` has a 100BASE-TX bit, else 10. The 10/100 registers
    /// are only read when gigabit did not match.
    pub fn negotiated_speed<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<Speed> {
        let stat = mdio.read(phy_addr, phy_reg::STAT1000)?;
        let ctrl = mdio.read(phy_addr, phy_reg::CTRL1000)?;
        if speed_from_gigabit(stat, ctrl) {
            return Ok(Speed::Mbps1000);
        }
        let lpa = mdio.read(phy_addr, phy_reg::ANLPAR)?;
        let adv = mdio.read(phy_addr, phy_reg::ANAR)?;
        if speed_from_fast(lpa, adv) {
            Ok(Speed::Mbps100)
        } else {
            Ok(Speed::Mbps10)
        }
    }

    /// Gigabit common to both sides
    pub const fn speed_from_gigabit(stat1000_val: u16, ctrl1000_val: u16) -> bool {
        let common = stat1000_val & (ctrl1000_val << stat1000::CTRL1000_SHIFT);
        common & (stat1000::LPA_1000_FD | stat1000::LPA_1000_HD) != 0
    }

    /// 100BASE-TX common to both sides
    pub const fn speed_from_fast(anlpar_val: u16, anar_val: u16) -> bool {
        anlpar_val & anar_val & (anlpar::CAN_100_FD | anlpar::CAN_100_HD) != 0
    }
}
