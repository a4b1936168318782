//! Link establishment
//!
//! Reset, advertise, auto-negotiate, verify and resolve. Each wait is
//! bounded by the [`RetryPolicy`](crate::RetryPolicy) in the configuration;
//! nothing is programmed into the MAC here, so a failure leaves the
//! controller untouched.

use embedded_hal::delay::DelayNs;

use crate::driver::config::{Duplex, GemConfig};
use crate::driver::error::{Error, LinkError, Result};
use crate::hal::mdio::MdioBus;

use super::generic::{LinkStatus, PhyDriver};

/// Bring the PHY link up and return the negotiated parameters.
///
/// The GEM is always programmed full duplex, so the returned duplex is
/// [`Duplex::Full`].
pub fn establish_link<M, P, D>(
    mdio: &mut M,
    phy: &mut P,
    delay: &mut D,
    config: &GemConfig,
) -> Result<LinkStatus>
where
    M: MdioBus,
    P: PhyDriver,
    D: DelayNs,
{
    if let Err(e) = phy.soft_reset(mdio, delay, &config.reset_policy) {
        if e == Error::Link(LinkError::ResetTimeout) {
            #[cfg(feature = "defmt")]
            defmt::warn!("GEM: PHY {} reset stalled", phy.address());
            #[cfg(feature = "log")]
            log::warn!("GEM: PHY {} reset stalled", phy.address());
        }
        return Err(e);
    }

    phy.configure(mdio)?;
    phy.advertise(mdio, config.advertise_pause, config.advertise_gigabit)?;
    phy.enable_auto_negotiation(mdio)?;

    let complete = config
        .autoneg_policy
        .poll(delay, || phy.is_auto_negotiation_complete(mdio))?;
    if !complete {
        #[cfg(feature = "defmt")]
        defmt::warn!("GEM: auto-negotiation stalled");
        #[cfg(feature = "log")]
        log::warn!("GEM: auto-negotiation stalled");
        return Err(LinkError::AutoNegotiationTimeout.into());
    }

    if !phy.is_link_up(mdio)? {
        #[cfg(feature = "defmt")]
        defmt::warn!("GEM: link is not up");
        #[cfg(feature = "log")]
        log::warn!("GEM: link is not up");
        return Err(LinkError::LinkDown.into());
    }

    let speed = phy.resolve_speed(mdio)?;
    Ok(LinkStatus::new(speed, Duplex::Full))
}
