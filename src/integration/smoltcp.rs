//! smoltcp Network Stack Integration
#![cfg_attr(docsrs, doc(cfg(feature = "smoltcp")))]
//!
//! This module implements the `smoltcp::phy::Device` trait for [`Gem`],
//! allowing it to be used as a network interface with smoltcp's TCP/IP stack.
//!
//! # Example
//!
//! ```ignore
//! use smoltcp::iface::{Config, Interface, SocketSet};
//! use smoltcp::wire::{IpAddress, IpCidr};
//! use zynq_gem::integration::ethernet_address;
//!
//! gem.one_time_init()?;
//! gem.init()?;
//!
//! let config = Config::new(ethernet_address(&gem).into());
//! let mut iface = Interface::new(config, &mut gem, smoltcp::time::Instant::ZERO);
//! iface.update_ip_addrs(|addrs| {
//!     addrs.push(IpCidr::new(IpAddress::v4(192, 168, 1, 10), 24)).unwrap();
//! });
//! ```
//!
//! # Safety Notes
//!
//! The smoltcp `Device` trait requires `receive()` to return both an `RxToken`
//! and a `TxToken` simultaneously. This implementation uses raw pointers
//! internally to satisfy this API requirement. This is sound because:
//!
//! 1. **Temporal safety**: Tokens are consumed immediately in the same call
//!    stack before any other access to the `Gem` occurs.
//! 2. **Spatial safety**: RX and TX use separate descriptor rings and buffers.
//! 3. **No aliasing during access**: Only one token is consumed at a time, and
//!    `consume()` takes `self` by value.

use core::marker::PhantomData;

use embedded_hal::delay::DelayNs;
use smoltcp::phy::{Checksum, ChecksumCapabilities, Device, DeviceCapabilities, Medium};
use smoltcp::time::Instant;

use crate::driver::config::State;
use crate::driver::gem::Gem;
use crate::hal::mdio::MdioBus;
use crate::internal::constants::{DMA_BUFFER_SIZE, MTU};
use crate::internal::register::RegisterBlock;
use crate::phy::PhyDriver;

// =============================================================================
// RX Token
// =============================================================================

/// Receive token for smoltcp
///
/// Copies the next received frame into a stack buffer and hands it to the
/// consumer. A receive error yields an empty frame.
pub struct GemRxToken<'a, 'd, B, C, M, P, D> {
    gem: *mut Gem<'d, B, C, M, P, D>,
    _marker: PhantomData<&'a mut Gem<'d, B, C, M, P, D>>,
}

impl<B, C, M, P, D> smoltcp::phy::RxToken for GemRxToken<'_, '_, B, C, M, P, D>
where
    B: RegisterBlock,
    C: RegisterBlock,
    M: MdioBus,
    P: PhyDriver,
    D: DelayNs,
{
    fn consume<R, F>(self, f: F) -> R
    where
        F: FnOnce(&[u8]) -> R,
    {
        let mut buffer = [0u8; DMA_BUFFER_SIZE];

        // SAFETY: valid for 'a; token consumed by value and RX/TX rings are separate.
        let gem = unsafe { &mut *self.gem };

        let len = gem.receive(&mut buffer).ok().flatten().unwrap_or(0);
        f(&buffer[..len])
    }
}

// =============================================================================
// TX Token
// =============================================================================

/// Transmit token for smoltcp
///
/// The frame is built in a stack buffer and sent on consume. Send failures
/// are dropped; smoltcp retransmits at the protocol level.
pub struct GemTxToken<'a, 'd, B, C, M, P, D> {
    gem: *mut Gem<'d, B, C, M, P, D>,
    _marker: PhantomData<&'a mut Gem<'d, B, C, M, P, D>>,
}

impl<B, C, M, P, D> smoltcp::phy::TxToken for GemTxToken<'_, '_, B, C, M, P, D>
where
    B: RegisterBlock,
    C: RegisterBlock,
    M: MdioBus,
    P: PhyDriver,
    D: DelayNs,
{
    fn consume<R, F>(self, len: usize, f: F) -> R
    where
        F: FnOnce(&mut [u8]) -> R,
    {
        let len = len.min(DMA_BUFFER_SIZE);
        let mut buffer = [0u8; DMA_BUFFER_SIZE];
        let result = f(&mut buffer[..len]);

        // SAFETY: valid for 'a; token consumed by value and TX/RX rings are separate.
        let gem = unsafe { &mut *self.gem };

        if let Err(_e) = gem.send(&buffer[..len]) {
            #[cfg(feature = "defmt")]
            defmt::debug!("GEM: smoltcp frame dropped: {}", _e);
            #[cfg(feature = "log")]
            log::debug!("GEM: smoltcp frame dropped: {_e}");
        }

        result
    }
}

// =============================================================================
// Device Implementation
// =============================================================================

impl<'d, B, C, M, P, D> Device for Gem<'d, B, C, M, P, D>
where
    B: RegisterBlock,
    C: RegisterBlock,
    M: MdioBus,
    P: PhyDriver,
    D: DelayNs,
{
    type RxToken<'a>
        = GemRxToken<'a, 'd, B, C, M, P, D>
    where
        Self: 'a;
    type TxToken<'a>
        = GemTxToken<'a, 'd, B, C, M, P, D>
    where
        Self: 'a;

    fn receive(&mut self, _timestamp: Instant) -> Option<(Self::RxToken<'_>, Self::TxToken<'_>)> {
        if self.state() != State::Running || !self.rx_available() {
            return None;
        }

        // SAFETY: both tokens come from the same Gem; see the module notes.
        let gem = self as *mut Self;
        Some((
            GemRxToken {
                gem,
                _marker: PhantomData,
            },
            GemTxToken {
                gem,
                _marker: PhantomData,
            },
        ))
    }

    fn transmit(&mut self, _timestamp: Instant) -> Option<Self::TxToken<'_>> {
        if self.state() != State::Running {
            return None;
        }

        Some(GemTxToken {
            gem: self as *mut Self,
            _marker: PhantomData,
        })
    }

    fn capabilities(&self) -> DeviceCapabilities {
        let mut caps = DeviceCapabilities::default();
        caps.medium = Medium::Ethernet;
        caps.max_transmission_unit = MTU;
        caps.max_burst_size = Some(1);

        // No checksum offload: smoltcp computes and verifies everything
        caps.checksum = ChecksumCapabilities::default();
        caps.checksum.ipv4 = Checksum::Both;
        caps.checksum.udp = Checksum::Both;
        caps.checksum.tcp = Checksum::Both;
        caps.checksum.icmpv4 = Checksum::Both;

        caps
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get the station MAC address as a smoltcp `EthernetAddress`
pub fn ethernet_address<B, C, M, P, D>(gem: &Gem<'_, B, C, M, P, D>) -> smoltcp::wire::EthernetAddress
where
    B: RegisterBlock,
    C: RegisterBlock,
    M: MdioBus,
    P: PhyDriver,
    D: DelayNs,
{
    smoltcp::wire::EthernetAddress(gem.mac_address())
}
