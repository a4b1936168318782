//! Zynq GEM Ethernet Driver
//!
//! A `no_std`, `no_alloc` Rust driver for the Gigabit Ethernet MAC (GEM)
//! found in the Xilinx Zynq-7000 processing system.
//!
//! The driver programs the GEM through its memory-mapped registers, moves
//! frames through single-buffer DMA descriptor rings, and brings up an
//! external PHY over the GEM management (MDIO) interface.
//!
//! # Architecture
//!
//! 1. **Driver Layer** ([`driver`]): [`Gem`] bring-up, send, receive and the
//!    named-device registry
//! 2. **PHY Layer** ([`phy`]): generic Clause 22 PHY and Marvell 88E1111/88E1116R
//! 3. **HAL Layer** ([`hal`]): SLCR reference clocks and the MDIO bus
//!
//! ## Standard Compliance
//!
//! - **IEEE 802.3**: Frame sizes, Clause 22 management frames, autonegotiation
//! - **Zynq-7000 TRM**: Buffer descriptors, GEM register layout, SLCR clocking
//!
//! # Supported PHY Chips
//!
//! - [`GenericPhy`]: any Clause 22 PHY with 1000BASE-T registers
//! - [`MarvellPhy`]: Marvell 88E1111 / 88E1116R, optional RGMII quirks
//!
//! Additional PHY drivers can be added by implementing [`PhyDriver`].
//!
//! # Features
//!
//! - `defmt`: Enable defmt logging and formatting
//! - `log`: Enable `log` facade logging
//! - `smoltcp`: Enable smoltcp network stack integration
//! - `critical-section`: Enable the [`SharedGem`](sync::SharedGem) wrapper
//!
//! # Example
//!
//! ```ignore
//! use zynq_gem::boards::Zc702;
//! use zynq_gem::{DmaRegion, ZynqGem};
//!
//! static DMA: DmaRegion<8, 8> = DmaRegion::new();
//!
//! let config = Zc702::config([0x00, 0x0A, 0x35, 0x00, 0x01, 0x22]);
//! // SAFETY: GEM0 and the SLCR are owned by this driver instance.
//! let mut gem = unsafe { ZynqGem::on_hardware(config, Zc702::phy(), delay, &DMA) };
//!
//! gem.one_time_init()?;
//! let link = gem.init()?;
//!
//! gem.send(&frame)?;
//! gem.recv(&mut |frame: &[u8]| handle(frame))?;
//! ```
//!
//! # Memory Requirements
//!
//! Each descriptor slot carries a 1536-byte buffer: a `DmaRegion<8, 8>`
//! needs roughly 24 KB of memory that the GEM DMA can reach.

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live in the [lints] table of Cargo.toml.

// =============================================================================
// Modules
// =============================================================================

pub mod boards;
pub mod driver;
pub mod hal;
pub mod phy;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(feature = "smoltcp")]
#[cfg_attr(docsrs, doc(cfg(feature = "smoltcp")))]
pub mod integration;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

#[cfg(test)]
extern crate std;

// Test utilities (only available during testing)
#[cfg(test)]
pub(crate) mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::config::{Duplex, GemConfig, GemInstance, RetryPolicy, Speed, State};
pub use driver::error::{
    ConfigError, ConfigResult, DmaError, DmaResult, Error, FrameError, IoError, IoResult,
    LinkError, Result,
};
pub use driver::gem::{FrameSink, Gem, ZynqGem};
pub use driver::registry::{DeviceName, DeviceRegistry, EthDevice};
pub use driver::stats::Statistics;
pub use driver::status::{TxFaults, TxReport};
pub use internal::dma::{DmaParts, DmaRegion};
pub use internal::register::{Mmio, RegisterBlock};

/// Low-level register accessors for advanced use.
///
/// These are intentionally separated from the primary facade. Most users should
/// prefer the safe driver APIs instead of touching registers directly.
///
/// # Safety
///
/// Direct register access bypasses driver invariants. Use only if you fully
/// understand the GEM hardware and accept responsibility for correct
/// sequencing and synchronization.
pub mod unsafe_registers {
    pub use crate::internal::register::gem::GemRegs;
    pub use crate::internal::register::slcr::SlcrRegs;
}

// Re-export PHY types
pub use phy::{GenericPhy, LinkStatus, MarvellPhy, PhyCapabilities, PhyDriver};

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::SharedGem;

/// Shared driver constants.
///
/// These are grouped into a dedicated module to keep the top-level facade
/// focused on driver types and integration points.
pub mod constants {
    pub use crate::internal::constants::{
        // Identity
        DEFAULT_MAC_ADDR,
        // Ring sizes
        DEFAULT_RX_DESCRIPTORS,
        DEFAULT_TX_DESCRIPTORS,
        DEVICE_NAME_CAPACITY,
        // Frame/buffer sizes
        DMA_BUFFER_SIZE,
        DRIVER_NAME,
        ETH_HEADER_SIZE,
        MAC_ADDR_LEN,
        MAX_FRAME_SIZE,
        MAX_PHY_ADDR,
        MTU,
        STATION_ADDR_SLOT,
    };
}
