//! Centralized Constants
//!
//! This module provides a single source of truth for the magic numbers and
//! configuration constants used throughout the GEM driver.
//!
//! # Organization
//!
//! Constants are grouped by category:
//! - **Frame/Buffer sizes**: Ethernet frame dimensions, DMA buffer size
//! - **Ring sizes**: Default descriptor counts
//! - **Timing**: Retry counts and polling intervals
//! - **Identity**: Device naming and MAC address defaults
//!
//! # Note
//!
//! Hardware register bit definitions remain in their respective modules
//! (`register/gem.rs`, `register/slcr.rs`, `dma/descriptor/bits.rs`) as they
//! are specific to those hardware blocks.

// =============================================================================
// Frame and Buffer Sizes
// =============================================================================

/// DMA buffer size in bytes; matches the RX buffer size programmed in DMACR
pub const DMA_BUFFER_SIZE: usize = 1536;

/// Maximum Ethernet frame size without FCS (1500 + 14 header + 4 VLAN)
pub const MAX_FRAME_SIZE: usize = 1518;

/// Standard Ethernet MTU (Maximum Transmission Unit)
pub const MTU: usize = 1500;

/// Ethernet header size (dst MAC + src MAC + EtherType)
pub const ETH_HEADER_SIZE: usize = 14;

/// MAC address length
pub const MAC_ADDR_LEN: usize = 6;

// =============================================================================
// Default Ring Sizes
// =============================================================================

/// Default number of receive descriptors/buffers
pub const DEFAULT_RX_DESCRIPTORS: usize = 8;

/// Default number of transmit descriptors/buffers
pub const DEFAULT_TX_DESCRIPTORS: usize = 8;

// =============================================================================
// Timing Constants
// =============================================================================

/// Maximum polls of the PHY reset bit
pub const PHY_RESET_ATTEMPTS: u32 = 1000;

/// Maximum polls of the auto-negotiation complete bit
pub const AUTONEG_ATTEMPTS: u32 = 1000;

/// Delay between PHY status polls in microseconds (10 ms)
pub const PHY_POLL_INTERVAL_US: u32 = 10_000;

/// Maximum polls of the transmit status register per frame
pub const TX_COMPLETION_ATTEMPTS: u32 = 100_000;

/// Delay between transmit status polls in microseconds
pub const TX_POLL_INTERVAL_US: u32 = 1;

/// Polls waiting for the PHY management logic to go idle
pub const MDIO_IDLE_ATTEMPTS: u32 = 10_000;

/// Delay between management-bus idle polls (microseconds)
pub const MDIO_POLL_INTERVAL_US: u32 = 1;

// =============================================================================
// PHY
// =============================================================================

/// Maximum PHY address on the management bus
pub const MAX_PHY_ADDR: u8 = 31;

// =============================================================================
// Identity
// =============================================================================

/// Driver name used as the prefix of registered device names
pub const DRIVER_NAME: &str = "zynq_gem";

/// Capacity of a generated device name
pub const DEVICE_NAME_CAPACITY: usize = 16;

/// Address filter slot holding the station address
pub const STATION_ADDR_SLOT: u8 = 1;

/// Default MAC address (locally administered)
pub const DEFAULT_MAC_ADDR: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
