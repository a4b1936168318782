//! Core driver components for the Zynq GEM.
//!
//! This module contains the essential building blocks for configuring and
//! operating the Ethernet MAC controller:
//!
//! - [`config`] - Configuration types and builder patterns
//! - [`error`] - Error types and result aliases
//! - [`gem`] - The GEM driver: bring-up, send and receive
//! - [`registry`] - Device naming and the management-bus shim
//! - [`stats`] / [`status`] - Traffic counters and transmit reports
//!
//! # Example
//!
//! ```ignore
//! use zynq_gem::driver::{GemConfig, GemInstance};
//!
//! let config = GemConfig::new()
//!     .with_instance(GemInstance::Gem0)
//!     .with_phy_address(7)
//!     .with_mac_address([0x00, 0x0A, 0x35, 0x00, 0x01, 0x22]);
//! ```

// Submodules
pub mod config;
pub mod error;
pub mod gem;
pub mod registry;
pub mod stats;
pub mod status;

// Re-exports for convenience
pub use config::{Duplex, GemConfig, GemInstance, RetryPolicy, Speed, State};
pub use error::{
    ConfigError, ConfigResult, DmaError, DmaResult, Error, FrameError, IoError, IoResult,
    LinkError, Result,
};
pub use gem::{FrameSink, Gem, ZynqGem};
pub use registry::{DeviceName, DeviceRegistry, EthDevice};
pub use stats::Statistics;
pub use status::{TxFaults, TxReport};
