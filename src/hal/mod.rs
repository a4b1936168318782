//! Hardware Abstraction Layer
//!
//! This module provides higher-level abstractions over the raw registers,
//! making it easier to drive the GEM without dealing with register-level
//! details.
//!
//! # Modules
//!
//! - [`clock`]: SLCR clock routing and reference clock divisors
//! - [`mdio`]: Management bus for PHY communication
//!
//! # Delay Integration
//!
//! All bounded waits use `embedded_hal::delay::DelayNs` directly.
//! Pass any delay implementation from your HAL.

pub mod clock;
pub mod mdio;

// Re-export commonly used types
pub use clock::{ClockController, ClockDivisor, ClockRouting, ClockState, ClockTable};
pub use mdio::{GemMdio, MdioBus};
