//! PHY Register Definitions
//!
//! This module contains register definitions for PHY devices accessed over
//! the GEM management bus. These are distinct from the memory-mapped
//! peripheral registers in [`register`](super::register).
//!
//! # Module Organization
//!
//! - [`standard`] - IEEE 802.3 Clause 22 registers, including 1000BASE-T
//! - [`marvell`] - Marvell 88E1111/88E1116R vendor-specific registers
//!
//! # Access Method
//!
//! PHY registers are reached through the PHY maintenance register of the
//! GEM instance selected as management bus, not by direct memory mapping.

pub mod marvell;
pub mod standard;
