//! Internal Implementation Details
//!
//! This module contains implementation details that are not part of the public API.
//! Types in this module may change without notice between minor versions.
//!
//! # Contents
//!
//! - [`register`]: GEM and SLCR register blocks and bit fields
//! - [`dma`]: Descriptor rings, queues and the static DMA region
//! - [`phy_regs`]: IEEE 802.3 and Marvell PHY register definitions
//! - [`constants`]: Frame sizes, retry budgets and identity defaults
//!
//! # Stability
//!
//! **WARNING:** This module is `pub(crate)` only. The handful of types the
//! public API needs (for example [`DmaRegion`](dma::DmaRegion)) are
//! re-exported from the crate root.

pub(crate) mod constants;
pub(crate) mod dma;
pub(crate) mod phy_regs;
pub(crate) mod register;
