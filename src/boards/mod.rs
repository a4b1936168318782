//! Board presets.
//!
//! Each preset bundles the GEM instance, PHY address and model, clock
//! routing and divisor table used by a specific Zynq board, so bring-up code
//! only supplies the MAC address, delay and DMA region.
//!
//! # Supported Boards
//!
//! - [`Zc702`]: ZC702 evaluation board (GEM0, Marvell 88E1116R, MIO)
//! - [`Ep107`]: EP107 emulation platform (GEM0, Marvell 88E1111, RGMII quirks)

pub mod ep107;
pub mod zc702;

pub use ep107::Ep107;
pub use zc702::Zc702;
