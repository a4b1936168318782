//! DMA descriptor rings and buffers
//!
//! All memory is statically allocated by the user in a [`DmaRegion`]; the
//! queues borrow slices of it for the lifetime of the driver.
//!
//! # Architecture
//!
//! - [`DescriptorRing`]: circular ring of descriptors with a wrap marker
//! - [`RxQueue`]: receive ring with deferred start-of-frame recycling
//! - [`TxQueue`]: transmit ring with free / pre-work / hardware / post-work
//!   bookkeeping

pub mod descriptor;
mod region;
mod ring;
mod rx;
mod tx;

pub use descriptor::{DmaBuffer, RxDescriptor, TxDescriptor};
pub use region::{DmaParts, DmaRegion};
pub use ring::DescriptorRing;
pub use rx::RxQueue;
pub use tx::TxQueue;
