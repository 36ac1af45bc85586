//! onionwatch core - domain model and pure logic
//!
//! This crate provides everything that does not touch the network:
//! - Onion-service protocol version classification (V2/V3 by address length)
//! - Scan records and the on-disk snapshot shape
//! - Deterministic ranking of scan results
//! - Sentinel-delimited regeneration of the status page

pub mod escape;
pub mod page;
pub mod rank;
pub mod record;
pub mod version;

pub use escape::*;
pub use page::*;
pub use rank::*;
pub use record::*;
pub use version::*;

/// Length of a V3 onion host including the ".onion" suffix
pub const V3_ADDR_LEN: usize = 62;

/// Length of a V2 onion host including the ".onion" suffix
pub const V2_ADDR_LEN: usize = 22;
