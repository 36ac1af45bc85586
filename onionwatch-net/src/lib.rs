//! onionwatch networking layer
//!
//! Probes watched domains for Onion-Location advertisements:
//! - `HeaderInspector` is the pluggable seam over the HTTP surface
//! - `probe` turns an inspection into a tri-state outcome
//! - `scan` runs the probe over a domain list with bounded concurrency

pub mod inspect;
pub mod probe;
pub mod scan;

pub use inspect::*;
pub use probe::*;
pub use scan::*;
