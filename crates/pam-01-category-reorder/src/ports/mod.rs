//! Ports module for Category Reorder
//!
//! Defines inbound (API) and outbound (SPI) port traits.

pub mod inbound;
pub mod outbound;

pub use inbound::CategoryReorderApi;
pub use outbound::{CategoryStore, CategoryTransaction};
