//! Application layer for Category Reorder

pub mod service;

pub use service::CategoryReorderService;
