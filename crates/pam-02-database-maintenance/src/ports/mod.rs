//! Ports module for Database Maintenance

pub mod inbound;
pub mod outbound;

pub use inbound::{DatabaseCheckApi, TestUserSeedingApi};
pub use outbound::AccountStore;
