//! Core Kernel - Foundational types for the export reconciliation system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Monetary amounts with precise decimal arithmetic and free-text parsing
//! - External date format handling (dd-mm-yyyy)
//! - Strongly-typed identifiers
//! - Port abstractions for the record store boundary

pub mod dates;
pub mod identifiers;
pub mod money;
pub mod ports;

pub use dates::DateError;
pub use identifiers::{IrmId, MappingId, ShippingBillId};
pub use money::{Amount, MoneyError};
pub use ports::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError,
};
