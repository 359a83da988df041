//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! export-recon test suite.
//!
//! # Modules
//!
//! - `builders`: Builder patterns for test record construction
//! - `fixtures`: Pre-built test data for common scenarios
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based and fake test data generators

pub mod assertions;
pub mod builders;
pub mod fixtures;
pub mod generators;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
pub use generators::*;
