//! Store adapters
//!
//! The single adapter today is [`MemoryRecordStore`], a versioned in-memory
//! implementation of the record-store port. The port boundary keeps a
//! database-backed adapter a drop-in replacement.

pub mod memory;

pub use memory::MemoryRecordStore;
