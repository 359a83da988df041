//! Data transfer objects

pub mod irm;
pub mod mapping;
pub mod shipping_bill;
