//! Request handlers

pub mod health;
pub mod irm;
pub mod mapping;
pub mod shipping_bill;
