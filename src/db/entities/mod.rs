//! Database entities

pub mod chef;
pub mod dish;
