//! # Domain Models
//!
//! Pure data types shared by the billing mock API: configuration, the entity catalogue,
//! and a handful of constants. Keep it lean: no I/O, networking, or query logic here.

pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
