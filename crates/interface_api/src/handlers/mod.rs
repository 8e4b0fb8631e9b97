//! Route handlers

pub mod analytics;
pub mod claims;
pub mod health;
