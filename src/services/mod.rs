// src/services/mod.rs
pub mod calculations;
pub mod dashboard;
pub mod feed;
pub mod scheduler;
pub mod treasury;
