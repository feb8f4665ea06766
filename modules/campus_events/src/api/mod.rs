//! API layer - REST and native adapters over the domain service

pub mod native;
pub mod rest;
