// src/lib.rs

pub mod config;
pub mod core;
pub mod dataset;
pub mod error;
pub use crate::config::RecommenderConfig;
pub use crate::core::engine::{Model, SharedModel};
pub use crate::core::types::{Provenance, Recommendation, Transaction};
