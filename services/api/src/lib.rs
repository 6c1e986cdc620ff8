//! services/api/src/lib.rs
//!
//! The daily report API: storage adapters, configuration and the request handler.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
