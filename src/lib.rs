//! Media Ingest Library
//!
//! Normalizes scraped film and TV show metadata into a relational store
//! with idempotent upserts and change-detecting episode writes.

pub mod cli;
pub mod core;
pub mod error;
pub mod models;
pub mod preflight;
pub mod services;
pub mod store;
pub mod utils;

pub use error::{Error, Result};
