//! Core ingestion engine.

pub mod episodes;
pub mod film;
pub mod ingest;
pub mod normalizer;
pub mod scanner;
pub mod slug;
pub mod writer;
