//! Data models for the Crônicas de Atlas backend.
//!
//! Field names serialize in camelCase to match the documents the web client reads.

mod city;
mod datastore;
mod news;
mod page_config;
mod story;

pub use city::*;
pub use datastore::*;
pub use news::*;
pub use page_config::*;
pub use story::*;
