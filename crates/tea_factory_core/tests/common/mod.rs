//! Shared helpers for integration tests: an in-memory backend and record builders.
#![allow(dead_code)]

pub mod fixtures;
pub mod memory_store;
