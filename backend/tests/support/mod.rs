//! Shared helpers for relay integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`; this
//! module hosts the throwaway processing backend they point the relay at.

#![allow(dead_code, reason = "each test crate uses a different subset of helpers")]

pub mod fake_backend;
