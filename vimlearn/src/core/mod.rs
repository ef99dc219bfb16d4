//! Deterministic, pure logic for the tutor.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod curriculum;
pub mod invariants;
pub mod menu;
pub mod normalize;
pub mod profile;
pub mod types;
