//! Interactive Vim tutor.
//!
//! Lessons are grouped into modules; each lesson carries exercises that are
//! solved in a real editor and judged by comparing the saved file against an
//! expected text. The crate is split the same way throughout:
//!
//! - **[`core`]**: Pure, deterministic logic (curriculum order, text
//!   normalization, statistics rules, the per-exercise menu machine).
//! - **[`io`]**: Side-effecting operations (config and profile files, the
//!   editor subprocess, terminal rendering). Isolated behind traits where
//!   tests need doubles.
//!
//! Orchestration modules ([`session`], [`commands`], [`screens`]) coordinate
//! core logic with I/O to implement CLI commands.

pub mod commands;
pub mod console;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod screens;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
