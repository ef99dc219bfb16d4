//! Side-effecting helpers: files, the editor subprocess, the terminal.

pub mod config;
pub mod editor;
pub mod exercise_runner;
pub mod paths;
pub mod profile_store;
pub mod terminal;
