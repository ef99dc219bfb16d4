//! Stable exit codes for vimlearn CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Invalid config, username or profile data, or any other error.
pub const INVALID: i32 = 1;
/// `vimlearn start` could not find the configured editor.
pub const EDITOR_MISSING: i32 = 2;
/// Named user or lesson does not exist.
pub const NOT_FOUND: i32 = 3;
