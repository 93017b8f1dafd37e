//! Stable exit codes for `rule-editor` commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Invalid config, document, catalog or command file, or any other error.
pub const INVALID: i32 = 1;
/// `apply` in strict mode saw at least one rejected command.
pub const REJECTED: i32 = 2;
/// `refs` found references missing from the catalog.
pub const DANGLING: i32 = 3;
