//! Editing core for decision sets: condition rule units with AND/OR condition
//! trees, branch action lists and an optional loop target.
//!
//! The architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (document model, normalization,
//!   the command reducer, reference checks). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config, document and catalog files,
//!   command batches, scaffolding).
//!
//! [`session`] owns one document, replays commands through the reducer and
//! notifies an observer; the `rule-editor` binary drives it from the CLI.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
