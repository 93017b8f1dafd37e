//! Deterministic, pure logic of the decision set editor.
//!
//! Core modules must be free of I/O side effects and do not log. They operate
//! on in-memory documents and return deterministic outputs suitable for tests.

pub mod action;
pub mod catalog;
pub mod command;
pub mod condition;
pub mod document;
pub mod error;
pub mod ids;
pub mod invariants;
pub mod normalize;
pub mod path;
pub mod reducer;
pub mod references;
pub mod types;
pub mod value;
