//! I/O helpers for `rule-editor` commands.

pub mod catalog_store;
pub mod commands;
pub mod config;
pub mod document_store;
pub mod init;
