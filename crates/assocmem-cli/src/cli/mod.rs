//! CLI module for assocmem

pub mod commands;
pub mod format;
