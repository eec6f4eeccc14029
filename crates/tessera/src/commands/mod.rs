//! Subcommand implementations.

pub mod build;
pub mod check;
pub mod export;
pub mod init;
pub mod list;
pub mod serve;
