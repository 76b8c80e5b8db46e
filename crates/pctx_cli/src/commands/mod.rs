//! CLI commands.

pub mod archive;
pub mod compress;
pub mod domain;
pub mod handoff;
pub mod init;
pub mod reset;
pub mod session;
pub mod stats;
pub mod status;
