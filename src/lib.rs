// ABOUTME: Library root for stackdeploy - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod backend;
pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod params;
pub mod stack;
pub mod tail;
pub mod template;
pub mod types;
