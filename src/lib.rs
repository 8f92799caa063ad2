// Library exports for alfred
// This allows integration tests and external code to drive the server directly

pub mod common;
pub mod config;
pub mod prompts;
