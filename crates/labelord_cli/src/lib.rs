//! labelord command-line front end.
//!
//! The binary in `main.rs` only parses arguments and maps the outcome to a
//! process exit code; the commands themselves live here so they can be tested
//! against a mocked GitHub API.

pub mod commands;
pub mod errors;

pub use errors::Error;

#[cfg(test)]
pub(crate) mod test_support;
