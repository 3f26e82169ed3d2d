//! synthctl - command-line client for a synthetic monitoring backend
//!
//! Manages synthetic tests (HTTP, scripted and browser checks), the
//! credentials those tests reference, smart alerts on their results, and
//! the managed locations they run from, against the backend's JSON REST
//! API. Connection profiles live in `~/.synthetic/config.json`.
//!
//! The heavy lifting is in the member crates:
//!
//! - `synthctl-model` - payload builders and field-level updaters
//! - `synthctl-client` - blocking REST client and pagination
//! - `synthctl-config` - profile store and auth resolution
//!
//! This crate is the `clap` command surface, terminal output formatting,
//! and the per-subcommand orchestration in [`commands`].

pub mod cli;
pub mod commands;
pub mod exit_codes;
pub mod output;

pub use exit_codes::ExitCode;
