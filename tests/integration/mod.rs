//! Integration test suite for bmad-resolver
//!
//! End-to-end tests over real content trees in temporary directories.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **properties**: dedup, core inclusion, cycles, diamonds, missing tolerance
//! - **scenarios**: the canonical agent/task trees and glob expansion
//! - **modules**: cross-module references, layouts, local-skip and bundling
//! - **config**: configuration file lookup and its effect on resolution
//! - **cli**: the `bmad-resolver` binary

mod cli;
mod config;
mod modules;
mod properties;
