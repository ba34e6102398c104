//! Shared test utilities for the KeePassXC extension workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only; never published.
//!
//! # Modules
//!
//! - [`workspace`]: [`TestWorkspace`](workspace::TestWorkspace): fake data
//!   home, working checkout and temp dir
//! - [`keepassxc`]: a scripted stand-in for `keepassxc-cli`

pub mod keepassxc;
pub mod workspace;
