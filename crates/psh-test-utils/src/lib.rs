//! Shared test utilities for the platform runtime emulator workspace.
//!
//! This crate provides standardised fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`project`]: [`project::TestProject`] descriptor builder and the
//!   reference scenario
//! - [`payload`]: decoding of base64 JSON payloads for assertions

pub mod payload;
pub mod project;
