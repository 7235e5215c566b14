//! Common utilities for the csspath tools.
//!
//! This crate provides shared infrastructure used by the front ends:
//! - **Warning System** - colored terminal output for recoverable problems

pub mod warning;
