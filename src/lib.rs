//! Collatz Lab
//!
//! Bounded trajectory evaluation and range survey statistics for the
//! Collatz map (n -> n/2 for even n, n -> 3n+1 for odd n).
//!
//! This crate provides the core implementation for the
//! `collatz-lab` CLI tool.
//!
//! ## Getting Started
//!
//! Most users should install and use the CLI:
//!
//! ```bash
//! cargo install collatz-lab
//! collatz-lab --help
//! ```
//!
//! The library surface is two layers: [`trajectory`] evaluates a single
//! starting integer under configurable bounds, and [`aggregator`] reduces
//! a bounded set of starting integers into summary statistics.

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod trajectory;
pub mod utils;
