//! Configuration and constants for the CLI.

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Default step ceiling when the caller does not supply one.
///
/// Generous enough to cover every empirically-known trajectory in the
/// ranges this tool is meant for; the longest trajectory below 10^7
/// takes well under 1,000 steps.
pub const DEFAULT_MAX_STEPS: u64 = 100_000;

// Sanity limits for CLI arguments (library callers are not restricted)
pub const MAX_REASONABLE_STEPS: u64 = 100_000_000;

/// Smallest modulus that produces a non-trivial residue classification
pub const MIN_RESIDUE_MODULUS: u64 = 2;
