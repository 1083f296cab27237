//! Built-in classification functions for grouped summaries.
//!
//! A classifier maps a starting integer (and its trajectory result) to a
//! string key; the aggregator produces one sub-summary per key. Custom
//! closures can be passed to `aggregate` directly; these built-ins cover
//! the classifications the CLI exposes.

use crate::trajectory::TrajectoryResult;
use crate::utils::config::MIN_RESIDUE_MODULUS;
use num_bigint::BigUint;
use num_traits::ToPrimitive;

/// Classification schemes selectable from the CLI
///
/// **Public** - parsed from the `--classify` flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classifier {
    /// Group by parity of the starting value ("odd" / "even")
    Parity,
    /// Group by the starting value's residue modulo the given modulus
    Residue(u64),
}

impl Classifier {
    /// Parse a classifier spec of the form `parity` or `residue:<m>`
    ///
    /// **Public** - used by survey argument validation
    pub fn parse(spec: &str) -> Result<Self, String> {
        if spec == "parity" {
            return Ok(Classifier::Parity);
        }

        if let Some(modulus_text) = spec.strip_prefix("residue:") {
            let modulus: u64 = modulus_text
                .parse()
                .map_err(|_| format!("'{modulus_text}' is not a valid modulus"))?;
            if modulus < MIN_RESIDUE_MODULUS {
                return Err(format!("residue modulus must be >= {MIN_RESIDUE_MODULUS}"));
            }
            return Ok(Classifier::Residue(modulus));
        }

        Err(format!(
            "unknown classifier '{spec}' (expected 'parity' or 'residue:<m>')"
        ))
    }

    /// Compute the classification key for one evaluated integer
    ///
    /// **Public** - total over valid inputs; never fails for the
    /// built-in schemes
    pub fn key(&self, start: &BigUint, _result: &TrajectoryResult) -> Result<String, String> {
        match self {
            Classifier::Parity => {
                if start.bit(0) {
                    Ok("odd".to_string())
                } else {
                    Ok("even".to_string())
                }
            }
            Classifier::Residue(modulus) => {
                // residue < modulus, so the conversion always fits in u64
                let residue = (start % BigUint::from(*modulus)).to_u64().unwrap_or(0);
                Ok(format!("{residue} mod {modulus}"))
            }
        }
    }
}
