//! Gate identifiers and the spectral difficulty predicate.
//!
//! Target convention:
//!
//! ```text
//! target = 2^(256 − bit_length(difficulty))
//! ```
//!
//! A hash passes iff its 256-bit integer value is strictly below the
//! target, so a growing difficulty integer demands more leading zero bits.

use std::fmt;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::Serialize;

/// The three validity gates, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gate {
    /// Spectral hash below the difficulty target.
    Difficulty,
    /// Φ_total above the node-count threshold.
    Consciousness,
    /// Φ_qg at or above the configured curvature floor.
    QgCurvature,
}

impl Gate {
    /// Stable name used in rejection reporting.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Difficulty => "difficulty",
            Self::Consciousness => "consciousness",
            Self::QgCurvature => "qg_curvature",
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty target as a big integer, or `None` when `difficulty = 0`
/// (no work required).
///
/// `bit_length` is clamped to 256 so that any difficulty at or beyond
/// 2^255 yields the floor target of 1, which no hash can beat — impossible
/// difficulties exhaust cleanly instead of overflowing.
fn target_from_difficulty(difficulty: &BigUint) -> Option<BigUint> {
    if difficulty.is_zero() {
        return None;
    }
    let bits = difficulty.bits().min(256);
    Some(BigUint::one() << (256 - bits) as usize)
}

/// The difficulty target as 64 hex chars (diagnostic form; `difficulty = 0`
/// reports the all-ff unbounded target).
pub fn target_hex_from_difficulty(difficulty: &BigUint) -> String {
    match target_from_difficulty(difficulty) {
        Some(target) => format!("{:0>64}", target.to_str_radix(16)),
        None => "f".repeat(64),
    }
}

/// True when `hash_hex` satisfies `difficulty`.
///
/// `difficulty ≤ 0` always passes. A string that is not valid hex cannot
/// beat any target and returns false.
pub fn meets_difficulty(hash_hex: &str, difficulty: &BigUint) -> bool {
    let Some(target) = target_from_difficulty(difficulty) else {
        return true;
    };
    match BigUint::parse_bytes(hash_hex.as_bytes(), 16) {
        Some(hash_value) => hash_value < target,
        None => false,
    }
}
