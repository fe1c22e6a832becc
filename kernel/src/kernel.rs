//! Three-gate mining kernel.
//!
//! Candidates flow through the gates cheapest-first: the spectral
//! difficulty check (one SHA-256 + one 8×8 SVD) runs before the seven-score
//! Φ computation, and the curvature floor is checked on the structure the
//! consciousness gate already paid for.

use num_bigint::BigUint;
use serde::Serialize;
use tracing::debug;

use crate::config::KernelConfig;
use crate::gates::{meets_difficulty, Gate};
use crate::phi::{CompositeEngine, PhiStructure};
use crate::spectral::SpectralHash;

/// Result of a single [`Kernel::mine`] call.
///
/// `nonce` and `block_hash` are `None` when no valid nonce was found; in
/// that case all score fields are 0.0 and `phi_score` is the legacy floor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MineResult {
    /// Winning nonce, if any.
    pub nonce: Option<u64>,
    /// 64-char hex spectral hash of the winning candidate.
    pub block_hash: Option<String>,
    /// Composite Φ_total of the winning candidate.
    pub phi_total: f64,
    /// Quantum-gravity curvature score.
    pub qg_score: f64,
    /// Holographic entropy score.
    pub holo_score: f64,
    /// Fano plane alignment score.
    pub fano_score: f64,
    /// Legacy score in [200, 1000] for external consumers.
    pub phi_score: f64,
    /// Nonces tested, including the winning one.
    pub attempts: u64,
}

impl MineResult {
    fn exhausted(max_attempts: u64) -> Self {
        Self {
            nonce: None,
            block_hash: None,
            phi_total: 0.0,
            qg_score: 0.0,
            holo_score: 0.0,
            fano_score: 0.0,
            phi_score: 200.0,
            attempts: max_attempts,
        }
    }
}

/// Per-gate rejection counters for one mining run.
///
/// Invariant: the three rejection counters plus `accepted` always sum to
/// `total_attempts`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MiningStats {
    /// Total nonces tested.
    pub total_attempts: u64,
    /// Candidates that failed the spectral difficulty gate.
    pub difficulty_rejected: u64,
    /// Candidates that failed the consciousness gate.
    pub consciousness_rejected: u64,
    /// Candidates that failed the curvature floor.
    pub qg_curvature_rejected: u64,
    /// 1 when a valid nonce was found, else 0.
    pub accepted: u64,
}

impl MiningStats {
    fn record_rejection(&mut self, gate: Gate) {
        match gate {
            Gate::Difficulty => self.difficulty_rejected += 1,
            Gate::Consciousness => self.consciousness_rejected += 1,
            Gate::QgCurvature => self.qg_curvature_rejected += 1,
        }
    }

    /// Sum of the per-gate breakdown (rejections + acceptances).
    pub fn breakdown_total(&self) -> u64 {
        self.difficulty_rejected + self.consciousness_rejected + self.qg_curvature_rejected
            + self.accepted
    }
}

/// Three-gate mining kernel.
///
/// Holds the spectral hasher, the composite Φ engine, and the curvature
/// floor. Construction never fails; out-of-range config values are
/// clamped.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    spectral: SpectralHash,
    composite: CompositeEngine,
    qg_threshold: f64,
}

impl Kernel {
    pub fn new(config: KernelConfig) -> Self {
        let config = config.sanitized();
        Self {
            spectral: SpectralHash::new(),
            composite: CompositeEngine::new(&config),
            qg_threshold: config.qg_threshold,
        }
    }

    /// The 64-char hex spectral hash of `data`.
    pub fn compute_hash(&self, data: &[u8]) -> String {
        self.spectral.signature(data)
    }

    /// The full Φ structure of `data`.
    pub fn compute_phi_structure(&self, data: &[u8]) -> PhiStructure {
        self.composite.compute_structure(data)
    }

    /// The legacy [200, 1000] score of `data`.
    pub fn compute_phi_score(&self, data: &[u8]) -> f64 {
        CompositeEngine::legacy_score(self.compute_phi_structure(data).phi_total)
    }

    /// True when `hash_hex` satisfies `difficulty` (pure helper).
    pub fn meets_difficulty(hash_hex: &str, difficulty: &BigUint) -> bool {
        meets_difficulty(hash_hex, difficulty)
    }

    /// Evaluate all three gates on `data`, cheapest first.
    ///
    /// Returns `(valid, structure, rejected_by)`. On a difficulty-gate
    /// rejection the Φ structure is never computed and the default
    /// (all-zero) structure is returned.
    pub fn is_valid_block(
        &self,
        data: &[u8],
        difficulty: &BigUint,
        n_network_nodes: u64,
    ) -> (bool, PhiStructure, Option<Gate>) {
        // Gate 1: spectral difficulty
        let hash_hex = self.compute_hash(data);
        if !meets_difficulty(&hash_hex, difficulty) {
            return (false, PhiStructure::default(), Some(Gate::Difficulty));
        }

        // Gate 2: consciousness threshold
        let structure = self.compute_phi_structure(data);
        if !self.composite.consciousness_ok(
            structure.phi_total,
            structure.fano_score,
            structure.qg_score,
            n_network_nodes,
        ) {
            return (false, structure, Some(Gate::Consciousness));
        }

        // Gate 3: curvature floor
        if structure.qg_score < self.qg_threshold {
            return (false, structure, Some(Gate::QgCurvature));
        }

        (true, structure, None)
    }

    /// Iterate nonces from 0 until all three gates pass or `max_attempts`
    /// is exhausted.
    ///
    /// Each candidate is the UTF-8 bytes of `block_data` followed by the
    /// decimal representation of the nonce — this byte layout is the wire
    /// contract shared by every compatible miner.
    pub fn mine(
        &self,
        block_data: &str,
        difficulty: &BigUint,
        n_network_nodes: u64,
        max_attempts: u64,
    ) -> MineResult {
        for nonce in 0..max_attempts {
            let data = candidate_bytes(block_data, nonce);
            let (valid, structure, _) = self.is_valid_block(&data, difficulty, n_network_nodes);
            if valid {
                return self.winning_result(&data, nonce, &structure);
            }
        }

        debug!(max_attempts, "no valid nonce found");
        MineResult::exhausted(max_attempts)
    }

    /// Like [`Kernel::mine`] but also returns per-gate rejection counts.
    pub fn mine_with_stats(
        &self,
        block_data: &str,
        difficulty: &BigUint,
        n_network_nodes: u64,
        max_attempts: u64,
    ) -> (MineResult, MiningStats) {
        let mut stats = MiningStats::default();

        for nonce in 0..max_attempts {
            stats.total_attempts += 1;
            let data = candidate_bytes(block_data, nonce);
            let (_, structure, rejected_by) =
                self.is_valid_block(&data, difficulty, n_network_nodes);

            if let Some(gate) = rejected_by {
                stats.record_rejection(gate);
                continue;
            }

            stats.accepted = 1;
            return (self.winning_result(&data, nonce, &structure), stats);
        }

        (MineResult::exhausted(max_attempts), stats)
    }

    fn winning_result(&self, data: &[u8], nonce: u64, structure: &PhiStructure) -> MineResult {
        let hash_hex = self.compute_hash(data);
        debug!(
            nonce,
            hash = &hash_hex[..16],
            phi_total = structure.phi_total,
            qg_score = structure.qg_score,
            "block found"
        );
        MineResult {
            nonce: Some(nonce),
            block_hash: Some(hash_hex),
            phi_total: structure.phi_total,
            qg_score: structure.qg_score,
            holo_score: structure.holo_score,
            fano_score: structure.fano_score,
            phi_score: CompositeEngine::legacy_score(structure.phi_total),
            attempts: nonce + 1,
        }
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new(KernelConfig::default())
    }
}

/// `block_data ‖ decimal(nonce)` as UTF-8 bytes.
fn candidate_bytes(block_data: &str, nonce: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(block_data.len() + 20);
    data.extend_from_slice(block_data.as_bytes());
    data.extend_from_slice(nonce.to_string().as_bytes());
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_kernel() -> Kernel {
        // No curvature floor — gates 1 and 2 decide everything.
        Kernel::new(KernelConfig {
            qg_threshold: 0.0,
            ..KernelConfig::default()
        })
    }

    #[test]
    fn test_candidate_bytes_decimal_ascii() {
        assert_eq!(candidate_bytes("blk", 0), b"blk0");
        assert_eq!(candidate_bytes("blk", 42), b"blk42");
        assert_eq!(candidate_bytes("", 1_000_000), b"1000000");
    }

    #[test]
    fn test_zero_difficulty_passes_gate_one() {
        let kernel = open_kernel();
        let (valid, structure, rejected) =
            kernel.is_valid_block(b"free pass", &BigUint::from(0u8), 1);
        // Gate 1 cannot reject; whatever happens next, the structure is
        // computed.
        assert!(rejected != Some(Gate::Difficulty));
        assert_eq!(valid, rejected.is_none());
        assert!(structure.phi_total > 0.0);
    }

    #[test]
    fn test_difficulty_rejection_skips_phi() {
        let kernel = open_kernel();
        // Impossible target: every candidate dies at gate 1 with the
        // default structure.
        let impossible = (BigUint::from(1u8) << 256u32) - BigUint::from(1u8);
        let (valid, structure, rejected) = kernel.is_valid_block(b"x", &impossible, 1);
        assert!(!valid);
        assert_eq!(rejected, Some(Gate::Difficulty));
        assert_eq!(structure, PhiStructure::default());
    }

    #[test]
    fn test_consciousness_rejection_reports_structure() {
        let kernel = open_kernel();
        // n = 2^32 → threshold 32, unreachable by phi_total ≤ 1.
        let (valid, structure, rejected) =
            kernel.is_valid_block(b"too many nodes", &BigUint::from(0u8), 1u64 << 32);
        assert!(!valid);
        assert_eq!(rejected, Some(Gate::Consciousness));
        assert!(structure.phi_total > 0.0);
    }

    #[test]
    fn test_qg_gate_rejects_under_floor() {
        let kernel = Kernel::new(KernelConfig {
            qg_threshold: 1.0,
            ..KernelConfig::default()
        });
        let mut saw_qg_rejection = false;
        for nonce in 0..50u64 {
            let data = candidate_bytes("curvature", nonce);
            let (valid, _, rejected) = kernel.is_valid_block(&data, &BigUint::from(0u8), 1);
            assert_eq!(valid, rejected.is_none());
            if rejected == Some(Gate::QgCurvature) {
                saw_qg_rejection = true;
            }
        }
        assert!(saw_qg_rejection);
    }

    #[test]
    fn test_mine_finds_nonce_at_low_difficulty() {
        let kernel = open_kernel();
        let result = kernel.mine("genesis", &BigUint::from(1u8), 1, 2_000);
        let nonce = result.nonce.expect("difficulty 1 should be mineable");
        assert_eq!(result.attempts, nonce + 1);
        assert_eq!(result.block_hash.as_ref().map(String::len), Some(64));
        assert!((0.0..=1.0).contains(&result.phi_total));
        assert!((200.0..=1000.0).contains(&result.phi_score));
    }

    #[test]
    fn test_mine_reproducible() {
        let kernel = open_kernel();
        let a = kernel.mine("repeat", &BigUint::from(1u8), 1, 2_000);
        let b = kernel.mine("repeat", &BigUint::from(1u8), 1, 2_000);
        assert_eq!(a, b);
    }

    #[test]
    fn test_mine_exhaustion_sentinel() {
        let kernel = open_kernel();
        let impossible = (BigUint::from(1u8) << 256u32) - BigUint::from(1u8);
        let result = kernel.mine("impossible", &impossible, 1, 5);
        assert_eq!(result.nonce, None);
        assert_eq!(result.block_hash, None);
        assert_eq!(result.attempts, 5);
        assert_eq!(result.phi_score, 200.0);
        assert_eq!(result.phi_total, 0.0);
    }

    #[test]
    fn test_stats_breakdown_sums_on_success() {
        let kernel = open_kernel();
        let (result, stats) = kernel.mine_with_stats("stats", &BigUint::from(1u8), 1, 2_000);
        assert!(result.nonce.is_some());
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.breakdown_total(), stats.total_attempts);
        assert_eq!(stats.total_attempts, result.attempts);
    }

    #[test]
    fn test_stats_breakdown_sums_on_exhaustion() {
        let kernel = open_kernel();
        let impossible = (BigUint::from(1u8) << 256u32) - BigUint::from(1u8);
        let (result, stats) = kernel.mine_with_stats("impossible", &impossible, 1, 8);
        assert_eq!(result.nonce, None);
        assert_eq!(stats.accepted, 0);
        assert_eq!(stats.total_attempts, 8);
        assert_eq!(stats.difficulty_rejected, 8);
        assert_eq!(stats.breakdown_total(), stats.total_attempts);
    }

    #[test]
    fn test_mine_and_stats_agree() {
        let kernel = open_kernel();
        let plain = kernel.mine("agree", &BigUint::from(1u8), 1, 2_000);
        let (with_stats, _) = kernel.mine_with_stats("agree", &BigUint::from(1u8), 1, 2_000);
        assert_eq!(plain, with_stats);
    }
}
