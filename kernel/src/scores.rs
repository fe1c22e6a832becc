//! The seven component scores.
//!
//! Each score maps candidate bytes to an f64 in [0, 1]. A one-byte-prefixed
//! domain suffix is appended before hashing so that every component draws
//! from an independent deterministic matrix despite sharing the block data.

use nalgebra::{DMatrix, SymmetricEigen};

use crate::matrix::{clip01, domain_seed, matrix_power, shannon_entropy_bits, stochastic_matrix};

// Domain suffixes. One byte of separation plus a mnemonic tag; changing any
// of these changes every historical gate verdict.
const DOMAIN_TAU: &[u8] = b"\x01tau";
const DOMAIN_GWT: &[u8] = b"\x02gwt";
const DOMAIN_ICP: &[u8] = b"\x03icp";
const DOMAIN_FANO: &[u8] = b"\x04fano";
const DOMAIN_NAB: &[u8] = b"\x05nab";
const DOMAIN_QG: &[u8] = b"\x06qg";
const DOMAIN_HOLO: &[u8] = b"\x07holo";

/// Low-level component score engine.
///
/// `n_nodes` is the transition-matrix dimension (≥ 2), `temporal_depth` the
/// exponent τ used by [`ScoreEngine::phi_tau`].
#[derive(Debug, Clone, Copy)]
pub struct ScoreEngine {
    n_nodes: usize,
    temporal_depth: u32,
}

impl ScoreEngine {
    /// Construct an engine; dimensions below their floors are clamped.
    pub fn new(n_nodes: usize, temporal_depth: u32) -> Self {
        Self {
            n_nodes: n_nodes.max(2),
            temporal_depth: temporal_depth.max(1),
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    fn transition(&self, data: &[u8], suffix: &[u8]) -> DMatrix<f64> {
        stochastic_matrix(data, suffix, self.n_nodes)
    }

    /// Temporal-depth Φ_τ — normalized eigenvalue entropy of M^τ.
    ///
    /// Measures how evenly information spreads across eigenmodes after τ
    /// steps of the transition dynamics; 1 = maximally integrated.
    pub fn phi_tau(&self, data: &[u8]) -> f64 {
        let mat = self.transition(data, DOMAIN_TAU);
        let powered = matrix_power(&mat, self.temporal_depth);
        let sym = (&powered + powered.transpose()) / 2.0;

        let eigen = SymmetricEigen::new(sym);
        let magnitudes: Vec<f64> = eigen.eigenvalues.iter().map(|e| e.abs()).collect();

        let max_entropy = if magnitudes.len() > 1 {
            (magnitudes.len() as f64).log2()
        } else {
            1.0
        };
        clip01(shannon_entropy_bits(&magnitudes) / max_entropy)
    }

    /// Global-workspace score — normalized spectral gap |λ₁| − |λ₂|.
    ///
    /// A large gap means information converges quickly onto a dominant
    /// broadcast mode.
    pub fn gwt_score(&self, data: &[u8]) -> f64 {
        let mat = self.transition(data, DOMAIN_GWT);
        let mut moduli: Vec<f64> = mat.complex_eigenvalues().iter().map(|c| c.norm()).collect();
        moduli.sort_by(|a, b| b.total_cmp(a));

        let gap = if moduli.len() >= 2 {
            moduli[0] - moduli[1]
        } else {
            0.0
        };
        clip01(gap)
    }

    /// Integrated causal power — inverse condition number σ_min / σ_max.
    ///
    /// 1 means every direction carries the same causal weight.
    pub fn icp_avg(&self, data: &[u8]) -> f64 {
        let mat = self.transition(data, DOMAIN_ICP);
        let sv = mat.svd(false, false).singular_values;
        clip01(sv[sv.len() - 1] / (sv[0] + 1e-12))
    }

    /// Fano plane alignment — SVD-spectrum flatness of a 4×7 projection.
    ///
    /// 28 seed bytes map onto a 4×7 matrix; a flat singular spectrum
    /// (weak leading value) scores high.
    pub fn fano_score(&self, data: &[u8]) -> f64 {
        let seed = domain_seed(data, DOMAIN_FANO);
        let entries: Vec<f64> = seed[..28].iter().map(|&b| b as f64 / 255.0).collect();
        let mat = DMatrix::from_row_slice(4, 7, &entries);

        let sv = mat.svd(false, false).singular_values;
        let sum: f64 = sv.iter().sum::<f64>() + 1e-12;
        clip01(1.0 - sv[0] / sum)
    }

    /// Nabla Φ — normalized Frobenius norm of the antisymmetric part of M.
    ///
    /// Measures the magnitude of directional (non-reciprocal) flow. The
    /// denominator is the Frobenius bound for antisymmetric matrices with
    /// entries in [−0.5, 0.5].
    pub fn phi_nab(&self, data: &[u8]) -> f64 {
        let mat = self.transition(data, DOMAIN_NAB);
        let antisym = (&mat - mat.transpose()) / 2.0;

        let n = self.n_nodes as f64;
        let bound = 0.5 * (n * (n - 1.0)).sqrt() + 1e-12;
        clip01(antisym.norm() / bound)
    }

    /// Quantum-gravity curvature Φ_qg — normalized eigenvalue variance of a
    /// symmetric 4×4 tensor. 0 = flat, 1 = maximally curved.
    pub fn qg_score(&self, data: &[u8]) -> f64 {
        let seed = domain_seed(data, DOMAIN_QG);
        let entries: Vec<f64> = seed[..16].iter().map(|&b| b as f64 / 255.0).collect();
        let raw = DMatrix::from_row_slice(4, 4, &entries);
        let tensor = (&raw + raw.transpose()) / 2.0;

        let eigen = SymmetricEigen::new(tensor);
        let ev = &eigen.eigenvalues;

        let count = ev.len() as f64;
        let mean = ev.iter().sum::<f64>() / count;
        let variance = ev.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / count;

        let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
        for &e in ev.iter() {
            lo = lo.min(e);
            hi = hi.max(e);
        }
        let range = hi - lo + 1e-12;

        // Population variance peaks at (range/2)² when the eigenvalues sit
        // half at each extreme, so the ratio stays in [0, 1].
        clip01(variance / ((range / 2.0).powi(2) + 1e-12))
    }

    /// Holographic entropy Φ_holo — normalized Shannon entropy of the 32
    /// seed bytes treated as unnormalized probability mass.
    pub fn holo_score(&self, data: &[u8]) -> f64 {
        let seed = domain_seed(data, DOMAIN_HOLO);
        let values: Vec<f64> = seed.iter().map(|&b| b as f64).collect();
        clip01(shannon_entropy_bits(&values) / (32f64).log2())
    }
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self::new(3, 2)
    }
}
