//! Composite Φ structure and the consciousness-gate predicate.

use serde::{Deserialize, Serialize};

use crate::config::{KernelConfig, Weights};
use crate::matrix::clip01;
use crate::scores::ScoreEngine;

/// Full Φ structure for a single block candidate.
///
/// All component scores are in [0, 1]; `phi_total` is the weighted
/// composite and also lies in [0, 1] with the default weights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhiStructure {
    /// Temporal-depth Φ — eigenvalue entropy of M^τ.
    pub phi_tau: f64,
    /// Global-workspace score — spectral gap λ₁ − λ₂.
    pub gwt_s: f64,
    /// Integrated causal power — inverse condition number.
    pub icp_avg: f64,
    /// Fano plane alignment — SVD-spectrum flatness.
    pub fano_score: f64,
    /// Nabla Φ — antisymmetric flow norm.
    pub phi_nab: f64,
    /// Quantum-gravity curvature score.
    pub qg_score: f64,
    /// Holographic entropy score.
    pub holo_score: f64,
    /// Weighted composite of the seven components.
    pub phi_total: f64,
}

/// Composite engine: evaluates all seven components, folds them into
/// Φ_total, and hosts the consciousness-gate predicate.
#[derive(Debug, Clone, Copy)]
pub struct CompositeEngine {
    weights: Weights,
    engine: ScoreEngine,
}

impl CompositeEngine {
    pub fn new(config: &KernelConfig) -> Self {
        Self {
            weights: config.weights,
            engine: ScoreEngine::new(config.n_nodes, config.temporal_depth),
        }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Compute the full Φ structure for `data`.
    pub fn compute_structure(&self, data: &[u8]) -> PhiStructure {
        let phi_tau = self.engine.phi_tau(data);
        let gwt_s = self.engine.gwt_score(data);
        let icp_avg = self.engine.icp_avg(data);
        let fano_score = self.engine.fano_score(data);
        let phi_nab = self.engine.phi_nab(data);
        let qg_score = self.engine.qg_score(data);
        let holo_score = self.engine.holo_score(data);

        let w = &self.weights;
        let phi_total = w.alpha * phi_tau
            + w.beta * gwt_s
            + w.gamma * icp_avg
            + w.delta * fano_score
            + w.epsilon * phi_nab
            + w.zeta * qg_score
            + w.eta * holo_score;

        PhiStructure {
            phi_tau,
            gwt_s,
            icp_avg,
            fano_score,
            phi_nab,
            qg_score,
            holo_score,
            phi_total: clip01(phi_total),
        }
    }

    /// Map Φ_total ∈ [0, 1] onto the legacy score range [200, 1000].
    ///
    /// External consumers store `200 + 800·Φ_total`.
    pub fn legacy_score(phi_total: f64) -> f64 {
        if phi_total.is_nan() {
            return 200.0;
        }
        (200.0 + phi_total * 800.0).clamp(200.0, 1000.0)
    }

    /// Consciousness gate: `Φ_total > log₂(n) + δ·Φ_fano + ζ·Φ_qg`.
    ///
    /// The inequality is strict; equality fails. For a solo network
    /// (`n_network_nodes = 1`) the log term vanishes and the threshold is
    /// just the δ/ζ contribution. The threshold grows as log₂(n), making
    /// acceptance progressively stricter on larger networks.
    pub fn consciousness_ok(
        &self,
        phi_total: f64,
        fano_score: f64,
        qg_score: f64,
        n_network_nodes: u64,
    ) -> bool {
        let n = n_network_nodes.max(1) as f64;
        let threshold = n.log2() + self.weights.delta * fano_score + self.weights.zeta * qg_score;
        phi_total > threshold
    }
}
