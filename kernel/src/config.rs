//! Kernel configuration: composite weights and score-engine parameters.
//!
//! Out-of-range values are clamped, never rejected — a kernel constructed
//! from any config is always usable.

use serde::{Deserialize, Serialize};

/// Composite weights (α..η) for the seven component scores.
///
/// The defaults sum to 1.0, which keeps `phi_total` in [0, 1]. `delta` and
/// `zeta` also feed the consciousness-gate threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    /// Weight for Φ_τ (temporal-depth eigenvalue entropy).
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Weight for the global-workspace spectral gap.
    #[serde(default = "default_beta")]
    pub beta: f64,
    /// Weight for the inverse condition number.
    #[serde(default = "default_gamma")]
    pub gamma: f64,
    /// Weight for the Fano plane alignment score.
    #[serde(default = "default_delta")]
    pub delta: f64,
    /// Weight for the antisymmetric flow norm.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// Weight for the quantum-gravity curvature score.
    #[serde(default = "default_zeta")]
    pub zeta: f64,
    /// Weight for the holographic entropy score.
    #[serde(default = "default_eta")]
    pub eta: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            beta: default_beta(),
            gamma: default_gamma(),
            delta: default_delta(),
            epsilon: default_epsilon(),
            zeta: default_zeta(),
            eta: default_eta(),
        }
    }
}

impl Weights {
    /// Sum of all seven weights.
    pub fn sum(&self) -> f64 {
        self.alpha + self.beta + self.gamma + self.delta + self.epsilon + self.zeta + self.eta
    }
}

/// Kernel configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Composite weights.
    #[serde(default)]
    pub weights: Weights,

    /// Internal transition-matrix dimension (clamped to ≥ 2 — the spectral
    /// gap needs at least two eigenvalues).
    #[serde(default = "default_n_nodes")]
    pub n_nodes: usize,

    /// Exponent τ for temporal-depth integration (clamped to ≥ 1).
    #[serde(default = "default_temporal_depth")]
    pub temporal_depth: u32,

    /// Minimum Φ_qg required by the curvature gate (clamped to [0, 1]).
    #[serde(default = "default_qg_threshold")]
    pub qg_threshold: f64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            n_nodes: default_n_nodes(),
            temporal_depth: default_temporal_depth(),
            qg_threshold: default_qg_threshold(),
        }
    }
}

impl KernelConfig {
    /// Return a copy with every parameter clamped to its legal range.
    pub fn sanitized(mut self) -> Self {
        self.n_nodes = self.n_nodes.max(2);
        self.temporal_depth = self.temporal_depth.max(1);
        self.qg_threshold = self.qg_threshold.clamp(0.0, 1.0);
        if self.qg_threshold.is_nan() {
            self.qg_threshold = default_qg_threshold();
        }
        self
    }
}

// Default value functions

fn default_alpha() -> f64 {
    0.30
}

fn default_beta() -> f64 {
    0.15
}

fn default_gamma() -> f64 {
    0.15
}

fn default_delta() -> f64 {
    0.15
}

fn default_epsilon() -> f64 {
    0.10
}

fn default_zeta() -> f64 {
    0.10
}

fn default_eta() -> f64 {
    0.05
}

fn default_n_nodes() -> usize {
    3
}

fn default_temporal_depth() -> u32 {
    2
}

fn default_qg_threshold() -> f64 {
    0.10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = Weights::default();
        assert!((w.sum() - 1.0).abs() < 1e-12, "default weights sum = {}", w.sum());
    }

    #[test]
    fn test_sanitize_clamps_low_values() {
        let cfg = KernelConfig {
            n_nodes: 1,
            temporal_depth: 0,
            qg_threshold: -0.5,
            ..KernelConfig::default()
        }
        .sanitized();

        assert_eq!(cfg.n_nodes, 2);
        assert_eq!(cfg.temporal_depth, 1);
        assert_eq!(cfg.qg_threshold, 0.0);
    }

    #[test]
    fn test_sanitize_clamps_high_threshold() {
        let cfg = KernelConfig {
            qg_threshold: 3.0,
            ..KernelConfig::default()
        }
        .sanitized();
        assert_eq!(cfg.qg_threshold, 1.0);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let cfg = KernelConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: KernelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }

    #[test]
    fn test_partial_json_uses_field_defaults() {
        let cfg: KernelConfig = serde_json::from_str(r#"{"qg_threshold": 0.25}"#).unwrap();
        assert_eq!(cfg.qg_threshold, 0.25);
        assert_eq!(cfg.n_nodes, 3);
        assert_eq!(cfg.weights.alpha, 0.30);
    }
}
