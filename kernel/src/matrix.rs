//! Deterministic matrix seeding and small numeric helpers.
//!
//! All randomness in the kernel is derived from SHA-256 in counter mode, so
//! every matrix is a pure function of `(data, suffix)`.

use nalgebra::DMatrix;
use sha2::{Digest, Sha256};

/// SHA-256 digest as a fixed 32-byte array.
pub(crate) fn sha256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(data));
    out
}

/// SHA-256 of `data ‖ suffix` — the per-component domain seed.
pub(crate) fn domain_seed(data: &[u8], suffix: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.update(suffix);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Build a deterministic n×n row-stochastic transition matrix.
///
/// A counter-mode SHA-256 keystream over `SHA-256(data ‖ suffix)` yields n²
/// little-endian u32 words, mapped into [0, 1) and row-normalized so each
/// row sums to 1.
pub fn stochastic_matrix(data: &[u8], suffix: &[u8], n: usize) -> DMatrix<f64> {
    let seed = domain_seed(data, suffix);
    let needed = n * n * 4;

    let mut raw = Vec::with_capacity(needed + 32);
    let mut counter = 0u32;
    while raw.len() < needed {
        let mut hasher = Sha256::new();
        hasher.update(seed);
        hasher.update(counter.to_le_bytes());
        raw.extend_from_slice(&hasher.finalize());
        counter += 1;
    }

    let vals: Vec<f64> = raw[..needed]
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f64 / 4_294_967_296.0)
        .collect();

    let mut mat = DMatrix::from_row_slice(n, n, &vals);
    for r in 0..n {
        let row_sum: f64 = mat.row(r).iter().sum::<f64>() + 1e-12;
        for v in mat.row_mut(r).iter_mut() {
            *v /= row_sum;
        }
    }
    mat
}

/// Matrix power by repeated multiplication (`exp` is small in practice).
pub fn matrix_power(mat: &DMatrix<f64>, exp: u32) -> DMatrix<f64> {
    let mut out = DMatrix::identity(mat.nrows(), mat.ncols());
    for _ in 0..exp {
        out = &out * mat;
    }
    out
}

/// Shannon entropy in bits of `values` treated as unnormalized probability
/// mass. Negative mass never occurs here; inputs are magnitudes.
pub fn shannon_entropy_bits(values: &[f64]) -> f64 {
    let total: f64 = values.iter().sum::<f64>() + 1e-12;
    -values
        .iter()
        .map(|v| {
            let p = v / total;
            p * (p + 1e-12).log2()
        })
        .sum::<f64>()
}

/// Clip to [0, 1]; NaN from a degenerate decomposition maps to 0.0 so no
/// NaN ever escapes a component score.
pub fn clip01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}
