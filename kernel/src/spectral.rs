//! Spectral hash: SVD-augmented SHA-256.
//!
//! An 8×8 matrix is built from the SHA-256 seed of the input, its
//! normalized singular values are quantized into an 8-byte spectral
//! fingerprint, and `SHA-256(seed ‖ fingerprint)` produces the final
//! 256-bit digest. The SVD step breaks linear structure in the nonce
//! space; the outer SHA-256 keeps the avalanche behavior PoW needs.

use nalgebra::DMatrix;
use sha2::{Digest, Sha256};

use crate::matrix::sha256;

/// Dimension of the spectral matrix (and of its fingerprint).
const SPECTRAL_DIM: usize = 8;

/// Spectral hasher. Stateless; exists as a type so callers can hold one
/// alongside the score engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpectralHash;

impl SpectralHash {
    pub fn new() -> Self {
        Self
    }

    /// Return the 64-char lowercase hex spectral signature of `data`.
    pub fn signature(&self, data: &[u8]) -> String {
        let seed = sha256(data);

        // Seed bytes as a 4×8 block mirrored into an 8×8 matrix, each byte
        // affine-mapped by b/127.5 − 1.
        let mut mat = DMatrix::<f64>::zeros(SPECTRAL_DIM, SPECTRAL_DIM);
        for r in 0..SPECTRAL_DIM / 2 {
            for c in 0..SPECTRAL_DIM {
                let v = seed[r * SPECTRAL_DIM + c] as f64 / 127.5 - 1.0;
                mat[(r, c)] = v;
                mat[(SPECTRAL_DIM - 1 - r, c)] = v;
            }
        }

        // Singular values, descending. The fingerprint quantizes each
        // normalized value to a byte; min() clamps floating-point noise
        // that could push a value a hair past 1.
        let sv = mat.svd(false, false).singular_values;
        let sum: f64 = sv.iter().sum();
        let denom = if sum > 0.0 { sum } else { 1.0 };

        let mut fingerprint = [0u8; SPECTRAL_DIM];
        for (i, v) in sv.iter().enumerate() {
            let q = (v / denom * 255.0 + 0.5).floor();
            fingerprint[i] = (q as u32).min(255) as u8;
        }

        let mut hasher = Sha256::new();
        hasher.update(seed);
        hasher.update(fingerprint);
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_is_64_hex_chars() {
        let h = SpectralHash::new().signature(b"spectral");
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(h, h.to_lowercase());
    }

    #[test]
    fn test_signature_deterministic() {
        let hasher = SpectralHash::new();
        assert_eq!(hasher.signature(b"same input"), hasher.signature(b"same input"));
    }

    #[test]
    fn test_signature_distinct_inputs() {
        let hasher = SpectralHash::new();
        assert_ne!(hasher.signature(b"block0"), hasher.signature(b"block1"));
    }

    #[test]
    fn test_signature_empty_and_large_inputs() {
        let hasher = SpectralHash::new();
        assert_eq!(hasher.signature(b"").len(), 64);
        assert_eq!(hasher.signature(&vec![0xABu8; 1 << 16]).len(), 64);
    }

    #[test]
    fn test_avalanche_on_single_byte_flip() {
        let hasher = SpectralHash::new();
        let a = hasher.signature(b"genesis0");
        let b = hasher.signature(b"genesis1");

        let bytes_a = hex::decode(&a).unwrap();
        let bytes_b = hex::decode(&b).unwrap();
        let differing: u32 = bytes_a
            .iter()
            .zip(bytes_b.iter())
            .map(|(x, y)| (x ^ y).count_ones())
            .sum();

        // Statistical expectation is ~128 of 256 bits; 50 is a loose floor.
        assert!(differing >= 50, "only {} of 256 bits differ", differing);
    }
}
