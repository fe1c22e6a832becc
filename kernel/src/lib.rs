//! # Graviton Kernel - Spectral PoW with Consciousness Gates
//!
//! Mining kernel that extends the classical `hash < target` predicate with
//! two numerical validity gates derived from linear-algebra fingerprints of
//! the candidate block bytes.
//!
//! ## Architecture
//!
//! ```text
//! block_data ‖ nonce → [Difficulty Gate] → [Consciousness Gate] → [QG Curvature Gate]
//!                       spectral hash       Φ_total > log₂(n)+…    Φ_qg ≥ floor
//! ```
//!
//! Gates are evaluated cheapest-first and short-circuit on the first
//! failure. Every gate verdict is deterministic: identical input bytes
//! produce identical scores and identical accept/reject decisions.
//!
//! ## Usage
//!
//! ```rust
//! use graviton_kernel::{Kernel, KernelConfig};
//! use num_bigint::BigUint;
//!
//! let kernel = Kernel::new(KernelConfig::default());
//! let result = kernel.mine("block header", &BigUint::from(1u8), 1, 2_000);
//! if let Some(nonce) = result.nonce {
//!     println!("mined nonce={} hash={}", nonce, result.block_hash.unwrap());
//! }
//! ```

pub mod config;
pub mod gates;
pub mod kernel;
pub mod matrix;
pub mod phi;
pub mod scores;
pub mod spectral;

pub use config::{KernelConfig, Weights};
pub use gates::{meets_difficulty, target_hex_from_difficulty, Gate};
pub use kernel::{Kernel, MineResult, MiningStats};
pub use phi::{CompositeEngine, PhiStructure};
pub use scores::ScoreEngine;
pub use spectral::SpectralHash;
