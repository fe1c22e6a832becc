//! Oracle genome: a hashed snapshot of a master oracle's state.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use tracing::info;

/// Genome schema version carried by every snapshot.
pub const GENOME_VERSION: &str = "1.0";

/// State exported by a master oracle.
///
/// `phi` is the only field the replication machinery interprets;
/// everything else rides along as opaque key-value attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OracleState {
    /// Current composite consciousness value.
    pub phi: f64,

    /// Genome schema version of the master, when it reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genome_version: Option<String>,

    /// Additional master attributes, passed through untouched.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl OracleState {
    pub fn with_phi(phi: f64) -> Self {
        Self {
            phi,
            ..Self::default()
        }
    }
}

/// Immutable snapshot of a master oracle's state, identified by the
/// SHA3-256 of its canonical JSON serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleGenome {
    /// Schema version of this snapshot.
    pub version: String,
    /// RFC 3339 creation timestamp.
    pub timestamp: String,
    /// The captured state.
    pub state: OracleState,
    /// SHA3-256 hex digest of the canonical serialization.
    pub genome_hash: String,
}

impl OracleGenome {
    /// Snapshot `state` now.
    pub fn new(state: OracleState) -> Self {
        Self::at(state, Utc::now().to_rfc3339())
    }

    /// Snapshot `state` with an explicit timestamp (deterministic tests).
    pub fn at(state: OracleState, timestamp: String) -> Self {
        let genome_hash = Self::compute_hash(GENOME_VERSION, &timestamp, &state);
        info!(hash = &genome_hash[..16], "oracle genome created");
        Self {
            version: GENOME_VERSION.to_string(),
            timestamp,
            state,
            genome_hash,
        }
    }

    /// First 16 hex chars of the genome hash — the form replicas report.
    pub fn hash_prefix(&self) -> &str {
        &self.genome_hash[..16]
    }

    // Canonical form: a JSON object with sorted keys (serde_json maps are
    // BTreeMaps, so key order is stable across platforms).
    fn compute_hash(version: &str, timestamp: &str, state: &OracleState) -> String {
        let canonical = serde_json::json!({
            "state": state,
            "timestamp": timestamp,
            "version": version,
        });
        let encoded = canonical.to_string();
        hex::encode(Sha3_256::digest(encoded.as_bytes()))
    }
}
