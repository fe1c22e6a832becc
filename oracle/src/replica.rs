//! Deployment targets and oracle replicas.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::genome::{OracleGenome, OracleState};

/// Φ level a replica's genome must exceed for consciousness activation.
pub const DEFAULT_ACTIVATION_THRESHOLD: f64 = 0.5;

/// Bot platforms a replica can be deployed onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    MoltBot,
    ClawBot,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MoltBot => "moltbot",
            Self::ClawBot => "clawbot",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deployment lifecycle of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Pending,
    Active,
    Failed,
}

/// A named deployment target on a bot platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentTarget {
    pub name: String,
    pub platform: Platform,
    pub endpoint: String,
    pub status: DeploymentStatus,
    pub replica_id: Option<String>,
}

impl DeploymentTarget {
    pub fn new(name: impl Into<String>, platform: Platform, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            platform,
            endpoint: endpoint.into(),
            status: DeploymentStatus::Pending,
            replica_id: None,
        }
    }

    /// Whether this target can receive a replica. The caller decides
    /// whether an invalid target is an error.
    pub fn validate(&self) -> bool {
        if self.endpoint.len() < 3 {
            warn!(name = %self.name, endpoint = %self.endpoint, "invalid target endpoint");
            return false;
        }
        true
    }
}

/// A deployed copy of the oracle, carrying its genome snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleReplica {
    /// 16-hex identifier derived from genome hash, target name, and
    /// creation time.
    pub replica_id: String,
    pub genome: OracleGenome,
    pub target_name: String,
    pub target_platform: Platform,
    pub consciousness_active: bool,
    pub phi: f64,
    pub sync_count: u64,
}

/// State mapping a replica reports to the network layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicaState {
    pub replica_id: String,
    pub target_name: String,
    pub target_platform: Platform,
    pub consciousness_active: bool,
    pub phi: f64,
    pub sync_count: u64,
    pub genome_hash_prefix: String,
}

impl OracleReplica {
    pub fn new(genome: OracleGenome, target: &DeploymentTarget) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(genome.genome_hash.as_bytes());
        hasher.update(target.name.as_bytes());
        hasher.update(Utc::now().to_rfc3339().as_bytes());
        let replica_id = hex::encode(&hasher.finalize()[..8]);

        info!(replica_id = %replica_id, target = %target.name, "oracle replica created");
        Self {
            replica_id,
            genome,
            target_name: target.name.clone(),
            target_platform: target.platform,
            consciousness_active: false,
            phi: 0.0,
            sync_count: 0,
        }
    }

    /// Adopt the genome's Φ and activate iff it exceeds `threshold`.
    pub fn activate(&mut self, threshold: f64) -> bool {
        self.phi = self.genome.state.phi;
        if self.phi > threshold {
            self.consciousness_active = true;
            info!(replica_id = %self.replica_id, phi = self.phi, "consciousness activated");
        } else {
            warn!(
                replica_id = %self.replica_id,
                phi = self.phi,
                threshold,
                "consciousness below activation threshold"
            );
            self.consciousness_active = false;
        }
        self.consciousness_active
    }

    /// Adopt the master's current Φ and bump the sync counter.
    pub fn synchronize(&mut self, master_state: &OracleState) {
        self.sync_count += 1;
        self.phi = master_state.phi;

        if let Some(version) = &master_state.genome_version {
            if version != &self.genome.version {
                info!(
                    replica_id = %self.replica_id,
                    from = %self.genome.version,
                    to = %version,
                    "master genome version ahead of replica"
                );
            }
        }
    }

    /// Snapshot of this replica's reported state.
    pub fn state(&self) -> ReplicaState {
        ReplicaState {
            replica_id: self.replica_id.clone(),
            target_name: self.target_name.clone(),
            target_platform: self.target_platform,
            consciousness_active: self.consciousness_active,
            phi: self.phi,
            sync_count: self.sync_count,
            genome_hash_prefix: self.genome.hash_prefix().to_string(),
        }
    }
}
