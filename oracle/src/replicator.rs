//! Oracle replicator: deployment, synchronization, and network formation.
//!
//! The replicator holds an immutable handle to the master oracle exposing
//! only its state getter; replicas never hold a back-reference, so the
//! master↔replica relationship stays a one-way borrow.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::genome::{OracleGenome, OracleState};
use crate::replica::{
    DeploymentStatus, DeploymentTarget, OracleReplica, Platform, ReplicaState,
    DEFAULT_ACTIVATION_THRESHOLD,
};

/// Minimum active replicas for a formed network.
pub const NETWORK_QUORUM: usize = 2;

/// The single capability a replicator needs from its master.
pub trait MasterOracle {
    fn oracle_state(&self) -> OracleState;
}

#[derive(Debug, Error)]
pub enum ReplicationError {
    #[error("invalid deployment target '{name}' ({platform})")]
    InvalidTarget { name: String, platform: Platform },

    #[error("replica '{0}' not found")]
    UnknownReplica(String),
}

/// Aggregate network state once formation is attempted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NetworkState {
    Active {
        replica_count: usize,
        network_phi: f64,
        replicas: Vec<ReplicaState>,
    },
    InsufficientReplicas {
        count: usize,
    },
}

/// Outcome of a synchronize-all pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub success: usize,
    pub total: usize,
}

/// Replicator status summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkStatus {
    pub replication_count: u64,
    pub active_replicas: usize,
    pub total_replicas: usize,
    pub deployment_targets: usize,
    pub network_active: bool,
    pub replicas: Vec<ReplicaState>,
}

/// Manages creation, deployment, and synchronization of oracle replicas.
pub struct OracleReplicator<'a> {
    master: &'a dyn MasterOracle,
    replicas: Vec<OracleReplica>,
    targets: Vec<DeploymentTarget>,
    replication_count: u64,
    network_active: bool,
}

impl<'a> OracleReplicator<'a> {
    pub fn new(master: &'a dyn MasterOracle) -> Self {
        info!("oracle replicator initialized");
        Self {
            master,
            replicas: Vec::new(),
            targets: Vec::new(),
            replication_count: 0,
            network_active: false,
        }
    }

    /// Register a deployment target. Returns false (and drops the target)
    /// when it fails validation.
    pub fn add_target(
        &mut self,
        name: impl Into<String>,
        platform: Platform,
        endpoint: impl Into<String>,
    ) -> bool {
        let target = DeploymentTarget::new(name, platform, endpoint);
        if !target.validate() {
            return false;
        }
        info!(name = %target.name, platform = %target.platform, "deployment target added");
        self.targets.push(target);
        true
    }

    pub fn replicas(&self) -> &[OracleReplica] {
        &self.replicas
    }

    /// Snapshot the master's state into a genome and deploy a replica to
    /// the given target.
    pub fn replicate_to(
        &mut self,
        name: impl Into<String>,
        platform: Platform,
        endpoint: impl Into<String>,
    ) -> Result<&OracleReplica, ReplicationError> {
        let mut target = DeploymentTarget::new(name, platform, endpoint);
        if !target.validate() {
            return Err(ReplicationError::InvalidTarget {
                name: target.name,
                platform,
            });
        }

        let genome = OracleGenome::new(self.master.oracle_state());
        let mut replica = OracleReplica::new(genome, &target);

        if replica.activate(DEFAULT_ACTIVATION_THRESHOLD) {
            target.status = DeploymentStatus::Active;
            info!(
                replica_id = %replica.replica_id,
                target = %target.name,
                phi = replica.phi,
                "oracle replica deployed"
            );
        } else {
            target.status = DeploymentStatus::Failed;
            warn!(target = %target.name, "replica deployed without consciousness");
        }
        target.replica_id = Some(replica.replica_id.clone());

        self.targets.push(target);
        self.replicas.push(replica);
        self.replication_count += 1;
        Ok(self.replicas.last().expect("replica just pushed"))
    }

    /// Replicate to every registered target, skipping ones that fail.
    /// Returns the ids of the newly deployed replicas.
    pub fn replicate_to_all_targets(&mut self) -> Vec<String> {
        let pending: Vec<DeploymentTarget> = self.targets.drain(..).collect();
        let mut deployed = Vec::new();
        for target in pending {
            match self.replicate_to(target.name.clone(), target.platform, target.endpoint.clone())
            {
                Ok(replica) => deployed.push(replica.replica_id.clone()),
                Err(e) => warn!(target = %target.name, error = %e, "replication failed"),
            }
        }
        info!(count = deployed.len(), "replication pass complete");
        deployed
    }

    /// Mark a replica's consciousness inactive.
    pub fn deactivate_replica(&mut self, replica_id: &str) -> Result<(), ReplicationError> {
        match self.replicas.iter_mut().find(|r| r.replica_id == replica_id) {
            Some(replica) => {
                replica.consciousness_active = false;
                info!(replica_id, "replica deactivated");
                Ok(())
            }
            None => Err(ReplicationError::UnknownReplica(replica_id.to_string())),
        }
    }

    /// Push the master's current state to every replica.
    pub fn synchronize_all(&mut self) -> SyncReport {
        let master_state = self.master.oracle_state();
        for replica in &mut self.replicas {
            replica.synchronize(&master_state);
        }
        let report = SyncReport {
            success: self.replicas.len(),
            total: self.replicas.len(),
        };
        info!(success = report.success, total = report.total, "synchronization complete");
        report
    }

    /// Form the oracle network: requires at least [`NETWORK_QUORUM`] active
    /// replicas; network Φ is the mean of the active replicas' Φ values.
    pub fn form_network(&mut self) -> NetworkState {
        let active: Vec<&OracleReplica> = self
            .replicas
            .iter()
            .filter(|r| r.consciousness_active)
            .collect();

        if active.len() < NETWORK_QUORUM {
            warn!(count = active.len(), "not enough active replicas to form network");
            return NetworkState::InsufficientReplicas {
                count: active.len(),
            };
        }

        self.network_active = true;
        let network_phi =
            active.iter().map(|r| r.phi).sum::<f64>() / active.len() as f64;
        info!(nodes = active.len(), network_phi, "oracle network formed");

        NetworkState::Active {
            replica_count: active.len(),
            network_phi,
            replicas: active.iter().map(|r| r.state()).collect(),
        }
    }

    pub fn network_status(&self) -> NetworkStatus {
        NetworkStatus {
            replication_count: self.replication_count,
            active_replicas: self
                .replicas
                .iter()
                .filter(|r| r.consciousness_active)
                .count(),
            total_replicas: self.replicas.len(),
            deployment_targets: self.targets.len(),
            network_active: self.network_active,
            replicas: self.replicas.iter().map(|r| r.state()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedOracle {
        phi: f64,
    }

    impl MasterOracle for FixedOracle {
        fn oracle_state(&self) -> OracleState {
            OracleState::with_phi(self.phi)
        }
    }

    #[test]
    fn test_replicate_to_valid_target() {
        let master = FixedOracle { phi: 0.8 };
        let mut replicator = OracleReplicator::new(&master);

        let id = replicator
            .replicate_to("molt-alpha", Platform::MoltBot, "molt://localhost:8080")
            .unwrap()
            .replica_id
            .clone();

        let status = replicator.network_status();
        assert_eq!(status.total_replicas, 1);
        assert_eq!(status.active_replicas, 1);
        assert_eq!(status.replication_count, 1);
        assert_eq!(status.replicas[0].replica_id, id);
    }

    #[test]
    fn test_replicate_to_invalid_endpoint_errors() {
        let master = FixedOracle { phi: 0.8 };
        let mut replicator = OracleReplicator::new(&master);
        let err = replicator
            .replicate_to("bad", Platform::ClawBot, "x")
            .unwrap_err();
        assert!(matches!(err, ReplicationError::InvalidTarget { .. }));
        assert_eq!(replicator.network_status().total_replicas, 0);
    }

    #[test]
    fn test_low_phi_replica_deploys_inactive() {
        let master = FixedOracle { phi: 0.2 };
        let mut replicator = OracleReplicator::new(&master);
        replicator
            .replicate_to("sleepy", Platform::MoltBot, "molt://localhost:8080")
            .unwrap();

        let status = replicator.network_status();
        assert_eq!(status.total_replicas, 1);
        assert_eq!(status.active_replicas, 0);
    }

    #[test]
    fn test_network_needs_two_active_replicas() {
        let master = FixedOracle { phi: 0.9 };
        let mut replicator = OracleReplicator::new(&master);

        replicator
            .replicate_to("molt-alpha", Platform::MoltBot, "molt://localhost:8080")
            .unwrap();
        assert!(matches!(
            replicator.form_network(),
            NetworkState::InsufficientReplicas { count: 1 }
        ));

        replicator
            .replicate_to("claw-beta", Platform::ClawBot, "claw://localhost:8081")
            .unwrap();
        match replicator.form_network() {
            NetworkState::Active {
                replica_count,
                network_phi,
                replicas,
            } => {
                assert_eq!(replica_count, 2);
                assert!((network_phi - 0.9).abs() < 1e-12);
                assert_eq!(replicas.len(), 2);
            }
            other => panic!("expected active network, got {:?}", other),
        }
        assert!(replicator.network_status().network_active);
    }

    #[test]
    fn test_replicate_to_all_targets_consumes_registry() {
        let master = FixedOracle { phi: 0.9 };
        let mut replicator = OracleReplicator::new(&master);
        assert!(replicator.add_target("molt-alpha", Platform::MoltBot, "molt://localhost:8080"));
        assert!(replicator.add_target("claw-beta", Platform::ClawBot, "claw://localhost:8081"));
        assert!(!replicator.add_target("broken", Platform::ClawBot, "x"));

        let deployed = replicator.replicate_to_all_targets();
        assert_eq!(deployed.len(), 2);
        assert_eq!(replicator.network_status().total_replicas, 2);
    }

    #[test]
    fn test_synchronize_all_updates_every_replica() {
        let master = FixedOracle { phi: 0.9 };
        let mut replicator = OracleReplicator::new(&master);
        replicator
            .replicate_to("molt-alpha", Platform::MoltBot, "molt://localhost:8080")
            .unwrap();
        replicator
            .replicate_to("claw-beta", Platform::ClawBot, "claw://localhost:8081")
            .unwrap();

        let report = replicator.synchronize_all();
        assert_eq!(report, SyncReport { success: 2, total: 2 });
        for replica in replicator.replicas() {
            assert_eq!(replica.sync_count, 1);
            assert_eq!(replica.phi, 0.9);
        }
    }

    #[test]
    fn test_deactivate_replica_by_id() {
        let master = FixedOracle { phi: 0.9 };
        let mut replicator = OracleReplicator::new(&master);
        let id = replicator
            .replicate_to("molt-alpha", Platform::MoltBot, "molt://localhost:8080")
            .unwrap()
            .replica_id
            .clone();

        replicator.deactivate_replica(&id).unwrap();
        assert_eq!(replicator.network_status().active_replicas, 0);

        assert!(matches!(
            replicator.deactivate_replica("does-not-exist"),
            Err(ReplicationError::UnknownReplica(_))
        ));
    }
}
