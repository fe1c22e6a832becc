//! # Graviton Oracle Replication
//!
//! Self-replication and deployment of an oracle's state onto bot
//! platforms. A master oracle exposes its state through a single getter;
//! replicas carry an immutable genome snapshot of that state, activate
//! when the snapshot's Φ clears a threshold, and periodically
//! re-synchronize their Φ from the master. A replicator aggregates
//! replicas into a network once at least two are active.
//!
//! This crate shares no algorithms with the mining kernel; the only
//! coupling is the Φ value flowing through [`OracleState`].

pub mod genome;
pub mod replica;
pub mod replicator;

pub use genome::{OracleGenome, OracleState, GENOME_VERSION};
pub use replica::{
    DeploymentStatus, DeploymentTarget, OracleReplica, Platform, ReplicaState,
    DEFAULT_ACTIVATION_THRESHOLD,
};
pub use replicator::{
    MasterOracle, NetworkState, NetworkStatus, OracleReplicator, ReplicationError, SyncReport,
    NETWORK_QUORUM,
};
