//! Serializable snapshots of a running state machine.
//!
//! Behaviors and routines are not serializable, so a snapshot records where
//! the machine is (the stack of state ids, whether the focused state is still
//! entering) and how it got there (the transition history). It is meant for
//! save games, debugging overlays and diagnostics, not for resuming
//! in-flight routines.

use crate::core::{State, StateHistory};
use crate::machine::StateMachine;
use crate::scheduler::Scheduler;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::SnapshotError;

/// Version identifier for snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Point-in-time view of a state machine.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct MachineSnapshot<S: State> {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: String,

    /// Machine the snapshot was taken from
    pub machine: Uuid,

    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Scheduler frame at capture time
    pub frame: u64,

    /// Active states, root first
    pub stack: Vec<S>,

    /// Whether the focused state's entry routine was still running
    pub entering: bool,

    /// Transition history
    pub history: StateHistory<S>,
}

impl<S: State> MachineSnapshot<S> {
    /// Capture the current stack and history of `machine`.
    pub fn capture<A: 'static>(machine: &StateMachine<S, A>, scheduler: &Scheduler) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            id: Uuid::new_v4().to_string(),
            machine: machine.id(),
            timestamp: Utc::now(),
            frame: scheduler.frame(),
            stack: machine.stack().cloned().collect(),
            entering: machine.is_entering(scheduler),
            history: machine.history().clone(),
        }
    }

    /// The focused state at capture time.
    pub fn current(&self) -> Option<&S> {
        self.stack.last()
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()
    }

    /// Encode in the compact binary format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self =
            bincode::deserialize(bytes).map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()
    }

    fn check_version(self) -> Result<Self, SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(self)
    }
}

impl<S: State, A: 'static> StateMachine<S, A> {
    /// Take a snapshot of this machine.
    pub fn snapshot(&self, scheduler: &Scheduler) -> MachineSnapshot<S> {
        MachineSnapshot::capture(self, scheduler)
    }
}
