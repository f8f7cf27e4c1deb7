//! Core type definitions shared by every combat domain
//!
//! The engine never owns entity state. It reads pre-computed snapshots and
//! reports every change through an [`EntityUpdater`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ship::{ShieldTier, ShipFacing};

/// Opaque reference to an entity held by the host (actor, ship, unit)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef(pub String);

impl EntityRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A value on an entity that the engine may change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatPath {
    Shield(ShieldTier),
    Armour(ShipFacing),
    Structure(ShipFacing),
    Wounds,
    CriticalWounds,
}

impl fmt::Display for StatPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatPath::Shield(tier) => {
                write!(f, "system.shipShields.{}.value", tier.key())
            }
            StatPath::Armour(facing) => {
                write!(f, "system.shipArmor.{}.armor.value", facing.key())
            }
            StatPath::Structure(facing) => {
                write!(f, "system.shipArmor.{}.structure.value", facing.key())
            }
            StatPath::Wounds => write!(f, "system.wounds.value"),
            StatPath::CriticalWounds => write!(f, "system.wounds.critical"),
        }
    }
}

/// One path/value pair sent to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatUpdate {
    pub path: StatPath,
    pub value: i32,
}

impl StatUpdate {
    pub fn new(path: StatPath, value: i32) -> Self {
        Self { path, value }
    }
}

/// Rejection reported by the host update capability
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("update of {entity} rejected: {reason}")]
pub struct UpdateError {
    pub entity: EntityRef,
    pub reason: String,
}

/// Host capability used to persist shield, armour, structure and wound changes
///
/// Each call is independent. The engine never rolls back a call that
/// succeeded before a later one failed.
pub trait EntityUpdater {
    fn apply_update(
        &mut self,
        entity: &EntityRef,
        updates: &[StatUpdate],
    ) -> Result<(), UpdateError>;
}

/// In-memory updater that records every accepted call in order
#[derive(Debug, Default, Clone)]
pub struct RecordingUpdater {
    pub calls: Vec<(EntityRef, Vec<StatUpdate>)>,
    /// Reject the call with this index (0-based), if set
    pub fail_on_call: Option<usize>,
    attempts: usize,
}

impl RecordingUpdater {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updater that rejects its `n`th call
    pub fn failing_at(n: usize) -> Self {
        Self {
            fail_on_call: Some(n),
            ..Self::default()
        }
    }

    /// Flattened list of every accepted update
    pub fn updates(&self) -> Vec<StatUpdate> {
        self.calls
            .iter()
            .flat_map(|(_, updates)| updates.iter().copied())
            .collect()
    }
}

impl EntityUpdater for RecordingUpdater {
    fn apply_update(
        &mut self,
        entity: &EntityRef,
        updates: &[StatUpdate],
    ) -> Result<(), UpdateError> {
        let attempt = self.attempts;
        self.attempts += 1;
        if self.fail_on_call == Some(attempt) {
            return Err(UpdateError {
                entity: entity.clone(),
                reason: format!("call {} rejected", attempt),
            });
        }
        self.calls.push((entity.clone(), updates.to_vec()));
        Ok(())
    }
}
