//! Mass combat: whole units firing on whole units
//!
//! A unit attack rolls once per model. Damage is tallied against the enemy
//! unit's shared stats rather than individual wound tracks.

pub mod resolution;
pub mod units;

pub use resolution::{compute_unit_target, unit_combat_roll};
pub use units::{
    AuxiliaryStats, EnemyUnitStats, ModelResult, SoakStats, UnitAttackInput, UnitHit, UnitOutcome,
};
