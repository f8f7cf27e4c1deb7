//! Damage allocation: shields, then armour, then structure
//!
//! Every value change goes to the host as its own update call. The working
//! copy of the ship only changes after the host accepts a call, so a failed
//! update leaves the copy matching what the host holds.

use serde::{Deserialize, Serialize};

use crate::core::config::config;
use crate::core::error::Result;
use crate::core::types::{EntityRef, EntityUpdater, StatPath, StatUpdate};
use crate::dice::DiceSource;
use crate::ship::critical::{roll_critical, CriticalSeverity};
use crate::ship::state::{ShieldTier, ShipFacing, ShipState};

/// A hit headed for one facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HullHit {
    pub facing: ShipFacing,
    pub damage: i32,
    /// Lance damage, added past the armour
    pub lance: i32,
    pub torpedo: bool,
}

impl HullHit {
    pub fn new(facing: ShipFacing, damage: i32) -> Self {
        Self {
            facing,
            damage,
            lance: 0,
            torpedo: false,
        }
    }

    pub fn with_lance(mut self, lance: i32) -> Self {
        self.lance = lance;
        self
    }

    pub fn torpedo(mut self) -> Self {
        self.torpedo = true;
        self
    }
}

/// What one hit did to a facing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacingHit {
    /// Damage as reported to the players
    pub total: i32,
    /// Armour stripped by this hit
    pub armour_lost: i32,
    pub structure_lost: i32,
    /// Set only when the hit rolled on the critical table
    pub critical: Option<CriticalSeverity>,
}

/// Let the highest holding shield tier take the hit
///
/// The whole hit lands on that one tier, which may go below zero. Nothing
/// spills over. Returns `None` when every tier is down.
pub fn absorb_with_shields<U: EntityUpdater + ?Sized>(
    ship: &mut ShipState,
    entity: &EntityRef,
    damage: i32,
    updater: &mut U,
) -> Result<Option<ShieldTier>> {
    let Some(tier) = ship.active_shield() else {
        return Ok(None);
    };

    let remaining = ship.shield(tier) - damage;
    updater.apply_update(entity, &[StatUpdate::new(StatPath::Shield(tier), remaining)])?;
    *ship.shield_mut(tier) = remaining;

    tracing::debug!(tier = tier.key(), damage, remaining, "shield absorbed hit");
    Ok(Some(tier))
}

/// Apply a hit that got past the shields
///
/// Lance damage ignores armour. A hit that armour stops still strips armour,
/// and only torpedoes roll criticals off it. A hit that breaks through rolls
/// criticals off the structure damage, with a bonus on the bridge.
pub fn apply_to_facing<D, U>(
    ship: &mut ShipState,
    entity: &EntityRef,
    hit: HullHit,
    dice: &mut D,
    updater: &mut U,
) -> Result<FacingHit>
where
    D: DiceSource + ?Sized,
    U: EntityUpdater + ?Sized,
{
    let HullHit {
        facing,
        damage,
        lance,
        torpedo,
    } = hit;
    let current = ship.facing(facing);
    let armour = current.armour;

    if damage + lance < armour {
        let lost = damage + lance;
        let remaining = armour - lost;
        updater.apply_update(
            entity,
            &[StatUpdate::new(StatPath::Armour(facing), remaining)],
        )?;
        ship.facing_mut(facing).armour = remaining;
        let critical = torpedo.then(|| roll_critical(0, dice));

        tracing::debug!(facing = facing.key(), lost, "armour held");
        return Ok(FacingHit {
            total: lost,
            armour_lost: lost,
            structure_lost: 0,
            critical,
        });
    }

    let structure_damage = damage - armour;
    let mut critical_input = structure_damage;
    if facing == ShipFacing::Bridge {
        critical_input += config().bridge_critical_bonus;
    }
    let critical = Some(roll_critical(critical_input, dice));

    let hit = if armour > 0 {
        updater.apply_update(entity, &[StatUpdate::new(StatPath::Armour(facing), 0)])?;
        ship.facing_mut(facing).armour = 0;

        let lost = structure_damage + lance;
        let remaining = current.structure - lost;
        updater.apply_update(
            entity,
            &[StatUpdate::new(StatPath::Structure(facing), remaining)],
        )?;
        ship.facing_mut(facing).structure = remaining;

        FacingHit {
            total: lost + armour,
            armour_lost: armour,
            structure_lost: lost,
            critical,
        }
    } else {
        let remaining = current.structure - structure_damage;
        updater.apply_update(
            entity,
            &[StatUpdate::new(StatPath::Structure(facing), remaining)],
        )?;
        ship.facing_mut(facing).structure = remaining;

        FacingHit {
            total: structure_damage,
            armour_lost: 0,
            structure_lost: structure_damage,
            critical,
        }
    };

    tracing::debug!(
        facing = facing.key(),
        structure_lost = hit.structure_lost,
        "structure breached"
    );
    Ok(hit)
}
