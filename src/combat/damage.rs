//! Per-hit damage rolls: righteous fury, low dice and the accurate bonus

use serde::{Deserialize, Serialize};

use crate::combat::attack::DamageInstance;
use crate::combat::body_zone::HitLocation;
use crate::combat::weapons::{Aim, WeaponTraits};
use crate::core::config::config;
use crate::core::error::Result;
use crate::dice::{DiceSource, Expr, RollOutcome};

/// What the rolled dice of one damage expression show
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceInspection {
    /// Rolled fury die, 0 when no die reached the fury face
    pub righteous_fury: u32,
    /// Active faces below the DoS, in roll order
    pub dices: Vec<u32>,
    pub min_die: Option<u32>,
}

/// Scan the active dice of a damage roll
///
/// Every active die at or above its fury face (the `rf_face` trait, or the
/// die's own maximum) draws a fury roll. The last one is kept.
pub fn inspect_dice<D: DiceSource + ?Sized>(
    roll: &RollOutcome,
    dos: u32,
    traits: &WeaponTraits,
    dice: &mut D,
) -> DiceInspection {
    let mut inspection = DiceInspection::default();

    for die in roll.active_dice() {
        let fury_face = traits.rf_face.unwrap_or(die.faces);
        if die.value >= fury_face {
            inspection.righteous_fury = dice.roll_die(config().righteous_fury_faces);
            tracing::debug!(fury = inspection.righteous_fury, "righteous fury");
        }
        if die.value < dos {
            inspection.dices.push(die.value);
        }
        inspection.min_die = Some(inspection.min_die.map_or(die.value, |m| m.min(die.value)));
    }
    inspection
}

/// Roll one personal hit
pub fn compute_damage<D: DiceSource + ?Sized>(
    expr: &Expr,
    penetration: i32,
    dos: u32,
    aim: Aim,
    traits: &WeaponTraits,
    location: HitLocation,
    dice: &mut D,
) -> Result<DamageInstance> {
    let roll = dice.roll(expr)?;
    let inspection = inspect_dice(&roll, dos, traits, dice);

    let accurate_bonus = if traits.accurate && aim != Aim::None {
        (dos.saturating_sub(1) * aim.accurate_multiplier()) as i32
    } else {
        0
    };

    Ok(DamageInstance {
        total: roll.total + accurate_bonus,
        location,
        penetration,
        dos,
        righteous_fury: inspection.righteous_fury,
        dices: inspection.dices,
        min_die: inspection.min_die,
        accurate_bonus,
        formula: expr.to_string(),
    })
}
