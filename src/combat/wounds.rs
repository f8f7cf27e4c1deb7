//! Wound application: armour, toughness, then wounds and critical damage
//!
//! Wounds fill up to the maximum. Anything past it is critical damage.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::attack::DamageInstance;
use crate::combat::body_zone::HitLocation;
use crate::core::error::Result;
use crate::core::types::{EntityRef, EntityUpdater, StatPath, StatUpdate};

/// Armour points per hit location
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationArmour {
    pub head: i32,
    pub right_arm: i32,
    pub left_arm: i32,
    pub body: i32,
    pub right_leg: i32,
    pub left_leg: i32,
}

impl LocationArmour {
    /// Same armour everywhere
    pub fn uniform(value: i32) -> Self {
        Self {
            head: value,
            right_arm: value,
            left_arm: value,
            body: value,
            right_leg: value,
            left_leg: value,
        }
    }

    pub fn at(&self, location: HitLocation) -> i32 {
        match location {
            HitLocation::Head => self.head,
            HitLocation::RightArm => self.right_arm,
            HitLocation::LeftArm => self.left_arm,
            HitLocation::Body => self.body,
            HitLocation::RightLeg => self.right_leg,
            HitLocation::LeftLeg => self.left_leg,
        }
    }
}

/// Defender snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WoundTarget {
    pub entity: EntityRef,
    pub toughness_bonus: i32,
    /// Wounds already taken
    pub wounds: i32,
    pub max_wounds: i32,
    pub critical_damage: i32,
    #[serde(default)]
    pub armour: LocationArmour,
}

/// Kind of a wound record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WoundSource {
    Wounds,
    Critical,
    /// Fury effect to roll on the critical table; adds no critical damage
    RighteousFury,
}

impl fmt::Display for WoundSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WoundSource::Wounds => write!(f, "Wounds"),
            WoundSource::Critical => write!(f, "Critical"),
            WoundSource::RighteousFury => write!(f, "Critical Effect (RF)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WoundRecord {
    pub amount: i32,
    pub source: WoundSource,
    pub location: HitLocation,
}

/// Totals after every hit has been applied
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WoundReport {
    pub records: Vec<WoundRecord>,
    pub wounds: i32,
    pub critical_damage: i32,
}

/// Work out wounds for a batch of hits without touching the host
pub fn compute_wounds(target: &WoundTarget, damages: &[DamageInstance]) -> WoundReport {
    let mut wounds = target.wounds;
    let mut critical = target.critical_damage;
    let max = target.max_wounds;
    let mut records = Vec::new();

    for damage in damages {
        let armour = (target.armour.at(damage.location) - damage.penetration).max(0);
        let after_toughness = (damage.total - target.toughness_bonus).max(0);
        let mut to_add = (after_toughness - armour).max(0);

        if damage.righteous_fury > 0 {
            if to_add == 0 {
                to_add = 1;
            } else {
                records.push(WoundRecord {
                    amount: damage.righteous_fury as i32,
                    source: WoundSource::RighteousFury,
                    location: damage.location,
                });
            }
        }

        let mut record = |amount: i32, source: WoundSource| {
            records.push(WoundRecord {
                amount,
                source,
                location: damage.location,
            })
        };

        if wounds == max {
            critical += to_add;
            record(to_add, WoundSource::Critical);
        } else if wounds + to_add > max {
            record(max - wounds, WoundSource::Wounds);
            let overflow = wounds + to_add - max;
            critical += overflow;
            wounds = max;
            record(overflow, WoundSource::Critical);
        } else {
            record(to_add, WoundSource::Wounds);
            wounds += to_add;
        }
    }

    WoundReport {
        records,
        wounds,
        critical_damage: critical,
    }
}

/// Apply hits to a defender and persist the new totals in one update
pub fn apply_damage<U: EntityUpdater + ?Sized>(
    target: &WoundTarget,
    damages: &[DamageInstance],
    updater: &mut U,
) -> Result<WoundReport> {
    let report = compute_wounds(target, damages);
    tracing::debug!(
        entity = %target.entity,
        wounds = report.wounds,
        critical = report.critical_damage,
        "wounds applied"
    );

    updater.apply_update(
        &target.entity,
        &[
            StatUpdate::new(StatPath::Wounds, report.wounds),
            StatUpdate::new(StatPath::CriticalWounds, report.critical_damage),
        ],
    )?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RecordingUpdater;

    fn hit(total: i32, penetration: i32, location: HitLocation) -> DamageInstance {
        DamageInstance {
            total,
            location,
            penetration,
            dos: 1,
            righteous_fury: 0,
            dices: Vec::new(),
            min_die: None,
            accurate_bonus: 0,
            formula: total.to_string(),
        }
    }

    fn guardsman() -> WoundTarget {
        WoundTarget {
            entity: EntityRef::new("guardsman"),
            toughness_bonus: 3,
            wounds: 0,
            max_wounds: 10,
            critical_damage: 0,
            armour: LocationArmour {
                body: 4,
                ..LocationArmour::uniform(2)
            },
        }
    }

    #[test]
    fn test_armour_and_toughness_reduce() {
        let report = compute_wounds(&guardsman(), &[hit(12, 1, HitLocation::Body)]);
        // 12 - 3 TB = 9, armour 4 - 1 pen = 3
        assert_eq!(report.wounds, 6);
        assert_eq!(report.records[0].source, WoundSource::Wounds);
    }

    #[test]
    fn test_penetration_never_negative_armour() {
        let report = compute_wounds(&guardsman(), &[hit(8, 10, HitLocation::Head)]);
        assert_eq!(report.wounds, 5);
    }

    #[test]
    fn test_overflow_becomes_critical() {
        let mut target = guardsman();
        target.wounds = 8;
        let report = compute_wounds(&target, &[hit(12, 4, HitLocation::Body)]);
        assert_eq!(report.wounds, 10);
        assert_eq!(report.critical_damage, 7);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].amount, 2);
        assert_eq!(report.records[1].source, WoundSource::Critical);
    }

    #[test]
    fn test_at_max_all_critical() {
        let mut target = guardsman();
        target.wounds = 10;
        target.critical_damage = 2;
        let report = compute_wounds(&target, &[hit(8, 0, HitLocation::LeftLeg)]);
        assert_eq!(report.critical_damage, 5);
        assert_eq!(report.wounds, 10);
    }

    #[test]
    fn test_fury_forces_one_wound() {
        let mut damage = hit(2, 0, HitLocation::Body);
        damage.righteous_fury = 3;
        let report = compute_wounds(&guardsman(), &[damage]);
        assert_eq!(report.wounds, 1);
        assert!(report
            .records
            .iter()
            .all(|r| r.source != WoundSource::RighteousFury));
    }

    #[test]
    fn test_fury_with_wounds_records_effect() {
        let mut damage = hit(15, 0, HitLocation::Body);
        damage.righteous_fury = 4;
        let report = compute_wounds(&guardsman(), &[damage]);
        assert_eq!(report.wounds, 8);
        assert_eq!(report.records[0].source, WoundSource::RighteousFury);
        assert_eq!(report.records[0].amount, 4);
        assert_eq!(report.records[0].source.to_string(), "Critical Effect (RF)");
    }

    #[test]
    fn test_apply_damage_sends_one_update() {
        let mut updater = RecordingUpdater::new();
        let report =
            apply_damage(&guardsman(), &[hit(10, 0, HitLocation::Body)], &mut updater).unwrap();
        assert_eq!(report.wounds, 3);
        assert_eq!(updater.calls.len(), 1);
        assert_eq!(
            updater.updates(),
            vec![
                StatUpdate::new(StatPath::Wounds, 3),
                StatUpdate::new(StatPath::CriticalWounds, 0),
            ]
        );
    }
}
