//! Unit inputs and outcomes for mass combat

use serde::{Deserialize, Serialize};

use crate::combat::outcome::TestOutcome;
use crate::combat::rate_of_fire::AttackType;
use crate::combat::weapons::{RateOfFire, WeaponTraits};

/// Attacking unit and its weapon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitAttackInput {
    pub base_target: i32,
    #[serde(default)]
    pub modifier: i32,
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub attack_type: Option<AttackType>,
    /// Melee attacks are opposed by melee defence
    #[serde(default)]
    pub is_melee: bool,
    /// Models firing; each rolls separately
    pub quantity: u32,
    #[serde(default)]
    pub traits: WeaponTraits,
    #[serde(default)]
    pub rate_of_fire: RateOfFire,
    #[serde(default)]
    pub damage_formula: Option<String>,
    #[serde(default)]
    pub damage_bonus: i32,
    #[serde(default)]
    pub penetration_formula: Option<String>,
}

impl UnitAttackInput {
    /// Test input: a las-armed infantry squad
    pub fn test_squad(base_target: i32, quantity: u32) -> Self {
        Self {
            base_target,
            modifier: 0,
            range: None,
            attack_type: Some(AttackType::Standard),
            is_melee: false,
            quantity,
            traits: WeaponTraits::default(),
            rate_of_fire: RateOfFire::new(3, 0),
            damage_formula: Some("1d10+3".into()),
            damage_bonus: 0,
            penetration_formula: Some("0".into()),
        }
    }
}

/// Stats of a unit's secondary model type (sergeants, heavy weapons)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxiliaryStats {
    /// A d100 below this swaps the auxiliary stats in
    pub chance: u32,
    pub armour: i32,
    pub toughness: i32,
    pub wounds: i32,
}

/// Defending unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyUnitStats {
    pub melee_defence: i32,
    pub ranged_defence: i32,
    pub armour: i32,
    pub toughness: i32,
    pub wounds: i32,
    pub auxiliary: Option<AuxiliaryStats>,
}

impl EnemyUnitStats {
    pub fn defence(&self, is_melee: bool) -> i32 {
        if is_melee {
            self.melee_defence
        } else {
            self.ranged_defence
        }
    }

    pub(crate) fn soak(&self) -> SoakStats {
        SoakStats {
            armour: self.armour,
            toughness: self.toughness,
            wounds: self.wounds,
            auxiliary: false,
        }
    }
}

/// Armour, toughness and wounds a volley is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoakStats {
    pub armour: i32,
    pub toughness: i32,
    pub wounds: i32,
    pub auxiliary: bool,
}

impl From<AuxiliaryStats> for SoakStats {
    fn from(aux: AuxiliaryStats) -> Self {
        Self {
            armour: aux.armour,
            toughness: aux.toughness,
            wounds: aux.wounds,
            auxiliary: true,
        }
    }
}

/// One damage roll against the enemy unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitHit {
    /// Damage roll before soak
    pub rolled: i32,
    /// After armour, toughness and accuracy
    pub net: i32,
    pub brutal: bool,
    pub righteous_fury: bool,
    pub auxiliary: bool,
}

/// One model's test and what came of it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelResult {
    pub test: TestOutcome,
    /// Volleys resolved, 0 when the model missed
    pub volleys: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOutcome {
    pub target: i32,
    pub attack_modifier: i32,
    pub models: Vec<ModelResult>,
    pub hits: Vec<UnitHit>,
    pub number_of_hits: u32,
    pub damage_dealt: i32,
    /// Models removed outright by a single hit
    pub brutals: u32,
    pub crits: u32,
}

impl UnitOutcome {
    /// Score a hit: brutal when it meets the wounds, otherwise plain damage
    pub(crate) fn record_hit(&mut self, rolled: i32, net: i32, fury: bool, soak: SoakStats) {
        let brutal = net > 0 && net >= soak.wounds;
        if brutal {
            self.brutals += 1;
            self.damage_dealt += soak.wounds;
        } else if net > 0 {
            self.damage_dealt += net;
        }
        if fury {
            self.crits += 1;
        }
        self.number_of_hits += 1;
        self.hits.push(UnitHit {
            rolled,
            net,
            brutal,
            righteous_fury: fury,
            auxiliary: soak.auxiliary,
        });
    }
}
