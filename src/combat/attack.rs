//! Attack inputs and the outcome accumulated while resolving them
//!
//! The input is never mutated. Everything the pipeline learns goes into
//! [`AttackOutcome`].

use serde::{Deserialize, Serialize};

use crate::combat::body_zone::HitLocation;
use crate::combat::outcome::{PsyOutcome, TestOutcome};
use crate::combat::rate_of_fire::AttackType;
use crate::combat::weapons::{Aim, AttributeBonus, PsyState, RateOfFire, WeaponTraits};

/// Everything known about a personal attack before any die is rolled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackInput {
    /// Skill or characteristic value tested against
    pub base_target: i32,
    #[serde(default)]
    pub modifier: i32,
    #[serde(default)]
    pub aim: Aim,
    /// Signed integer as text ("+10", "-20"); absent reads as "0"
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub attack_type: Option<AttackType>,
    #[serde(default)]
    pub traits: WeaponTraits,
    #[serde(default)]
    pub psy: Option<PsyState>,
    #[serde(default)]
    pub rate_of_fire: RateOfFire,
    /// Results at or above this jam the weapon
    #[serde(default)]
    pub jam_target: Option<u32>,
    #[serde(default)]
    pub overheats: bool,
    #[serde(default)]
    pub damage_formula: Option<String>,
    #[serde(default)]
    pub damage_bonus: i32,
    #[serde(default)]
    pub penetration_formula: Option<String>,
    #[serde(default)]
    pub attribute_bonuses: Vec<AttributeBonus>,
}

impl AttackInput {
    pub fn new(base_target: i32) -> Self {
        Self {
            base_target,
            modifier: 0,
            aim: Aim::None,
            range: None,
            attack_type: None,
            traits: WeaponTraits::default(),
            psy: None,
            rate_of_fire: RateOfFire::default(),
            jam_target: None,
            overheats: false,
            damage_formula: None,
            damage_bonus: 0,
            penetration_formula: None,
            attribute_bonuses: Vec::new(),
        }
    }

    /// Test input: a basic las weapon, standard attack
    pub fn test_lasgun(base_target: i32) -> Self {
        Self {
            attack_type: Some(AttackType::Standard),
            rate_of_fire: RateOfFire::new(3, 0),
            jam_target: Some(96),
            damage_formula: Some("1d10+3".into()),
            penetration_formula: Some("0".into()),
            ..Self::new(base_target)
        }
    }

    /// Test input: a chain weapon in melee
    pub fn test_chainsword(base_target: i32) -> Self {
        Self {
            attack_type: Some(AttackType::Standard),
            traits: WeaponTraits {
                tearing: true,
                ..WeaponTraits::default()
            },
            damage_formula: Some("1d10+2+SB".into()),
            penetration_formula: Some("2".into()),
            attribute_bonuses: vec![AttributeBonus::new("S", 4)],
            ..Self::new(base_target)
        }
    }
}

/// One inflicted hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageInstance {
    /// Damage before armour and toughness, accurate bonus included
    pub total: i32,
    pub location: HitLocation,
    pub penetration: i32,
    pub dos: u32,
    /// Rolled righteous fury die, 0 when none triggered
    pub righteous_fury: u32,
    /// Active die faces below the DoS, in roll order
    pub dices: Vec<u32>,
    pub min_die: Option<u32>,
    pub accurate_bonus: i32,
    /// Expression as evaluated
    pub formula: String,
}

impl DamageInstance {
    /// The formula's own total, without the accurate bonus
    pub fn rolled_total(&self) -> i32 {
        self.total - self.accurate_bonus
    }
}

/// Accumulated result of one personal attack
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub target: i32,
    pub result: u32,
    pub is_success: bool,
    pub is_jammed: bool,
    pub is_overheated: bool,
    pub dos: u32,
    pub dof: u32,
    /// Attack-type modifier folded into the target
    pub attack_modifier: i32,
    pub hit_margin: u32,
    pub psy: Option<PsyOutcome>,
    pub damages: Vec<DamageInstance>,
    pub number_of_hits: u32,
}

impl AttackOutcome {
    pub(crate) fn record_test(&mut self, test: &TestOutcome) {
        self.target = test.target;
        self.result = test.result;
        self.is_success = test.is_success;
        self.is_jammed = test.is_jammed;
        self.is_overheated = test.is_overheated;
        self.dos = test.dos;
        self.dof = test.dof;
    }

    /// Sum of every hit's total
    pub fn total_damage(&self) -> i32 {
        self.damages.iter().map(|d| d.total).sum()
    }
}
