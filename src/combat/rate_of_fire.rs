//! Rate-of-fire table and additional hit counts

use serde::{Deserialize, Serialize};

use crate::combat::weapons::{RateOfFire, WeaponTraits};

/// Declared attack action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackType {
    Standard,
    Bolt,
    Blast,
    Swift,
    SemiAuto,
    Barrage,
    Lightning,
    FullAuto,
    Storm,
    CalledShot,
    Charge,
    #[serde(rename = "allOut")]
    AllOut,
    /// Anything the table does not know
    #[serde(other)]
    Other,
}

/// Derived firing profile for one attack
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateOfFireProfile {
    pub modifier: i32,
    /// DoS needed per additional hit; 0 disables expansion
    pub hit_margin: u32,
    pub max_additional_hits: u32,
    /// DoS needed per twin-linked hit; 0 disables twin-linked hits
    pub twin_linked_margin: u32,
    pub max_twin_linked_hits: u32,
}

impl RateOfFireProfile {
    /// Look up the profile for an attack type
    pub fn for_attack(attack: AttackType, traits: &WeaponTraits, rof: RateOfFire) -> Self {
        let storm = traits.storm_multiplier();
        let twin = traits.twin_linked;

        match attack {
            AttackType::Standard => Self {
                modifier: 10,
                hit_margin: if traits.storm { 1 } else { 0 },
                max_additional_hits: if traits.storm { 1 } else { 0 },
                twin_linked_margin: if twin { 2 } else { 0 },
                max_twin_linked_hits: if twin { 1 } else { 0 },
            },
            AttackType::Bolt | AttackType::Blast => Self::default(),
            AttackType::Swift | AttackType::SemiAuto | AttackType::Barrage => Self {
                modifier: 0,
                hit_margin: 2,
                max_additional_hits: (rof.burst * storm).saturating_sub(1),
                twin_linked_margin: if twin { 3 } else { 0 },
                max_twin_linked_hits: rof.burst,
            },
            AttackType::Lightning | AttackType::FullAuto => Self {
                modifier: -10,
                hit_margin: 1,
                max_additional_hits: (rof.full * storm).saturating_sub(1),
                twin_linked_margin: if twin { 2 } else { 0 },
                max_twin_linked_hits: rof.full,
            },
            AttackType::Storm => Self {
                modifier: 0,
                hit_margin: 1,
                max_additional_hits: rof.full.saturating_sub(1),
                twin_linked_margin: 0,
                max_twin_linked_hits: 0,
            },
            AttackType::CalledShot => Self::flat(-20),
            AttackType::Charge => Self::flat(20),
            AttackType::AllOut => Self::flat(30),
            AttackType::Other => {
                tracing::warn!(?attack, "unknown attack type, no modifier applied");
                Self::default()
            }
        }
    }

    fn flat(modifier: i32) -> Self {
        Self {
            modifier,
            ..Self::default()
        }
    }

    /// Hits beyond the first for a roll with `dos` degrees of success
    pub fn additional_hits(&self, dos: u32, storm_multiplier: u32) -> u32 {
        let base = if self.hit_margin > 0 {
            ((dos * storm_multiplier).saturating_sub(1) / self.hit_margin)
                .min(self.max_additional_hits)
        } else {
            0
        };

        let twin = if self.twin_linked_margin > 0 {
            (dos / self.twin_linked_margin).min(self.max_twin_linked_hits)
        } else {
            0
        };

        base + twin
    }
}
