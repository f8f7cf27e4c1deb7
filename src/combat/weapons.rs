//! Weapon traits and the attacker-side inputs they travel with
//!
//! Traits are plain flags and numbers. The resolvers read them; nothing here
//! rolls dice.

use serde::{Deserialize, Serialize};

/// Aiming stance taken before the attack
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aim {
    #[default]
    None,
    /// +10
    Half,
    /// +20
    Full,
}

impl Aim {
    /// Target modifier granted by the stance
    pub fn modifier(self) -> i32 {
        match self {
            Aim::None => 0,
            Aim::Half => 10,
            Aim::Full => 20,
        }
    }

    /// Damage per extra degree of success for accurate weapons
    pub fn accurate_multiplier(self) -> u32 {
        match self {
            Aim::None => 0,
            Aim::Half => 1,
            Aim::Full => 2,
        }
    }
}

/// Maximum shots per firing mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateOfFire {
    pub burst: u32,
    pub full: u32,
}

impl RateOfFire {
    pub fn new(burst: u32, full: u32) -> Self {
        Self { burst, full }
    }
}

/// Weapon trait flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTraits {
    /// Auto-hits the body (flamers and the like)
    pub skip_attack_roll: bool,
    /// Roll one extra damage die, drop the lowest
    pub tearing: bool,
    /// Damage dice never roll below N
    pub proven: Option<u32>,
    /// Damage dice never roll above N
    pub primitive: Option<u32>,
    /// Damage halves on a 1 or doubles on a 10 (d10)
    pub unstable: bool,
    /// Penetration doubles at three or more DoS
    pub razor_sharp: bool,
    /// Extra damage per DoS when aiming
    pub accurate: bool,
    pub storm: bool,
    pub twin_linked: bool,
    pub scatter: bool,
    /// Unit combat: hits = Nd4 + N
    pub torrent: Option<u32>,
    /// Unit combat: hits = N, may hit on a failed roll
    pub ordnance: Option<u32>,
    /// Bonus damage against ship armour
    pub lance: i32,
    /// Righteous fury triggers at this face instead of the die maximum
    pub rf_face: Option<u32>,
    /// Pistols ignore the point blank range bonus in unit combat
    pub pistol: bool,
}

impl WeaponTraits {
    /// Storm doubles the shots of a burst or full auto
    pub fn storm_multiplier(&self) -> u32 {
        if self.storm {
            2
        } else {
            1
        }
    }
}

/// Attribute bonus available for formula symbols (`SB`, `WPB`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeBonus {
    /// Attribute short name without the trailing `B`
    pub short: String,
    pub value: i32,
}

impl AttributeBonus {
    pub fn new(short: impl Into<String>, value: i32) -> Self {
        Self {
            short: short.into(),
            value,
        }
    }

    /// The symbol is `<short>B`, matched case-insensitively
    pub fn matches(&self, symbol: &str) -> bool {
        let split = self.short.len();
        match (symbol.get(..split), symbol.get(split..)) {
            (Some(head), Some(tail)) => {
                head.eq_ignore_ascii_case(&self.short) && tail.eq_ignore_ascii_case("B")
            }
            _ => false,
        }
    }
}

/// Psychic state of a caster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsyState {
    /// Unfettered rating
    pub rating: i32,
    /// Rating the caster chooses to channel
    pub value: i32,
    /// Highest rating the caster may channel
    pub max: i32,
    /// Whether push modifiers apply to this test
    pub use_modifier: bool,
    pub warp_conduit: bool,
    /// Powers currently sustained
    pub sustained: u32,
}
