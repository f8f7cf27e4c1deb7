//! Starship damage state: five shield tiers and six armoured facings
//!
//! Structure has no floor and may go negative. Shield tiers are not floored
//! either; an overloaded tier simply reads below zero.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Shield tiers, checked from five down to one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShieldTier {
    One,
    Two,
    Three,
    Four,
    Five,
}

impl ShieldTier {
    /// Order in which tiers absorb a hit
    pub const ABSORB_ORDER: [ShieldTier; 5] = [
        ShieldTier::Five,
        ShieldTier::Four,
        ShieldTier::Three,
        ShieldTier::Two,
        ShieldTier::One,
    ];

    pub fn index(self) -> usize {
        match self {
            ShieldTier::One => 0,
            ShieldTier::Two => 1,
            ShieldTier::Three => 2,
            ShieldTier::Four => 3,
            ShieldTier::Five => 4,
        }
    }

    /// Host-side key of this tier
    pub fn key(self) -> &'static str {
        match self {
            ShieldTier::One => "shieldOne",
            ShieldTier::Two => "shieldTwo",
            ShieldTier::Three => "shieldThree",
            ShieldTier::Four => "shieldFour",
            ShieldTier::Five => "shieldFive",
        }
    }
}

/// Armoured sections of a hull
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipFacing {
    Prow,
    Port,
    Starboard,
    Main,
    /// Structure hits here add to the critical roll
    Bridge,
    Aft,
}

impl ShipFacing {
    pub fn all() -> [ShipFacing; 6] {
        [
            ShipFacing::Prow,
            ShipFacing::Port,
            ShipFacing::Starboard,
            ShipFacing::Main,
            ShipFacing::Bridge,
            ShipFacing::Aft,
        ]
    }

    /// Host-side key of this facing
    pub fn key(self) -> &'static str {
        match self {
            ShipFacing::Prow => "prow",
            ShipFacing::Port => "port",
            ShipFacing::Starboard => "starboard",
            ShipFacing::Main => "main",
            ShipFacing::Bridge => "bridge",
            ShipFacing::Aft => "aft",
        }
    }
}

impl fmt::Display for ShipFacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShipFacing::Prow => "Prow",
            ShipFacing::Port => "Port",
            ShipFacing::Starboard => "Starboard",
            ShipFacing::Main => "Main",
            ShipFacing::Bridge => "Bridge",
            ShipFacing::Aft => "Aft",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacingState {
    pub armour: i32,
    pub structure: i32,
}

impl FacingState {
    pub fn new(armour: i32, structure: i32) -> Self {
        Self { armour, structure }
    }
}

/// Snapshot of a ship's defences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipState {
    /// Tier one first
    pub shields: [i32; 5],
    pub prow: FacingState,
    pub port: FacingState,
    pub starboard: FacingState,
    pub main: FacingState,
    pub bridge: FacingState,
    pub aft: FacingState,
}

impl ShipState {
    /// Same armour and structure on every facing, shields down
    pub fn uniform(armour: i32, structure: i32) -> Self {
        let facing = FacingState::new(armour, structure);
        Self {
            shields: [0; 5],
            prow: facing,
            port: facing,
            starboard: facing,
            main: facing,
            bridge: facing,
            aft: facing,
        }
    }

    pub fn shield(&self, tier: ShieldTier) -> i32 {
        self.shields[tier.index()]
    }

    pub fn shield_mut(&mut self, tier: ShieldTier) -> &mut i32 {
        &mut self.shields[tier.index()]
    }

    /// Highest tier still holding
    pub fn active_shield(&self) -> Option<ShieldTier> {
        ShieldTier::ABSORB_ORDER
            .into_iter()
            .find(|&tier| self.shield(tier) > 0)
    }

    pub fn facing(&self, facing: ShipFacing) -> FacingState {
        match facing {
            ShipFacing::Prow => self.prow,
            ShipFacing::Port => self.port,
            ShipFacing::Starboard => self.starboard,
            ShipFacing::Main => self.main,
            ShipFacing::Bridge => self.bridge,
            ShipFacing::Aft => self.aft,
        }
    }

    pub fn facing_mut(&mut self, facing: ShipFacing) -> &mut FacingState {
        match facing {
            ShipFacing::Prow => &mut self.prow,
            ShipFacing::Port => &mut self.port,
            ShipFacing::Starboard => &mut self.starboard,
            ShipFacing::Main => &mut self.main,
            ShipFacing::Bridge => &mut self.bridge,
            ShipFacing::Aft => &mut self.aft,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_shield_highest_first() {
        let mut ship = ShipState::uniform(10, 20);
        assert_eq!(ship.active_shield(), None);

        ship.shields = [3, 0, 5, 0, 0];
        assert_eq!(ship.active_shield(), Some(ShieldTier::Three));

        ship.shields[4] = 1;
        assert_eq!(ship.active_shield(), Some(ShieldTier::Five));
    }

    #[test]
    fn test_facing_access() {
        let mut ship = ShipState::uniform(10, 20);
        ship.facing_mut(ShipFacing::Bridge).structure -= 25;
        assert_eq!(ship.facing(ShipFacing::Bridge).structure, -5);
        assert_eq!(ship.facing(ShipFacing::Prow).structure, 20);
    }

    #[test]
    fn test_keys() {
        assert_eq!(ShieldTier::Four.key(), "shieldFour");
        assert_eq!(ShipFacing::Starboard.key(), "starboard");
        assert_eq!(ShipFacing::all().len(), 6);
    }
}
