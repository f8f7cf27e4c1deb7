//! Ship hit locations by hull size and side of attack
//!
//! The tables are asymmetric; they are not rotations of one another.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::body_zone::reverse_digits;
use crate::ship::state::ShipFacing;

/// Hull size class of the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipClass {
    #[serde(rename = "bigShip")]
    BigShip,
    #[serde(rename = "smallShip")]
    SmallShip,
    /// Stations and oddities: every hit lands on the main hull
    #[serde(other)]
    Other,
}

/// Side of the target facing the attacker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackSide {
    Prow,
    Port,
    Starboard,
    Aft,
}

/// Where a ship shot landed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotLocation {
    Shields,
    Facing(ShipFacing),
}

impl fmt::Display for ShotLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShotLocation::Shields => write!(f, "Shields"),
            ShotLocation::Facing(facing) => write!(f, "{}", facing),
        }
    }
}

/// Facing hit by a d100 result
pub fn ship_location(result: u32, class: ShipClass, side: AttackSide) -> ShipFacing {
    use ShipFacing::*;

    let n = reverse_digits(result);
    if n <= 5 && class != ShipClass::Other {
        return Bridge;
    }

    match (class, side) {
        (ShipClass::BigShip, AttackSide::Prow) => match n {
            ..=45 => Prow,
            ..=60 => Port,
            ..=75 => Starboard,
            _ => Main,
        },
        (ShipClass::BigShip, AttackSide::Port) => match n {
            ..=15 => Prow,
            ..=30 => Aft,
            ..=60 => Port,
            _ => Main,
        },
        (ShipClass::BigShip, AttackSide::Starboard) => match n {
            ..=15 => Prow,
            ..=30 => Aft,
            ..=60 => Starboard,
            _ => Main,
        },
        (ShipClass::BigShip, AttackSide::Aft) => match n {
            ..=45 => Aft,
            ..=60 => Port,
            ..=75 => Starboard,
            _ => Main,
        },
        (ShipClass::SmallShip, AttackSide::Prow) => match n {
            ..=60 => Prow,
            _ => Main,
        },
        (ShipClass::SmallShip, AttackSide::Port) => match n {
            ..=30 => Port,
            ..=50 => Aft,
            _ => Main,
        },
        (ShipClass::SmallShip, AttackSide::Starboard) => match n {
            ..=30 => Starboard,
            ..=50 => Aft,
            _ => Main,
        },
        (ShipClass::SmallShip, AttackSide::Aft) => match n {
            ..=60 => Aft,
            _ => Main,
        },
        (ShipClass::Other, _) => Main,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_on_low_reversed_roll() {
        // 30 reverses to 03
        assert_eq!(
            ship_location(30, ShipClass::BigShip, AttackSide::Port),
            ShipFacing::Bridge
        );
        assert_eq!(
            ship_location(50, ShipClass::SmallShip, AttackSide::Aft),
            ShipFacing::Bridge
        );
    }

    #[test]
    fn test_big_ship_prow_bands() {
        let at = |r| ship_location(r, ShipClass::BigShip, AttackSide::Prow);
        assert_eq!(at(54), ShipFacing::Prow); // 45
        assert_eq!(at(55), ShipFacing::Port); // 55
        assert_eq!(at(57), ShipFacing::Starboard); // 75
        assert_eq!(at(68), ShipFacing::Main); // 86
    }

    #[test]
    fn test_big_ship_broadside() {
        let port = |r| ship_location(r, ShipClass::BigShip, AttackSide::Port);
        assert_eq!(port(51), ShipFacing::Prow); // 15
        assert_eq!(port(3), ShipFacing::Aft); // 30
        assert_eq!(port(4), ShipFacing::Port); // 40
        assert_eq!(port(100), ShipFacing::Bridge); // 1

        let starboard = |r| ship_location(r, ShipClass::BigShip, AttackSide::Starboard);
        assert_eq!(starboard(6), ShipFacing::Starboard); // 60
        assert_eq!(starboard(16), ShipFacing::Main); // 61
    }

    #[test]
    fn test_small_ship_bands() {
        let port = |r| ship_location(r, ShipClass::SmallShip, AttackSide::Port);
        assert_eq!(port(3), ShipFacing::Port); // 30
        assert_eq!(port(5), ShipFacing::Aft); // 50
        assert_eq!(port(15), ShipFacing::Main); // 51

        let prow = |r| ship_location(r, ShipClass::SmallShip, AttackSide::Prow);
        assert_eq!(prow(6), ShipFacing::Prow); // 60
        assert_eq!(prow(7), ShipFacing::Main); // 70
    }

    #[test]
    fn test_other_class_always_main() {
        assert_eq!(
            ship_location(10, ShipClass::Other, AttackSide::Prow),
            ShipFacing::Main
        );
    }

    #[test]
    fn test_class_names_deserialize() {
        let class: ShipClass = serde_json::from_str("\"bigShip\"").unwrap();
        assert_eq!(class, ShipClass::BigShip);
        let class: ShipClass = serde_json::from_str("\"station\"").unwrap();
        assert_eq!(class, ShipClass::Other);
    }
}
