//! Personal hit locations (6 zones)
//!
//! The attack roll's digits are reversed to find where the first hit lands.
//! Further hits walk a fixed adjacency list from the first location.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Body zones for hit location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HitLocation {
    Head,
    RightArm,
    LeftArm,
    /// Center mass, most hits land here
    Body,
    RightLeg,
    LeftLeg,
}

/// Reverse the two digits of a d100 result (`05` reads as 50, 100 as 1)
pub fn reverse_digits(result: u32) -> u32 {
    if result >= 100 {
        return 1;
    }
    (result % 10) * 10 + result / 10
}

impl HitLocation {
    /// Returns all hit locations
    pub fn all() -> [HitLocation; 6] {
        [
            HitLocation::Head,
            HitLocation::RightArm,
            HitLocation::LeftArm,
            HitLocation::Body,
            HitLocation::RightLeg,
            HitLocation::LeftLeg,
        ]
    }

    /// Location of the first hit from the attack roll
    pub fn from_roll(result: u32) -> HitLocation {
        match reverse_digits(result) {
            0..=10 => HitLocation::Head,
            11..=20 => HitLocation::RightArm,
            21..=30 => HitLocation::LeftArm,
            31..=70 => HitLocation::Body,
            71..=85 => HitLocation::RightLeg,
            86..=100 => HitLocation::LeftLeg,
            _ => HitLocation::Body,
        }
    }

    /// Where later hits land, in order
    fn adjacency(self) -> [HitLocation; 5] {
        use HitLocation::*;

        match self {
            Head => [Head, RightArm, Body, LeftArm, Body],
            RightArm => [RightArm, RightArm, Head, Body, RightArm],
            LeftArm => [LeftArm, LeftArm, Head, Body, LeftArm],
            Body => [Body, RightArm, Head, LeftArm, Body],
            RightLeg => [RightLeg, Body, RightArm, Head, Body],
            LeftLeg => [LeftLeg, Body, LeftArm, Head, Body],
        }
    }

    /// Location of additional hit `index` (0-based); the last entry repeats
    pub fn additional(self, index: usize) -> HitLocation {
        let table = self.adjacency();
        table[index.min(table.len() - 1)]
    }
}

impl fmt::Display for HitLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HitLocation::Head => "Head",
            HitLocation::RightArm => "Right Arm",
            HitLocation::LeftArm => "Left Arm",
            HitLocation::Body => "Body",
            HitLocation::RightLeg => "Right Leg",
            HitLocation::LeftLeg => "Left Leg",
        };
        write!(f, "{}", name)
    }
}
