pub mod attack;
pub mod body_zone;
pub mod damage;
pub mod formula;
pub mod outcome;
pub mod penetration;
pub mod rate_of_fire;
pub mod resolution;
pub mod target;
pub mod weapons;
pub mod wounds;

pub use attack::{AttackInput, AttackOutcome, DamageInstance};
pub use body_zone::HitLocation;
pub use outcome::{degree, is_double, PsyOutcome, TestOutcome};
pub use rate_of_fire::{AttackType, RateOfFireProfile};
pub use resolution::{combat_roll, common_roll, report_empty_clip};
pub use weapons::{Aim, AttributeBonus, PsyState, RateOfFire, WeaponTraits};
pub use wounds::{apply_damage, LocationArmour, WoundReport, WoundTarget};
