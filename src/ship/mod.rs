pub mod allocation;
pub mod critical;
pub mod location;
pub mod resolution;
pub mod state;

pub use allocation::{absorb_with_shields, apply_to_facing, FacingHit, HullHit};
pub use critical::{roll_critical, CriticalSeverity};
pub use location::{ship_location, AttackSide, ShipClass, ShotLocation};
pub use resolution::{
    compute_ship_target, ship_combat_roll, ship_turret_roll, EnemyShip, ShipAttackInput,
    ShipOutcome, ShipWeaponClass, ShotResult, TurretInput, TurretOutcome,
};
pub use state::{FacingState, ShieldTier, ShipFacing, ShipState};
