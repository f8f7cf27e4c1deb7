//! TOML combat scenarios
//!
//! A scenario names one resolution and carries its inputs:
//!
//! ```toml
//! kind = "personal"
//!
//! [attack]
//! base_target = 45
//! attack_type = "standard"
//! damage_formula = "1d10+3"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::battle::{unit_combat_roll, EnemyUnitStats, UnitAttackInput};
use crate::combat::{apply_damage, combat_roll, report_empty_clip, AttackInput, WoundTarget};
use crate::core::error::Result;
use crate::core::types::EntityUpdater;
use crate::dice::DiceSource;
use crate::report::{CombatReport, Presenter};
use crate::ship::{ship_combat_roll, ship_turret_roll, EnemyShip, ShipAttackInput, TurretInput};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scenario {
    Personal {
        attack: AttackInput,
        #[serde(default)]
        weapon: Option<String>,
        /// Rounds left; an empty clip fires nothing
        #[serde(default)]
        clip: Option<u32>,
        #[serde(default)]
        defender: Option<WoundTarget>,
    },
    Unit {
        attack: UnitAttackInput,
        enemy: EnemyUnitStats,
    },
    Ship {
        attack: ShipAttackInput,
        #[serde(default)]
        enemy: Option<EnemyShip>,
    },
    Turret {
        turret: TurretInput,
    },
}

impl Scenario {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Scenario::Personal { .. } => "personal",
            Scenario::Unit { .. } => "unit",
            Scenario::Ship { .. } => "ship",
            Scenario::Turret { .. } => "turret",
        }
    }

    /// Resolve the scenario and publish every report it produces
    pub fn run<D, U, P>(&self, dice: &mut D, updater: &mut U, presenter: &mut P) -> Result<()>
    where
        D: DiceSource + ?Sized,
        U: EntityUpdater + ?Sized,
        P: Presenter + ?Sized,
    {
        tracing::debug!(kind = self.kind(), "running scenario");
        match self {
            Scenario::Personal {
                attack,
                weapon,
                clip,
                defender,
            } => {
                if *clip == Some(0) {
                    let name = weapon.as_deref().unwrap_or("weapon");
                    return report_empty_clip(name, presenter);
                }
                let outcome = combat_roll(attack, dice)?;
                let damages = outcome.damages.clone();
                presenter.publish(&CombatReport::Attack(outcome))?;
                if let Some(defender) = defender {
                    let report = apply_damage(defender, &damages, updater)?;
                    presenter.publish(&CombatReport::Wounds(report))?;
                }
            }
            Scenario::Unit { attack, enemy } => {
                let outcome = unit_combat_roll(attack, enemy, dice)?;
                presenter.publish(&CombatReport::Unit(outcome))?;
            }
            Scenario::Ship { attack, enemy } => {
                let outcome = ship_combat_roll(attack, enemy.as_ref(), dice, updater)?;
                presenter.publish(&CombatReport::Ship(outcome))?;
            }
            Scenario::Turret { turret } => {
                let outcome = ship_turret_roll(turret, dice);
                presenter.publish(&CombatReport::Turret(outcome))?;
            }
        }
        Ok(())
    }
}
