//! Starship weapon resolution: batteries, torpedoes, attack craft and turrets

use serde::{Deserialize, Serialize};

use crate::combat::outcome::{half_extra_degrees, TestOutcome};
use crate::combat::target::parse_range;
use crate::core::config::config;
use crate::core::error::{EngineError, Result};
use crate::core::types::{EntityRef, EntityUpdater};
use crate::dice::{DiceSource, Expr};
use crate::ship::allocation::{absorb_with_shields, apply_to_facing, HullHit};
use crate::ship::critical::CriticalSeverity;
use crate::ship::location::{ship_location, AttackSide, ShipClass, ShotLocation};
use crate::ship::state::ShipState;

/// Weapon component class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipWeaponClass {
    #[default]
    Macro,
    Lance,
    Torpedoes,
    /// Fighter and bomber squadrons
    #[serde(rename = "attack")]
    AttackCraft,
    #[serde(other)]
    Other,
}

impl ShipWeaponClass {
    /// Torpedoes and attack craft ignore range bands
    pub fn ignores_range(self) -> bool {
        matches!(self, ShipWeaponClass::Torpedoes | ShipWeaponClass::AttackCraft)
    }
}

/// Known target ship
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyShip {
    pub entity: EntityRef,
    pub state: ShipState,
    /// Crew skill used by point-defence turrets
    pub crew_rate: i32,
    pub turrets: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipAttackInput {
    pub base_target: i32,
    #[serde(default)]
    pub modifier: i32,
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub weapon_class: ShipWeaponClass,
    /// Shots for a battery, waves for attack craft
    pub strength: u32,
    /// Battery damage expression; hits per salvo for attack craft
    #[serde(default)]
    pub damage_formula: Option<String>,
    #[serde(default)]
    pub damage_bonus: i32,
    #[serde(default)]
    pub lance: i32,
    pub ship_class: ShipClass,
    pub side: AttackSide,
}

impl ShipAttackInput {
    /// Test input: a macrobattery firing on a cruiser's broadside
    pub fn test_macrobattery(base_target: i32, strength: u32) -> Self {
        Self {
            base_target,
            modifier: 0,
            range: None,
            weapon_class: ShipWeaponClass::Macro,
            strength,
            damage_formula: Some("1d10+2".into()),
            damage_bonus: 0,
            lance: 0,
            ship_class: ShipClass::BigShip,
            side: AttackSide::Port,
        }
    }
}

/// One shot or salvo
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotResult {
    pub result: u32,
    pub is_success: bool,
    pub dos: u32,
    pub dof: u32,
    /// Damage as reported; after lance on shields, after armour on a facing
    pub damage: Option<i32>,
    pub formula: Option<String>,
    pub location: Option<ShotLocation>,
    pub critical: Option<CriticalSeverity>,
}

impl ShotResult {
    fn from_test(test: &TestOutcome) -> Self {
        Self {
            result: test.result,
            is_success: test.is_success,
            dos: test.dos,
            dof: test.dof,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipOutcome {
    pub target: i32,
    pub shots: Vec<ShotResult>,
    pub number_of_hits: u32,
    /// Attack-craft waves shot down by point defence
    pub turret_hits: u32,
    /// Attack-craft waves that reached the target
    pub waves: u32,
    /// Target ship after every accepted update
    pub final_state: Option<ShipState>,
}

/// Stand-alone point-defence roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurretInput {
    pub base_target: i32,
    #[serde(default)]
    pub modifier: i32,
    pub turret_number: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurretOutcome {
    /// Not clamped
    pub target: i32,
    pub turret_hits: u32,
    pub results: Vec<u32>,
}

/// Ship target: range does not apply to torpedoes or attack craft
pub fn compute_ship_target(input: &ShipAttackInput) -> Result<i32> {
    let range = if input.weapon_class.ignores_range() {
        0
    } else {
        parse_range(input.range.as_deref())?
    };
    let net = config().clamp_modifier(input.modifier + range);
    Ok(input.base_target + net)
}

/// Resolve a ship weapon, applying damage to `enemy` when one is known
pub fn ship_combat_roll<D, U>(
    input: &ShipAttackInput,
    enemy: Option<&EnemyShip>,
    dice: &mut D,
    updater: &mut U,
) -> Result<ShipOutcome>
where
    D: DiceSource + ?Sized,
    U: EntityUpdater + ?Sized,
{
    let mut outcome = ShipOutcome {
        target: compute_ship_target(input)?,
        ..Default::default()
    };
    let mut state = enemy.map(|e| e.state.clone());

    if input.weapon_class == ShipWeaponClass::AttackCraft {
        roll_attack_craft(input, enemy, &mut state, &mut outcome, dice, updater)?;
    } else {
        for _ in 0..input.strength {
            roll_battery_shot(input, enemy, &mut state, &mut outcome, dice, updater)?;
        }
    }

    outcome.final_state = state;
    tracing::debug!(
        target = outcome.target,
        hits = outcome.number_of_hits,
        shots = outcome.shots.len(),
        "ship attack resolved"
    );
    Ok(outcome)
}

/// Count point-defence hits against `base_target + modifier`
pub fn ship_turret_roll<D: DiceSource + ?Sized>(input: &TurretInput, dice: &mut D) -> TurretOutcome {
    let target = input.base_target + input.modifier;
    let mut outcome = TurretOutcome {
        target,
        ..Default::default()
    };
    for _ in 0..input.turret_number {
        let result = dice.d100();
        if result as i32 <= target {
            outcome.turret_hits += 1;
        }
        outcome.results.push(result);
    }
    tracing::debug!(target, hits = outcome.turret_hits, "turret roll");
    outcome
}

/// Point defence: each turret that passes the crew rate downs one wave
fn fire_counter_measures<D: DiceSource + ?Sized>(enemy: &EnemyShip, dice: &mut D) -> u32 {
    (0..enemy.turrets)
        .filter(|_| dice.d100() as i32 <= enemy.crew_rate)
        .count() as u32
}

fn salvo_size(formula: Option<&str>) -> Result<u32> {
    match formula.map(str::trim) {
        None | Some("") => Ok(0),
        Some(text) => text
            .parse::<u32>()
            .map_err(|_| EngineError::malformed(text, "attack craft salvo is not a whole number")),
    }
}

fn roll_attack_craft<D, U>(
    input: &ShipAttackInput,
    enemy: Option<&EnemyShip>,
    state: &mut Option<ShipState>,
    outcome: &mut ShipOutcome,
    dice: &mut D,
    updater: &mut U,
) -> Result<()>
where
    D: DiceSource + ?Sized,
    U: EntityUpdater + ?Sized,
{
    let size = salvo_size(input.damage_formula.as_deref())?;

    if let Some(enemy) = enemy {
        outcome.turret_hits = fire_counter_measures(enemy, dice);
    }
    outcome.waves = input.strength.saturating_sub(outcome.turret_hits);

    for _ in 0..outcome.waves {
        let test = TestOutcome::grade(outcome.target, dice.d100());
        if test.is_success {
            let hits = 1 + half_extra_degrees(test.dos);
            outcome.number_of_hits += hits.max(0) as u32;
        }
    }

    // Hits land in salvos; a size of 0 sends them all at once
    let total_hits = outcome.number_of_hits;
    let mut salvos = Vec::new();
    if size == 0 {
        if total_hits > 0 {
            salvos.push(total_hits);
        }
    } else {
        salvos.extend(std::iter::repeat(size).take((total_hits / size) as usize));
        if total_hits % size > 0 {
            salvos.push(total_hits % size);
        }
    }

    for hits in salvos {
        let result = dice.d100();
        let damage = hits as i32 + input.damage_bonus;
        let facing = ship_location(result, input.ship_class, input.side);
        let mut shot = ShotResult {
            result,
            is_success: true,
            dos: 1,
            damage: Some(damage),
            formula: Some(format!("{}+{}", hits, input.damage_bonus)),
            location: Some(ShotLocation::Facing(facing)),
            ..Default::default()
        };

        if let (Some(enemy), Some(ship)) = (enemy, state.as_mut()) {
            let hit = apply_to_facing(
                ship,
                &enemy.entity,
                HullHit::new(facing, damage).with_lance(input.lance),
                dice,
                updater,
            )?;
            shot.damage = Some(hit.total);
            shot.critical = hit.critical;
        }
        outcome.shots.push(shot);
    }
    Ok(())
}

fn roll_battery_shot<D, U>(
    input: &ShipAttackInput,
    enemy: Option<&EnemyShip>,
    state: &mut Option<ShipState>,
    outcome: &mut ShipOutcome,
    dice: &mut D,
    updater: &mut U,
) -> Result<()>
where
    D: DiceSource + ?Sized,
    U: EntityUpdater + ?Sized,
{
    let test = TestOutcome::grade(outcome.target, dice.d100());
    let mut shot = ShotResult::from_test(&test);

    if test.is_success {
        let expr = match input.damage_formula.as_deref() {
            Some(formula) => Expr::parse(formula)?.plus(input.damage_bonus),
            None => Expr::Constant(0),
        };
        let total = dice.roll(&expr)?.total;
        shot.formula = Some(expr.to_string());
        shot.damage = Some(total);

        let torpedo = input.weapon_class == ShipWeaponClass::Torpedoes;
        match (enemy, state.as_mut()) {
            (Some(enemy), Some(ship)) => {
                let shielded = if torpedo {
                    None
                } else {
                    let damage = total - input.lance;
                    let tier = absorb_with_shields(ship, &enemy.entity, damage, updater)?;
                    if tier.is_some() {
                        shot.damage = Some(damage);
                    }
                    tier
                };

                if shielded.is_some() {
                    shot.location = Some(ShotLocation::Shields);
                } else {
                    let facing = ship_location(test.result, input.ship_class, input.side);
                    let mut hit = HullHit::new(facing, total).with_lance(input.lance);
                    hit.torpedo = torpedo;
                    let applied = apply_to_facing(ship, &enemy.entity, hit, dice, updater)?;
                    shot.location = Some(ShotLocation::Facing(facing));
                    shot.damage = Some(applied.total);
                    shot.critical = applied.critical;
                }
            }
            _ => {
                let facing = ship_location(test.result, input.ship_class, input.side);
                shot.location = Some(ShotLocation::Facing(facing));
            }
        }
        outcome.number_of_hits += 1;
    }

    outcome.shots.push(shot);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{RecordingUpdater, StatPath, StatUpdate};
    use crate::dice::ScriptedDice;
    use crate::ship::state::{ShieldTier, ShipFacing};

    fn cruiser() -> EnemyShip {
        EnemyShip {
            entity: EntityRef::new("cruiser"),
            state: ShipState::uniform(10, 20),
            crew_rate: 40,
            turrets: 2,
        }
    }

    #[test]
    fn test_target_ignores_range_for_craft() {
        let mut input = ShipAttackInput::test_macrobattery(40, 1);
        input.range = Some("+10".into());
        input.modifier = 5;
        assert_eq!(compute_ship_target(&input).unwrap(), 55);

        input.weapon_class = ShipWeaponClass::Torpedoes;
        assert_eq!(compute_ship_target(&input).unwrap(), 45);
    }

    #[test]
    fn test_target_clamped() {
        let mut input = ShipAttackInput::test_macrobattery(40, 1);
        input.modifier = 90;
        assert_eq!(compute_ship_target(&input).unwrap(), 100);
    }

    #[test]
    fn test_battery_without_enemy_reports_location() {
        let input = ShipAttackInput::test_macrobattery(50, 2);
        // hit 34 -> 1d10 rolls 7, miss 80
        let mut dice = ScriptedDice::new([34, 7, 80]);
        let mut updater = RecordingUpdater::new();

        let outcome = ship_combat_roll(&input, None, &mut dice, &mut updater).unwrap();
        assert_eq!(outcome.number_of_hits, 1);
        assert_eq!(outcome.shots.len(), 2);
        assert_eq!(outcome.shots[0].damage, Some(9));
        // 34 reverses to 43 on the port table
        assert_eq!(
            outcome.shots[0].location,
            Some(ShotLocation::Facing(ShipFacing::Port))
        );
        assert_eq!(outcome.shots[1].damage, None);
        assert!(updater.calls.is_empty());
        assert_eq!(outcome.final_state, None);
    }

    #[test]
    fn test_battery_hits_shields_minus_lance() {
        let mut input = ShipAttackInput::test_macrobattery(50, 1);
        input.lance = 2;
        let mut enemy = cruiser();
        enemy.state.shields = [0, 0, 0, 4, 0];
        let mut dice = ScriptedDice::new([22, 6]);
        let mut updater = RecordingUpdater::new();

        let outcome = ship_combat_roll(&input, Some(&enemy), &mut dice, &mut updater).unwrap();
        let shot = &outcome.shots[0];
        assert_eq!(shot.location, Some(ShotLocation::Shields));
        assert_eq!(shot.damage, Some(6));
        assert_eq!(
            updater.updates(),
            vec![StatUpdate::new(StatPath::Shield(ShieldTier::Four), -2)]
        );
        assert_eq!(outcome.final_state.unwrap().shields[3], -2);
    }

    #[test]
    fn test_battery_breaks_facing() {
        let input = ShipAttackInput::test_macrobattery(50, 1);
        // 45 reverses to 54: port; 1d10 = 10 -> 12 damage; crit 1 + 1
        let mut dice = ScriptedDice::new([45, 10, 1, 1]);
        let mut updater = RecordingUpdater::new();

        let outcome = ship_combat_roll(&input, Some(&cruiser()), &mut dice, &mut updater).unwrap();
        let shot = &outcome.shots[0];
        assert_eq!(shot.location, Some(ShotLocation::Facing(ShipFacing::Port)));
        assert_eq!(shot.damage, Some(12));
        assert_eq!(shot.critical, Some(CriticalSeverity::None));
        let state = outcome.final_state.unwrap();
        assert_eq!(state.port.armour, 0);
        assert_eq!(state.port.structure, 18);
    }

    #[test]
    fn test_torpedoes_skip_shields() {
        let input = ShipAttackInput {
            weapon_class: ShipWeaponClass::Torpedoes,
            damage_formula: Some("4".into()),
            ..ShipAttackInput::test_macrobattery(50, 1)
        };
        let mut enemy = cruiser();
        enemy.state.shields = [3, 0, 0, 0, 0];
        // armour holds, torpedo still rolls a critical
        let mut dice = ScriptedDice::new([45, 2, 3]);
        let mut updater = RecordingUpdater::new();

        let outcome = ship_combat_roll(&input, Some(&enemy), &mut dice, &mut updater).unwrap();
        let shot = &outcome.shots[0];
        assert_eq!(shot.location, Some(ShotLocation::Facing(ShipFacing::Port)));
        assert_eq!(shot.critical, Some(CriticalSeverity::None));
        let state = outcome.final_state.unwrap();
        assert_eq!(state.shields[0], 3);
        assert_eq!(state.port.armour, 6);
    }

    #[test]
    fn test_attack_craft_waves_and_salvos() {
        let input = ShipAttackInput {
            weapon_class: ShipWeaponClass::AttackCraft,
            strength: 3,
            damage_formula: Some("2".into()),
            ..ShipAttackInput::test_macrobattery(50, 0)
        };
        // turrets: 30 downs a wave, 90 misses
        // waves: 12 (dos 5 -> 3 hits), 77 misses
        // salvos of 2 then 1, located by 45 and 9; armour stops both
        let mut dice = ScriptedDice::new([30, 90, 12, 77, 45, 9]);
        let mut updater = RecordingUpdater::new();

        let outcome = ship_combat_roll(&input, Some(&cruiser()), &mut dice, &mut updater).unwrap();
        assert_eq!(outcome.turret_hits, 1);
        assert_eq!(outcome.waves, 2);
        assert_eq!(outcome.number_of_hits, 3);
        assert_eq!(outcome.shots.len(), 2);
        assert_eq!(outcome.shots[0].formula.as_deref(), Some("2+0"));
        assert_eq!(outcome.shots[1].formula.as_deref(), Some("1+0"));
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn test_attack_craft_single_salvo() {
        let input = ShipAttackInput {
            weapon_class: ShipWeaponClass::AttackCraft,
            strength: 2,
            damage_formula: None,
            damage_bonus: 1,
            ..ShipAttackInput::test_macrobattery(60, 0)
        };
        let mut dice = ScriptedDice::new([20, 30, 45]);
        let mut updater = RecordingUpdater::new();

        let outcome = ship_combat_roll(&input, None, &mut dice, &mut updater).unwrap();
        // dos 5 -> 3 hits, dos 4 -> 3 hits
        assert_eq!(outcome.number_of_hits, 6);
        assert_eq!(outcome.shots.len(), 1);
        assert_eq!(outcome.shots[0].damage, Some(7));
    }

    #[test]
    fn test_attack_craft_rejects_dice_salvo() {
        let input = ShipAttackInput {
            weapon_class: ShipWeaponClass::AttackCraft,
            damage_formula: Some("1d5".into()),
            ..ShipAttackInput::test_macrobattery(60, 1)
        };
        let mut dice = ScriptedDice::default();
        let mut updater = RecordingUpdater::new();
        let err = ship_combat_roll(&input, None, &mut dice, &mut updater).unwrap_err();
        assert!(matches!(err, EngineError::MalformedFormula { .. }));
    }

    #[test]
    fn test_turret_roll_unclamped() {
        let input = TurretInput {
            base_target: 50,
            modifier: 80,
            turret_number: 3,
        };
        let mut dice = ScriptedDice::new([100, 5, 99]);
        let outcome = ship_turret_roll(&input, &mut dice);
        assert_eq!(outcome.target, 130);
        assert_eq!(outcome.turret_hits, 3);
        assert_eq!(outcome.results, vec![100, 5, 99]);
    }

    #[test]
    fn test_weapon_class_names() {
        let class: ShipWeaponClass = serde_json::from_str("\"attack\"").unwrap();
        assert_eq!(class, ShipWeaponClass::AttackCraft);
        let class: ShipWeaponClass = serde_json::from_str("\"nova\"").unwrap();
        assert_eq!(class, ShipWeaponClass::Other);
    }
}
