//! Mass combat resolution
//!
//! Every model in the attacking unit rolls against one shared target. Hits
//! are scored against the enemy unit as a whole: damage dealt, brutal kills
//! and critical sparks, not per-model wounds.

use crate::battle::units::{EnemyUnitStats, ModelResult, UnitAttackInput, UnitOutcome};
use crate::combat::damage::inspect_dice;
use crate::combat::formula::{assemble, SymbolTable};
use crate::combat::outcome::{half_extra_degrees, TestOutcome};
use crate::combat::penetration::roll_penetration;
use crate::combat::rate_of_fire::RateOfFireProfile;
use crate::combat::target::parse_range;
use crate::core::config::config;
use crate::core::error::Result;
use crate::dice::{DiceSource, Expr};

/// Point blank range band
const POINT_BLANK: i32 = -20;

/// Unit target number
///
/// Scatter weapons fire well at point blank (+10) and badly at normal range
/// (-20). Pistols take no point blank penalty. Torrent ignores defence.
pub fn compute_unit_target(
    input: &UnitAttackInput,
    enemy: &EnemyUnitStats,
    profile: Option<&RateOfFireProfile>,
) -> Result<i32> {
    let cfg = config();
    let band = parse_range(input.range.as_deref())?;
    let range = match band {
        POINT_BLANK if input.traits.scatter => 10,
        POINT_BLANK if input.traits.pistol => 0,
        0 if input.traits.scatter => -20,
        other => other,
    };

    let defence = if input.traits.torrent.is_some() {
        0
    } else {
        enemy.defence(input.is_melee)
    };
    let attack_modifier = profile.map(|p| p.modifier).unwrap_or(0);

    let net = input.modifier + range + attack_modifier - defence + cfg.mass_combat_bonus;
    let target = input.base_target + cfg.clamp_modifier(net);
    tracing::debug!(base = input.base_target, net, target, "unit target computed");
    Ok(target)
}

/// Resolve a unit attack against an enemy unit
pub fn unit_combat_roll<D: DiceSource + ?Sized>(
    input: &UnitAttackInput,
    enemy: &EnemyUnitStats,
    dice: &mut D,
) -> Result<UnitOutcome> {
    let profile = input
        .attack_type
        .map(|attack| RateOfFireProfile::for_attack(attack, &input.traits, input.rate_of_fire));

    let mut outcome = UnitOutcome {
        target: compute_unit_target(input, enemy, profile.as_ref())?,
        attack_modifier: profile.map(|p| p.modifier).unwrap_or(0),
        ..Default::default()
    };

    let point_blank = parse_range(input.range.as_deref())? == POINT_BLANK;
    let expr = match input.damage_formula.as_deref() {
        Some(formula) => assemble(formula, &input.traits, input.damage_bonus)?,
        None => Expr::Constant(0),
    };

    for _ in 0..input.quantity {
        let test = TestOutcome::grade(outcome.target, dice.d100());
        let ordnance = input.traits.ordnance.unwrap_or(0);
        if !test.is_success && ordnance <= test.dof {
            outcome.models.push(ModelResult { test, volleys: 0 });
            continue;
        }

        let volleys = volley_count(input, &test, point_blank, dice).max(1) as u32;
        for _ in 0..volleys {
            resolve_volley(input, enemy, profile.as_ref(), &expr, test.dos, &mut outcome, dice)?;
        }
        outcome.models.push(ModelResult { test, volleys });
    }

    tracing::debug!(
        target = outcome.target,
        hits = outcome.number_of_hits,
        dealt = outcome.damage_dealt,
        brutals = outcome.brutals,
        "unit attack resolved"
    );
    Ok(outcome)
}

/// Hits a model scores from torrent, ordnance and point blank scatter
fn volley_count<D: DiceSource + ?Sized>(
    input: &UnitAttackInput,
    test: &TestOutcome,
    point_blank: bool,
    dice: &mut D,
) -> i32 {
    let extra = half_extra_degrees(test.dos);
    let mut count = 0;

    if let Some(n) = input.traits.torrent {
        let rolled: u32 = (0..n).map(|_| dice.roll_die(4)).sum();
        count += (rolled + n) as i32 + extra;
    }
    if let Some(n) = input.traits.ordnance {
        count += n as i32 + extra - test.dof as i32;
    }
    if input.traits.scatter && point_blank {
        count += extra;
    }
    count
}

/// One volley: auxiliary swap, penetration, the main hit, then rate of fire
///
/// Only the main hit sees the auxiliary stats. Rate-of-fire hits land on the
/// unit's base stats.
fn resolve_volley<D: DiceSource + ?Sized>(
    input: &UnitAttackInput,
    enemy: &EnemyUnitStats,
    profile: Option<&RateOfFireProfile>,
    expr: &Expr,
    dos: u32,
    outcome: &mut UnitOutcome,
    dice: &mut D,
) -> Result<()> {
    let mut soak = enemy.soak();
    if let Some(aux) = enemy.auxiliary.filter(|aux| aux.chance > 0) {
        if dice.d100() < aux.chance {
            soak = aux.into();
        }
    }

    let penetration = roll_penetration(
        input.penetration_formula.as_deref(),
        dos,
        input.traits.razor_sharp,
        &SymbolTable::default(),
        dice,
    )?;

    let additional = profile
        .map(|p| p.additional_hits(dos, input.traits.storm_multiplier()))
        .unwrap_or(0);

    for hit in 0..=additional {
        if hit == 1 {
            soak = enemy.soak();
        }
        let roll = dice.roll(expr)?;
        let inspection = inspect_dice(&roll, dos, &input.traits, dice);

        let mut net = roll.total - (soak.armour - penetration).max(0) - soak.toughness;
        if input.traits.accurate {
            net += dos as i32 * 2;
        }
        outcome.record_hit(roll.total, net, inspection.righteous_fury > 0, soak);
    }
    Ok(())
}
