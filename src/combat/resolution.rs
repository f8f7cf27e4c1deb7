//! Personal attack resolution
//!
//! target -> d100 -> damage -> additional hits. Each step reads the input
//! and appends to the outcome.

use crate::combat::attack::{AttackInput, AttackOutcome};
use crate::combat::body_zone::HitLocation;
use crate::combat::damage::compute_damage;
use crate::combat::formula::{personal_damage, SymbolTable};
use crate::combat::outcome::{has_phenomena, roll_target, PsyOutcome};
use crate::combat::penetration::roll_penetration;
use crate::combat::rate_of_fire::RateOfFireProfile;
use crate::combat::target::compute_target;
use crate::core::error::Result;
use crate::dice::DiceSource;
use crate::report::{CombatReport, Presenter};

/// Result reported for attacks that never roll to hit; reversed it reads 50
pub const SKIP_ATTACK_RESULT: u32 = 5;

/// Plain skill test: target and d100, no damage
pub fn common_roll<D: DiceSource + ?Sized>(
    input: &AttackInput,
    dice: &mut D,
) -> Result<AttackOutcome> {
    let mut outcome = AttackOutcome::default();
    let profile = roll_to_hit(input, &mut outcome, dice)?;
    outcome.hit_margin = profile.map(|p| p.hit_margin).unwrap_or(0);
    Ok(outcome)
}

/// Full personal attack: to-hit, damage and additional hits
pub fn combat_roll<D: DiceSource + ?Sized>(
    input: &AttackInput,
    dice: &mut D,
) -> Result<AttackOutcome> {
    let mut outcome = AttackOutcome::default();

    if input.traits.skip_attack_roll {
        outcome.target = input.base_target;
        outcome.result = SKIP_ATTACK_RESULT;
        outcome.is_success = true;
        outcome.dos = 1;
        outcome.psy = input.psy.as_ref().map(|state| PsyOutcome {
            value: state.value,
            sustained: state.sustained,
            ..Default::default()
        });
        tracing::debug!("attack skips the hit roll");
        roll_damage(input, &mut outcome, None, dice)?;
        return Ok(outcome);
    }

    let profile = roll_to_hit(input, &mut outcome, dice)?;
    outcome.hit_margin = profile.map(|p| p.hit_margin).unwrap_or(0);

    let deals_damage = if outcome.is_jammed {
        outcome.is_overheated
    } else {
        outcome.is_success
    };
    if deals_damage {
        roll_damage(input, &mut outcome, profile, dice)?;
    }

    tracing::debug!(
        hits = outcome.number_of_hits,
        total = outcome.total_damage(),
        "combat roll resolved"
    );
    Ok(outcome)
}

/// Publish the out-of-ammunition notice
pub fn report_empty_clip<P: Presenter + ?Sized>(weapon: &str, presenter: &mut P) -> Result<()> {
    tracing::info!(weapon, "empty clip");
    presenter.publish(&CombatReport::EmptyClip {
        weapon: weapon.to_string(),
    })
}

fn roll_to_hit<D: DiceSource + ?Sized>(
    input: &AttackInput,
    outcome: &mut AttackOutcome,
    dice: &mut D,
) -> Result<Option<RateOfFireProfile>> {
    let resolution = compute_target(input, dice)?;
    let test = roll_target(resolution.target, input.jam_target, input.overheats, dice);

    outcome.record_test(&test);
    outcome.attack_modifier = resolution.profile.map(|p| p.modifier).unwrap_or(0);
    outcome.psy = resolution.psy.map(|psy| PsyOutcome {
        has_phenomena: has_phenomena(psy.push, test.result),
        ..psy
    });
    Ok(resolution.profile)
}

fn roll_damage<D: DiceSource + ?Sized>(
    input: &AttackInput,
    outcome: &mut AttackOutcome,
    profile: Option<RateOfFireProfile>,
    dice: &mut D,
) -> Result<()> {
    let symbols = SymbolTable::new(
        outcome.psy.map(|psy| psy.value),
        &input.attribute_bonuses,
    );

    let expr = personal_damage(
        input.damage_formula.as_deref(),
        &input.traits,
        input.damage_bonus,
        &symbols,
        dice,
    )?;
    let penetration = roll_penetration(
        input.penetration_formula.as_deref(),
        outcome.dos,
        input.traits.razor_sharp,
        &symbols,
        dice,
    )?;

    let first_location = HitLocation::from_roll(outcome.result);
    let first = compute_damage(
        &expr,
        penetration,
        outcome.dos,
        input.aim,
        &input.traits,
        first_location,
        dice,
    )?;
    if first.rolled_total() == 0 {
        tracing::debug!("first hit rolled no damage");
        return Ok(());
    }
    outcome.damages.push(first);

    let additional = match profile {
        Some(profile) if !outcome.is_overheated => {
            profile.additional_hits(outcome.dos, input.traits.storm_multiplier())
        }
        _ => 0,
    };

    for i in 0..additional as usize {
        let hit = compute_damage(
            &expr,
            penetration,
            outcome.dos,
            input.aim,
            &input.traits,
            first_location.additional(i),
            dice,
        )?;
        outcome.damages.push(hit);
    }

    outcome.number_of_hits = outcome.damages.len() as u32;
    Ok(())
}
