//! Personal target numbers

use serde::{Deserialize, Serialize};

use crate::combat::attack::AttackInput;
use crate::combat::outcome::PsyOutcome;
use crate::combat::rate_of_fire::RateOfFireProfile;
use crate::core::config::config;
use crate::core::error::{EngineError, Result};
use crate::dice::DiceSource;

/// Target number plus everything derived on the way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetResolution {
    pub target: i32,
    /// Net modifier after clamping
    pub net_modifier: i32,
    pub profile: Option<RateOfFireProfile>,
    pub psy: Option<PsyOutcome>,
}

/// Read a range band; absent means "0"
pub fn parse_range(range: Option<&str>) -> Result<i32> {
    let text = range.map(str::trim).unwrap_or("0");
    if text.is_empty() {
        return Ok(0);
    }
    let digits = text.strip_prefix('+').unwrap_or(text);
    digits
        .parse::<i32>()
        .map_err(|_| EngineError::malformed(text, "range is not an integer"))
}

/// Compute the target for a personal test
///
/// A pushing caster with a warp conduit draws 1d5 here, before the attack
/// roll. The push flag comes from the values before that bonus.
pub fn compute_target<D: DiceSource + ?Sized>(
    input: &AttackInput,
    dice: &mut D,
) -> Result<TargetResolution> {
    let cfg = config();
    let range = parse_range(input.range.as_deref())?;

    let profile = input
        .attack_type
        .map(|attack| RateOfFireProfile::for_attack(attack, &input.traits, input.rate_of_fire));
    let attack_modifier = profile.map(|p| p.modifier).unwrap_or(0);

    let mut push_modifier = 0;
    let psy = input.psy.as_ref().map(|state| {
        let mut outcome = PsyOutcome {
            value: state.value,
            sustained: state.sustained,
            ..Default::default()
        };
        if state.use_modifier {
            outcome.value = state.value.min(state.max);
            push_modifier = (state.rating - outcome.value) * 10;
            outcome.push = push_modifier < 0;
            if outcome.push && state.warp_conduit {
                let bonus = dice.roll_die(cfg.warp_conduit_faces) as i32;
                tracing::debug!(bonus, "warp conduit boosts psy rating");
                outcome.value += bonus;
            }
        }
        outcome
    });

    let net = input.modifier + input.aim.modifier() + range + attack_modifier + push_modifier;
    let net_modifier = cfg.clamp_modifier(net);
    let target = input.base_target + net_modifier;

    tracing::debug!(
        base = input.base_target,
        net,
        net_modifier,
        target,
        "personal target computed"
    );

    Ok(TargetResolution {
        target,
        net_modifier,
        profile,
        psy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::rate_of_fire::AttackType;
    use crate::combat::weapons::{Aim, PsyState};
    use crate::dice::ScriptedDice;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range(None).unwrap(), 0);
        assert_eq!(parse_range(Some("+10")).unwrap(), 10);
        assert_eq!(parse_range(Some("-20")).unwrap(), -20);
        assert!(parse_range(Some("close")).is_err());
    }

    #[test]
    fn test_modifiers_sum() {
        let mut input = AttackInput::new(40);
        input.modifier = 10;
        input.aim = Aim::Half;
        input.range = Some("+10".into());
        input.attack_type = Some(AttackType::Standard);

        let mut dice = ScriptedDice::default();
        let resolution = compute_target(&input, &mut dice).unwrap();
        assert_eq!(resolution.target, 80);
        assert_eq!(resolution.net_modifier, 40);
    }

    #[test]
    fn test_modifier_clamped() {
        let mut input = AttackInput::new(30);
        input.modifier = 50;
        input.aim = Aim::Full;
        input.attack_type = Some(AttackType::AllOut);

        let mut dice = ScriptedDice::default();
        let resolution = compute_target(&input, &mut dice).unwrap();
        assert_eq!(resolution.target, 90);

        input.modifier = -150;
        let resolution = compute_target(&input, &mut dice).unwrap();
        assert_eq!(resolution.target, -30);
    }

    #[test]
    fn test_psy_push_with_warp_conduit() {
        let mut input = AttackInput::new(45);
        input.psy = Some(PsyState {
            rating: 3,
            value: 9,
            max: 5,
            use_modifier: true,
            warp_conduit: true,
            sustained: 0,
        });

        let mut dice = ScriptedDice::new([4]);
        let resolution = compute_target(&input, &mut dice).unwrap();
        let psy = resolution.psy.unwrap();

        // Value clamps to 5 before the modifier, then the conduit adds 4
        assert!(psy.push);
        assert_eq!(psy.value, 9);
        assert_eq!(resolution.target, 25);
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn test_psy_unfettered_no_conduit_roll() {
        let mut input = AttackInput::new(45);
        input.psy = Some(PsyState {
            rating: 4,
            value: 2,
            max: 6,
            use_modifier: true,
            warp_conduit: true,
            sustained: 1,
        });

        let mut dice = ScriptedDice::default();
        let resolution = compute_target(&input, &mut dice).unwrap();
        let psy = resolution.psy.unwrap();
        assert!(!psy.push);
        assert_eq!(psy.value, 2);
        assert_eq!(resolution.target, 65);
    }
}
