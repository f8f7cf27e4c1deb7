//! Property tests for the d100 rules and the dice roller

use proptest::prelude::*;

use voidfire::combat::{common_roll, degree, is_double, AttackInput, TestOutcome};
use voidfire::dice::{DiceSource, ScriptedDice, SeededDice};

proptest! {
    #[test]
    fn degree_is_antisymmetric(a in -200i32..300, b in -200i32..300) {
        prop_assert_eq!(degree(a, b), -degree(b, a));
    }

    #[test]
    fn success_and_failure_degrees_are_exclusive(target in -50i32..150, result in 1u32..=100) {
        let outcome = TestOutcome::grade(target, result);
        prop_assert_eq!(outcome.is_success, result as i32 <= target);
        if outcome.is_success {
            prop_assert!(outcome.dos >= 1);
            prop_assert_eq!(outcome.dof, 0);
        } else {
            prop_assert!(outcome.dof >= 1);
            prop_assert_eq!(outcome.dos, 0);
        }
    }

    #[test]
    fn target_modifier_is_capped(base in 0i32..100, modifier in -500i32..500) {
        let input = AttackInput { modifier, ..AttackInput::new(base) };
        let mut dice = ScriptedDice::new([50]);
        let outcome = common_roll(&input, &mut dice).unwrap();
        prop_assert!(outcome.target >= base - 60);
        prop_assert!(outcome.target <= base + 60);
    }

    #[test]
    fn doubles_repeat_the_digit(result in 1u32..=100) {
        let expected = result == 100 || (result >= 11 && result % 11 == 0);
        prop_assert_eq!(is_double(result), expected);
    }

    #[test]
    fn dice_totals_stay_in_bounds(
        seed in any::<u64>(),
        count in 1u32..8,
        faces in 1u32..20,
        bonus in -10i32..10,
    ) {
        let mut dice = SeededDice::new(seed);
        let formula = format!("{}d{}{:+}", count, faces, bonus);
        let roll = dice.roll_str(&formula).unwrap();
        prop_assert_eq!(roll.dice.len(), count as usize);
        prop_assert!(roll.total >= count as i32 + bonus);
        prop_assert!(roll.total <= (count * faces) as i32 + bonus);
    }
}
