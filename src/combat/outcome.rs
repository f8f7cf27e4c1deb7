//! d100 test resolution: success, degrees, jams and psychic phenomena

use serde::{Deserialize, Serialize};

use crate::dice::DiceSource;

/// Tens-digit difference between two values
///
/// Ties within the same ten never add a degree.
pub fn degree(a: i32, b: i32) -> i32 {
    a.div_euclid(10) - b.div_euclid(10)
}

/// Both digits match; 100 counts as a double
pub fn is_double(result: u32) -> bool {
    if result == 100 {
        return true;
    }
    let digit = result % 10;
    result - digit == digit * 10
}

/// Psychic state after the test
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsyOutcome {
    /// Channelled rating, after clamping and any warp conduit bonus
    pub value: i32,
    pub push: bool,
    pub has_phenomena: bool,
    pub sustained: u32,
}

/// Result of rolling one d100 against a target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub target: i32,
    pub result: u32,
    pub is_success: bool,
    pub is_jammed: bool,
    pub is_overheated: bool,
    pub dos: u32,
    pub dof: u32,
}

impl TestOutcome {
    /// Grade an already rolled result; jams are not considered
    pub fn grade(target: i32, result: u32) -> Self {
        let roll = result as i32;
        let mut outcome = TestOutcome {
            target,
            result,
            ..Default::default()
        };
        if roll <= target {
            outcome.is_success = true;
            outcome.dos = 1 + degree(target, roll).max(0) as u32;
        } else {
            outcome.dof = 1 + degree(roll, target).max(0) as u32;
        }
        outcome
    }
}

/// Roll a d100 against `target`
///
/// A result at or above `jam_target` jams the weapon. A jam skips degree
/// computation entirely; an overheating weapon is flagged instead.
pub fn roll_target<D: DiceSource + ?Sized>(
    target: i32,
    jam_target: Option<u32>,
    overheats: bool,
    dice: &mut D,
) -> TestOutcome {
    let result = dice.d100();
    let is_jammed = jam_target.is_some_and(|jam| result >= jam);

    let outcome = if is_jammed {
        TestOutcome {
            target,
            result,
            is_jammed: true,
            is_overheated: overheats,
            ..Default::default()
        }
    } else {
        TestOutcome::grade(target, result)
    };

    tracing::debug!(
        target,
        result,
        dos = outcome.dos,
        dof = outcome.dof,
        jammed = outcome.is_jammed,
        "test rolled"
    );
    outcome
}

/// `(dos - 1) / 2` rounded half away from zero
///
/// Used for extra hits in unit and attack-craft combat. A DoS of 0 gives -1.
pub fn half_extra_degrees(dos: u32) -> i32 {
    let extra = dos as i32 - 1;
    if extra >= 0 {
        (extra + 1) / 2
    } else {
        -((1 - extra) / 2)
    }
}

/// Pushed castings invert the usual doubles-cause-phenomena rule
pub fn has_phenomena(push: bool, result: u32) -> bool {
    push != is_double(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;

    #[test]
    fn test_degree_tens_digit() {
        assert_eq!(degree(60, 45), 2);
        assert_eq!(degree(45, 60), -2);
        assert_eq!(degree(47, 41), 0);
        assert_eq!(degree(-5, 3), -1);
    }

    #[test]
    fn test_doubles() {
        assert!(is_double(11));
        assert!(is_double(99));
        assert!(is_double(100));
        assert!(!is_double(12));
        assert!(!is_double(10));
        assert!(!is_double(1));
    }

    #[test]
    fn test_grade_success_and_failure() {
        let hit = TestOutcome::grade(60, 45);
        assert!(hit.is_success);
        assert_eq!((hit.dos, hit.dof), (3, 0));

        let miss = TestOutcome::grade(40, 73);
        assert!(!miss.is_success);
        assert_eq!((miss.dos, miss.dof), (0, 4));
    }

    #[test]
    fn test_jam_skips_degrees() {
        let mut dice = ScriptedDice::new([96]);
        let outcome = roll_target(80, Some(94), true, &mut dice);
        assert!(outcome.is_jammed);
        assert!(outcome.is_overheated);
        assert!(!outcome.is_success);
        assert_eq!((outcome.dos, outcome.dof), (0, 0));
    }

    #[test]
    fn test_no_jam_target_never_jams() {
        let mut dice = ScriptedDice::new([100]);
        let outcome = roll_target(30, None, false, &mut dice);
        assert!(!outcome.is_jammed);
        assert_eq!(outcome.dof, 8);
    }

    #[test]
    fn test_half_extra_degrees_rounds_away_from_zero() {
        assert_eq!(half_extra_degrees(0), -1);
        assert_eq!(half_extra_degrees(1), 0);
        assert_eq!(half_extra_degrees(2), 1);
        assert_eq!(half_extra_degrees(3), 1);
        assert_eq!(half_extra_degrees(4), 2);
        assert_eq!(half_extra_degrees(6), 3);
    }

    #[test]
    fn test_phenomena_inverts_on_push() {
        assert!(has_phenomena(false, 33));
        assert!(!has_phenomena(false, 34));
        assert!(!has_phenomena(true, 33));
        assert!(has_phenomena(true, 34));
    }
}
