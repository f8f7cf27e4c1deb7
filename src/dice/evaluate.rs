//! Expression evaluation against a dice source

use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};
use crate::dice::expression::{BinOp, DiceModifier, DiceTerm, Expr, MAX_DICE_PER_TERM};
use crate::dice::source::DiceSource;

/// One die as rolled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieResult {
    pub faces: u32,
    /// Raw face from the source
    pub result: u32,
    /// Face after min/max clamping
    pub value: u32,
    /// False when dropped by `dl`/`kh`
    pub active: bool,
}

/// Total plus every die drawn, in draw order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    pub total: i32,
    pub dice: Vec<DieResult>,
}

impl RollOutcome {
    pub fn active_dice(&self) -> impl Iterator<Item = &DieResult> {
        self.dice.iter().filter(|d| d.active)
    }
}

/// Evaluate an expression, drawing dice left to right
pub fn evaluate<D: DiceSource + ?Sized>(expr: &Expr, dice: &mut D) -> Result<RollOutcome> {
    let mut drawn = Vec::new();
    let total = eval_node(expr, expr, dice, &mut drawn)?;
    Ok(RollOutcome { total, dice: drawn })
}

fn eval_node<D: DiceSource + ?Sized>(
    root: &Expr,
    node: &Expr,
    dice: &mut D,
    drawn: &mut Vec<DieResult>,
) -> Result<i32> {
    match node {
        Expr::Constant(n) => Ok(*n),
        Expr::Symbol(name) => Err(EngineError::malformed(
            root.to_string(),
            format!("unresolved symbol '{}'", name),
        )),
        Expr::Dice(term) => roll_term(root, term, dice, drawn),
        Expr::Neg(inner) => {
            let v = eval_node(root, inner, dice, drawn)?;
            v.checked_neg().ok_or_else(|| overflow(root))
        }
        Expr::Group(inner) => eval_node(root, inner, dice, drawn),
        Expr::Binary { op, lhs, rhs } => {
            let a = eval_node(root, lhs, dice, drawn)?;
            let b = eval_node(root, rhs, dice, drawn)?;
            let result = match op {
                BinOp::Add => a.checked_add(b),
                BinOp::Sub => a.checked_sub(b),
                BinOp::Mul => a.checked_mul(b),
                BinOp::Div => {
                    if b == 0 {
                        return Err(EngineError::malformed(root.to_string(), "division by zero"));
                    }
                    floor_div(a, b)
                }
            };
            result.ok_or_else(|| overflow(root))
        }
    }
}

fn roll_term<D: DiceSource + ?Sized>(
    root: &Expr,
    term: &DiceTerm,
    dice: &mut D,
    drawn: &mut Vec<DieResult>,
) -> Result<i32> {
    if term.faces == 0 {
        return Err(EngineError::malformed(root.to_string(), "die with zero faces"));
    }
    if term.count > MAX_DICE_PER_TERM {
        return Err(EngineError::malformed(
            root.to_string(),
            format!("more than {} dice in one term", MAX_DICE_PER_TERM),
        ));
    }

    let mut rolled: Vec<DieResult> = (0..term.count)
        .map(|_| {
            let result = dice.roll_die(term.faces);
            DieResult {
                faces: term.faces,
                result,
                value: result,
                active: true,
            }
        })
        .collect();

    // Clamps first, then selection, regardless of written order
    for modifier in &term.modifiers {
        match *modifier {
            DiceModifier::Min(floor) => {
                for die in &mut rolled {
                    die.value = die.value.max(floor);
                }
            }
            DiceModifier::Max(ceiling) => {
                for die in &mut rolled {
                    die.value = die.value.min(ceiling);
                }
            }
            DiceModifier::DropLowest(_) | DiceModifier::KeepHighest(_) => {}
        }
    }

    for modifier in &term.modifiers {
        match *modifier {
            DiceModifier::DropLowest(n) => drop_lowest(&mut rolled, n as usize),
            DiceModifier::KeepHighest(n) => keep_highest(&mut rolled, n as usize),
            DiceModifier::Min(_) | DiceModifier::Max(_) => {}
        }
    }

    let subtotal = rolled
        .iter()
        .filter(|d| d.active)
        .try_fold(0i32, |acc, d| acc.checked_add(d.value as i32))
        .ok_or_else(|| overflow(root))?;

    drawn.extend(rolled);
    Ok(subtotal)
}

/// Indices of active dice ordered by value, earliest roll first on ties
fn active_by_value(rolled: &[DieResult]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..rolled.len()).filter(|&i| rolled[i].active).collect();
    indices.sort_by_key(|&i| rolled[i].value);
    indices
}

fn drop_lowest(rolled: &mut [DieResult], n: usize) {
    for i in active_by_value(rolled).into_iter().take(n) {
        rolled[i].active = false;
    }
}

fn keep_highest(rolled: &mut [DieResult], n: usize) {
    let mut indices = active_by_value(rolled);
    // Stable sort keeps earlier rolls ahead on ties
    indices.sort_by(|&a, &b| rolled[b].value.cmp(&rolled[a].value));
    for i in indices.into_iter().skip(n) {
        rolled[i].active = false;
    }
}

fn floor_div(a: i32, b: i32) -> Option<i32> {
    let q = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

fn overflow(root: &Expr) -> EngineError {
    EngineError::malformed(root.to_string(), "arithmetic overflow")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::source::ScriptedDice;

    fn roll(formula: &str, faces: &[u32]) -> Result<RollOutcome> {
        let expr = Expr::parse(formula)?;
        let mut dice = ScriptedDice::new(faces.iter().copied());
        evaluate(&expr, &mut dice)
    }

    #[test]
    fn test_constant_only() {
        let outcome = roll("3+4*2", &[]).unwrap();
        assert_eq!(outcome.total, 11);
        assert!(outcome.dice.is_empty());
    }

    #[test]
    fn test_dice_sum() {
        let outcome = roll("2d10+3", &[4, 7]).unwrap();
        assert_eq!(outcome.total, 14);
        assert_eq!(outcome.dice.len(), 2);
    }

    #[test]
    fn test_drop_lowest_ties_by_roll_order() {
        let outcome = roll("3d10dl", &[5, 5, 9]).unwrap();
        assert_eq!(outcome.total, 14);
        assert!(!outcome.dice[0].active);
        assert!(outcome.dice[1].active);
    }

    #[test]
    fn test_keep_highest() {
        let outcome = roll("3d10kh", &[8, 3, 8]).unwrap();
        assert_eq!(outcome.total, 8);
        assert!(outcome.dice[0].active);
        assert!(!outcome.dice[2].active);
    }

    #[test]
    fn test_min_and_max_clamp() {
        let outcome = roll("2d10min3", &[1, 7]).unwrap();
        assert_eq!(outcome.total, 10);
        assert_eq!(outcome.dice[0].result, 1);
        assert_eq!(outcome.dice[0].value, 3);

        let outcome = roll("2d10max7", &[10, 2]).unwrap();
        assert_eq!(outcome.total, 9);
    }

    #[test]
    fn test_division_floors() {
        assert_eq!(roll("7/2", &[]).unwrap().total, 3);
        assert_eq!(roll("-7/2", &[]).unwrap().total, -4);
        assert_eq!(roll("(1d10)/2", &[9]).unwrap().total, 4);
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(
            roll("4/0", &[]),
            Err(EngineError::MalformedFormula { .. })
        ));
    }

    #[test]
    fn test_unresolved_symbol() {
        let err = roll("1d10+SB", &[4]).unwrap_err();
        assert!(err.to_string().contains("SB"));
    }

    #[test]
    fn test_zero_faces_rejected() {
        assert!(roll("1d0", &[]).is_err());
    }
}
