//! Penetration rolls and razor-sharp escalation
//!
//! Older weapon data bakes razor sharp into the formula as `X(Y)`: X is
//! the normal value and Y the value on a strong hit.

use crate::combat::formula::SymbolTable;
use crate::core::config::config;
use crate::core::error::Result;
use crate::dice::{DiceSource, Expr};

/// A parsed penetration formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PenetrationFormula {
    Plain(Expr),
    /// `X(Y)`: Y replaces the whole formula on a strong hit
    Legacy { base: Expr, razor: Expr },
}

impl PenetrationFormula {
    pub fn parse(formula: &str) -> Result<Self> {
        match split_legacy(formula) {
            Some((base, razor)) => Ok(PenetrationFormula::Legacy {
                base: Expr::parse(base)?,
                razor: Expr::parse(razor)?,
            }),
            None => Ok(PenetrationFormula::Plain(Expr::parse(formula)?)),
        }
    }
}

/// Split `X(Y)` where Y is a bare integer and X does not end in an operator
fn split_legacy(formula: &str) -> Option<(&str, &str)> {
    let trimmed = formula.trim();
    let inner_end = trimmed.strip_suffix(')')?;
    let open = inner_end.rfind('(')?;
    let (base, razor) = (inner_end[..open].trim(), inner_end[open + 1..].trim());

    let base_ends_cleanly = base
        .chars()
        .last()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == ')');
    let razor_is_number = !razor.is_empty() && razor.chars().all(|c| c.is_ascii_digit());

    (base_ends_cleanly && razor_is_number).then_some((base, razor))
}

/// Roll penetration for a hit with `dos` degrees of success
///
/// An absent formula is 0. Symbols are substituted before rolling. Razor
/// sharp never doubles a formula with parentheses in it.
pub fn roll_penetration<D: DiceSource + ?Sized>(
    formula: Option<&str>,
    dos: u32,
    razor_sharp: bool,
    symbols: &SymbolTable<'_>,
    dice: &mut D,
) -> Result<i32> {
    let Some(formula) = formula else {
        return Ok(0);
    };
    let strong_hit = dos >= config().razor_sharp_dos;
    let grouped = formula.contains('(');

    let (mut expr, multiplier) = match PenetrationFormula::parse(formula)? {
        PenetrationFormula::Legacy { razor, .. } if strong_hit => (razor, 1),
        PenetrationFormula::Legacy { base, .. } => (base, 1),
        PenetrationFormula::Plain(expr) if razor_sharp && strong_hit && !grouped => (expr, 2),
        PenetrationFormula::Plain(expr) => (expr, 1),
    };
    symbols.substitute(&mut expr);

    let rolled = dice.roll(&expr)?.total;
    Ok(rolled * multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;

    fn roll(formula: &str, dos: u32, razor_sharp: bool) -> i32 {
        let mut dice = ScriptedDice::default();
        roll_penetration(Some(formula), dos, razor_sharp, &SymbolTable::default(), &mut dice)
            .unwrap()
    }

    #[test]
    fn test_split_legacy() {
        assert_eq!(split_legacy("4(8)"), Some(("4", "8")));
        assert_eq!(split_legacy(" 2 ( 5 ) "), Some(("2", "5")));
        assert_eq!(split_legacy("(1d5)"), None);
        assert_eq!(split_legacy("2+(3)"), None);
        assert_eq!(split_legacy("4"), None);
    }

    #[test]
    fn test_legacy_switches_on_strong_hit() {
        assert_eq!(roll("4(8)", 2, false), 4);
        assert_eq!(roll("4(8)", 3, false), 8);
        // The legacy form already encodes razor sharp
        assert_eq!(roll("4(8)", 5, true), 8);
    }

    #[test]
    fn test_razor_sharp_doubles() {
        assert_eq!(roll("3", 2, true), 3);
        assert_eq!(roll("3", 3, true), 6);
        assert_eq!(roll("3", 3, false), 3);
    }

    #[test]
    fn test_razor_sharp_skips_grouped_formula() {
        assert_eq!(roll("(3)+2", 3, true), 5);
        assert_eq!(roll("3+2", 3, true), 10);
    }

    #[test]
    fn test_symbols_in_penetration() {
        let bonuses = vec![crate::combat::weapons::AttributeBonus::new("S", 3)];
        let symbols = SymbolTable::new(None, &bonuses);
        let mut dice = ScriptedDice::default();
        let pen = roll_penetration(Some("SB+1"), 1, false, &symbols, &mut dice).unwrap();
        assert_eq!(pen, 4);
    }

    #[test]
    fn test_absent_penetration() {
        let mut dice = ScriptedDice::default();
        let pen = roll_penetration(None, 4, true, &SymbolTable::default(), &mut dice).unwrap();
        assert_eq!(pen, 0);
    }
}
