//! Damage formula assembly
//!
//! Weapon traits become transforms on the parsed expression, applied in a
//! fixed order: tearing, proven, primitive, flat bonus, unstable, symbols.

use crate::combat::weapons::{AttributeBonus, WeaponTraits};
use crate::core::error::Result;
use crate::dice::{BinOp, DiceModifier, DiceSource, Expr};

/// Unstable weapons roll this die to see if damage halves or doubles
const UNSTABLE_FACES: u32 = 10;

/// Values available to formula symbols
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolTable<'a> {
    psy_rating: Option<i32>,
    bonuses: &'a [AttributeBonus],
}

impl<'a> SymbolTable<'a> {
    pub fn new(psy_rating: Option<i32>, bonuses: &'a [AttributeBonus]) -> Self {
        Self {
            psy_rating,
            bonuses,
        }
    }

    /// `PR` is the channelled psy rating; `<short>B` an attribute bonus
    pub fn resolve(&self, symbol: &str) -> Option<i32> {
        if symbol.eq_ignore_ascii_case("PR") {
            return self.psy_rating;
        }
        self.bonuses
            .iter()
            .find(|bonus| bonus.matches(symbol))
            .map(|bonus| bonus.value)
    }

    pub fn substitute(&self, expr: &mut Expr) {
        expr.substitute_symbols(&|symbol: &str| self.resolve(symbol));
    }
}

/// One extra die on the first dice term, lowest dropped
///
/// Formulas that already drop or keep dice are left alone, so applying it
/// twice changes nothing.
pub fn apply_tearing(expr: &mut Expr) {
    if expr.has_drop_or_keep() {
        return;
    }
    if let Some(term) = expr.first_dice_mut() {
        term.count += 1;
        term.modifiers.push(DiceModifier::DropLowest(1));
    }
}

/// Proven: dice on the first term never roll below `n`
pub fn apply_proven(expr: &mut Expr, n: u32) {
    if expr.dice_terms().iter().any(|t| t.has_min()) {
        return;
    }
    if let Some(term) = expr.first_dice_mut() {
        term.modifiers.push(DiceModifier::Min(n));
    }
}

/// Primitive: dice on the first term never roll above `n`
pub fn apply_primitive(expr: &mut Expr, n: u32) {
    if expr.dice_terms().iter().any(|t| t.has_max()) {
        return;
    }
    if let Some(term) = expr.first_dice_mut() {
        term.modifiers.push(DiceModifier::Max(n));
    }
}

/// Draw the unstable d10: a 1 halves the whole formula, a 10 doubles it
pub fn apply_unstable<D: DiceSource + ?Sized>(expr: Expr, dice: &mut D) -> Expr {
    match dice.roll_die(UNSTABLE_FACES) {
        1 => {
            tracing::debug!("unstable weapon halves damage");
            Expr::binary(BinOp::Div, expr.grouped(), Expr::Constant(2))
        }
        10 => {
            tracing::debug!("unstable weapon doubles damage");
            Expr::binary(BinOp::Mul, expr.grouped(), Expr::Constant(2))
        }
        _ => expr,
    }
}

/// Parse a base formula and apply tearing, proven, primitive and the flat bonus
pub fn assemble(formula: &str, traits: &WeaponTraits, damage_bonus: i32) -> Result<Expr> {
    let mut expr = Expr::parse(formula)?;
    if traits.tearing {
        apply_tearing(&mut expr);
    }
    if let Some(n) = traits.proven {
        apply_proven(&mut expr, n);
    }
    if let Some(n) = traits.primitive {
        apply_primitive(&mut expr, n);
    }
    Ok(expr.plus(damage_bonus))
}

/// Full personal damage formula; an absent formula deals 0
pub fn personal_damage<D: DiceSource + ?Sized>(
    formula: Option<&str>,
    traits: &WeaponTraits,
    damage_bonus: i32,
    symbols: &SymbolTable<'_>,
    dice: &mut D,
) -> Result<Expr> {
    let Some(formula) = formula else {
        return Ok(Expr::Constant(0));
    };

    let mut expr = assemble(formula, traits, damage_bonus)?;
    if traits.unstable {
        expr = apply_unstable(expr, dice);
    }
    symbols.substitute(&mut expr);
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;

    #[test]
    fn test_tearing_adds_die_and_drop() {
        let mut expr = Expr::parse("1d10").unwrap();
        apply_tearing(&mut expr);
        assert_eq!(expr.to_string(), "2d10dl");
    }

    #[test]
    fn test_tearing_idempotent() {
        let mut expr = Expr::parse("1d10+3").unwrap();
        apply_tearing(&mut expr);
        apply_tearing(&mut expr);
        assert_eq!(expr.to_string(), "2d10dl+3");
    }

    #[test]
    fn test_tearing_skips_keep_highest() {
        let mut expr = Expr::parse("3d10kh2").unwrap();
        apply_tearing(&mut expr);
        assert_eq!(expr.to_string(), "3d10kh2");
    }

    #[test]
    fn test_proven_and_primitive_once() {
        let mut expr = Expr::parse("2d10+1d5").unwrap();
        apply_proven(&mut expr, 3);
        apply_proven(&mut expr, 4);
        assert_eq!(expr.to_string(), "2d10min3+1d5");

        let mut expr = Expr::parse("1d10").unwrap();
        apply_primitive(&mut expr, 7);
        assert_eq!(expr.to_string(), "1d10max7");
    }

    #[test]
    fn test_assembly_order() {
        let traits = WeaponTraits {
            tearing: true,
            proven: Some(3),
            ..WeaponTraits::default()
        };
        let expr = assemble("1d10", &traits, 4).unwrap();
        assert_eq!(expr.to_string(), "2d10dlmin3+4");
    }

    #[test]
    fn test_unstable_halves_on_one() {
        let mut dice = ScriptedDice::new([1]);
        let expr = apply_unstable(Expr::parse("1d10+4").unwrap(), &mut dice);
        assert_eq!(expr.to_string(), "(1d10+4)/2");

        let mut dice = ScriptedDice::new([10]);
        let expr = apply_unstable(Expr::parse("1d10").unwrap(), &mut dice);
        assert_eq!(expr.to_string(), "(1d10)*2");

        let mut dice = ScriptedDice::new([6]);
        let expr = apply_unstable(Expr::parse("1d10").unwrap(), &mut dice);
        assert_eq!(expr.to_string(), "1d10");
    }

    #[test]
    fn test_symbols_substituted() {
        let bonuses = vec![AttributeBonus::new("S", 4), AttributeBonus::new("WP", 5)];
        let symbols = SymbolTable::new(Some(3), &bonuses);
        let mut dice = ScriptedDice::default();

        let expr = personal_damage(
            Some("1d10+sb+PR*2+WPB"),
            &WeaponTraits::default(),
            0,
            &symbols,
            &mut dice,
        )
        .unwrap();
        assert_eq!(expr.to_string(), "1d10+4+3*2+5");
    }

    #[test]
    fn test_absent_formula_is_zero() {
        let mut dice = ScriptedDice::default();
        let traits = WeaponTraits {
            unstable: true,
            ..WeaponTraits::default()
        };
        let expr = personal_damage(None, &traits, 5, &SymbolTable::default(), &mut dice).unwrap();
        assert_eq!(expr, Expr::Constant(0));
    }
}
