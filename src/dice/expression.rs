//! Typed dice expressions
//!
//! Damage and penetration formulas are parsed once into an [`Expr`] tree.
//! Weapon traits are applied as transforms on the tree, never by editing the
//! formula text.

use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, char, digit1},
    combinator::{all_consuming, map, map_res, opt, value},
    multi::many0,
    sequence::{delimited, pair, preceded},
    IResult, Parser,
};
use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};

/// Upper bound on dice in a single term
pub const MAX_DICE_PER_TERM: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    fn symbol(self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
        }
    }
}

/// Per-term dice modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiceModifier {
    /// Deactivate the n lowest dice
    DropLowest(u32),
    /// Keep only the n highest dice
    KeepHighest(u32),
    /// Raise every face below n to n
    Min(u32),
    /// Lower every face above n to n
    Max(u32),
}

impl fmt::Display for DiceModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiceModifier::DropLowest(1) => write!(f, "dl"),
            DiceModifier::DropLowest(n) => write!(f, "dl{}", n),
            DiceModifier::KeepHighest(1) => write!(f, "kh"),
            DiceModifier::KeepHighest(n) => write!(f, "kh{}", n),
            DiceModifier::Min(n) => write!(f, "min{}", n),
            DiceModifier::Max(n) => write!(f, "max{}", n),
        }
    }
}

/// `NdM` plus modifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceTerm {
    pub count: u32,
    pub faces: u32,
    pub modifiers: Vec<DiceModifier>,
}

impl DiceTerm {
    pub fn new(count: u32, faces: u32) -> Self {
        Self {
            count,
            faces,
            modifiers: Vec::new(),
        }
    }

    pub fn with_modifier(mut self, modifier: DiceModifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn has_drop_or_keep(&self) -> bool {
        self.modifiers.iter().any(|m| {
            matches!(
                m,
                DiceModifier::DropLowest(_) | DiceModifier::KeepHighest(_)
            )
        })
    }

    pub fn has_min(&self) -> bool {
        self.modifiers
            .iter()
            .any(|m| matches!(m, DiceModifier::Min(_)))
    }

    pub fn has_max(&self) -> bool {
        self.modifiers
            .iter()
            .any(|m| matches!(m, DiceModifier::Max(_)))
    }
}

impl fmt::Display for DiceTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.faces)?;
        for modifier in &self.modifiers {
            write!(f, "{}", modifier)?;
        }
        Ok(())
    }
}

/// Parsed dice expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    Constant(i32),
    /// Unresolved attribute reference such as `SB` or `PR`
    Symbol(String),
    Dice(DiceTerm),
    Neg(Box<Expr>),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Group(Box<Expr>),
}

impl Expr {
    /// Parse a formula; whitespace is ignored
    pub fn parse(formula: &str) -> Result<Expr> {
        let compact: String = formula.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(EngineError::malformed(formula, "empty expression"));
        }

        let result = match all_consuming(expr).parse(compact.as_str()) {
            Ok((_, parsed)) => Ok(parsed),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(EngineError::malformed(
                formula,
                format!("unexpected input at '{}'", e.input),
            )),
            Err(nom::Err::Incomplete(_)) => {
                Err(EngineError::malformed(formula, "incomplete expression"))
            }
        };
        result
    }

    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// `self + n`, or `self` unchanged when n is zero
    pub fn plus(self, n: i32) -> Expr {
        if n == 0 {
            self
        } else {
            Expr::binary(BinOp::Add, self, Expr::Constant(n))
        }
    }

    /// `(self)`
    pub fn grouped(self) -> Expr {
        match self {
            Expr::Group(_) => self,
            other => Expr::Group(Box::new(other)),
        }
    }

    /// Any dice term anywhere in the tree carries `dl` or `kh`
    pub fn has_drop_or_keep(&self) -> bool {
        self.dice_terms().iter().any(|t| t.has_drop_or_keep())
    }

    pub fn contains_dice(&self) -> bool {
        !self.dice_terms().is_empty()
    }

    /// Dice terms in left-to-right order
    pub fn dice_terms(&self) -> Vec<&DiceTerm> {
        let mut terms = Vec::new();
        self.collect_dice(&mut terms);
        terms
    }

    fn collect_dice<'a>(&'a self, out: &mut Vec<&'a DiceTerm>) {
        match self {
            Expr::Dice(term) => out.push(term),
            Expr::Neg(inner) | Expr::Group(inner) => inner.collect_dice(out),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_dice(out);
                rhs.collect_dice(out);
            }
            Expr::Constant(_) | Expr::Symbol(_) => {}
        }
    }

    /// Leftmost dice term
    pub fn first_dice_mut(&mut self) -> Option<&mut DiceTerm> {
        match self {
            Expr::Dice(term) => Some(term),
            Expr::Neg(inner) | Expr::Group(inner) => inner.first_dice_mut(),
            Expr::Binary { lhs, rhs, .. } => match lhs.first_dice_mut() {
                Some(term) => Some(term),
                None => rhs.first_dice_mut(),
            },
            Expr::Constant(_) | Expr::Symbol(_) => None,
        }
    }

    /// Symbol names in left-to-right order
    pub fn symbols(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_symbols(&mut names);
        names
    }

    fn collect_symbols<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Symbol(name) => out.push(name),
            Expr::Neg(inner) | Expr::Group(inner) => inner.collect_symbols(out),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_symbols(out);
                rhs.collect_symbols(out);
            }
            Expr::Constant(_) | Expr::Dice(_) => {}
        }
    }

    /// Replace every symbol the lookup resolves with a constant
    ///
    /// Symbols the lookup does not know are left in place; evaluating them
    /// later is an error.
    pub fn substitute_symbols<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<i32>,
    {
        match self {
            Expr::Symbol(name) => {
                if let Some(resolved) = lookup(name) {
                    *self = Expr::Constant(resolved);
                }
            }
            Expr::Neg(inner) | Expr::Group(inner) => inner.substitute_symbols(lookup),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.substitute_symbols(lookup);
                rhs.substitute_symbols(lookup);
            }
            Expr::Constant(_) | Expr::Dice(_) => {}
        }
    }
}

impl FromStr for Expr {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Expr::parse(s)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant(n) => write!(f, "{}", n),
            Expr::Symbol(name) => write!(f, "{}", name),
            Expr::Dice(term) => write!(f, "{}", term),
            Expr::Neg(inner) => write!(f, "-{}", inner),
            Expr::Binary { op, lhs, rhs } => write!(f, "{}{}{}", lhs, op.symbol(), rhs),
            Expr::Group(inner) => write!(f, "({})", inner),
        }
    }
}

// === GRAMMAR ===

fn number(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |s: &str| s.parse::<u32>()).parse(input)
}

fn constant(input: &str) -> IResult<&str, i32> {
    map_res(digit1, |s: &str| s.parse::<i32>()).parse(input)
}

fn modifier(input: &str) -> IResult<&str, DiceModifier> {
    alt((
        map(preceded(tag("dl"), opt(number)), |n| {
            DiceModifier::DropLowest(n.unwrap_or(1))
        }),
        map(preceded(tag("kh"), opt(number)), |n| {
            DiceModifier::KeepHighest(n.unwrap_or(1))
        }),
        map(preceded(tag("min"), number), DiceModifier::Min),
        map(preceded(tag("max"), number), DiceModifier::Max),
    ))
    .parse(input)
}

fn dice(input: &str) -> IResult<&str, DiceTerm> {
    map(
        (opt(number), char('d'), number, many0(modifier)),
        |(count, _, faces, modifiers)| DiceTerm {
            count: count.unwrap_or(1),
            faces,
            modifiers,
        },
    )
    .parse(input)
}

fn atom(input: &str) -> IResult<&str, Expr> {
    alt((
        map(delimited(char('('), expr, char(')')), |inner| {
            Expr::Group(Box::new(inner))
        }),
        map(dice, Expr::Dice),
        map(constant, Expr::Constant),
        map(alpha1, |name: &str| Expr::Symbol(name.to_string())),
    ))
    .parse(input)
}

fn unary(input: &str) -> IResult<&str, Expr> {
    alt((
        map(preceded(char('-'), unary), |inner| Expr::Neg(Box::new(inner))),
        atom,
    ))
    .parse(input)
}

fn term(input: &str) -> IResult<&str, Expr> {
    let (input, first) = unary(input)?;
    let (input, rest) = many0(pair(
        alt((value(BinOp::Mul, char('*')), value(BinOp::Div, char('/')))),
        unary,
    ))
    .parse(input)?;
    let folded = rest
        .into_iter()
        .fold(first, |lhs, (op, rhs)| Expr::binary(op, lhs, rhs));
    Ok((input, folded))
}

fn expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = term(input)?;
    let (input, rest) = many0(pair(
        alt((value(BinOp::Add, char('+')), value(BinOp::Sub, char('-')))),
        term,
    ))
    .parse(input)?;
    let folded = rest
        .into_iter()
        .fold(first, |lhs, (op, rhs)| Expr::binary(op, lhs, rhs));
    Ok((input, folded))
}
