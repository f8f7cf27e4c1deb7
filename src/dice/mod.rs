pub mod evaluate;
pub mod expression;
pub mod source;

pub use evaluate::{evaluate, DieResult, RollOutcome};
pub use expression::{BinOp, DiceModifier, DiceTerm, Expr};
pub use source::{DiceSource, Draw, RecordingDice, ScriptedDice, SeededDice};
