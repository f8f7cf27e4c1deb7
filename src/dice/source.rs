//! Dice sources: the only place randomness enters the engine
//!
//! Every pipeline draws through a [`DiceSource`]. Draw order is part of the
//! rules contract, so a scripted source reproduces a resolution exactly.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::dice::evaluate::{evaluate, RollOutcome};
use crate::dice::expression::Expr;

/// Uniform source of die faces
pub trait DiceSource {
    /// Roll one die, returning a face in `1..=faces`
    fn roll_die(&mut self, faces: u32) -> u32;

    /// Percentile roll
    fn d100(&mut self) -> u32 {
        self.roll_die(100)
    }

    /// Evaluate a parsed expression
    fn roll(&mut self, expr: &Expr) -> Result<RollOutcome> {
        evaluate(expr, self)
    }

    /// Parse and evaluate an expression string
    fn roll_str(&mut self, formula: &str) -> Result<RollOutcome> {
        let expr = Expr::parse(formula)?;
        evaluate(&expr, self)
    }
}

impl<D: DiceSource + ?Sized> DiceSource for &mut D {
    fn roll_die(&mut self, faces: u32) -> u32 {
        (**self).roll_die(faces)
    }
}

/// Production dice: ChaCha8 seeded for reproducibility
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: ChaCha8Rng,
    seed: u64,
}

impl SeededDice {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create dice with a random seed
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl DiceSource for SeededDice {
    fn roll_die(&mut self, faces: u32) -> u32 {
        if faces == 0 {
            return 0;
        }
        let face = self.rng.gen_range(1..=faces);
        tracing::trace!(faces, face, "die drawn");
        face
    }
}

/// Test dice: returns pre-set faces in order
///
/// # Panics
/// Panics when more dice are drawn than were scripted. A resolution that
/// draws an unexpected die is a broken test, not a recoverable state.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    faces: VecDeque<u32>,
}

impl ScriptedDice {
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
        }
    }

    /// Faces not yet drawn
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl DiceSource for ScriptedDice {
    fn roll_die(&mut self, faces: u32) -> u32 {
        match self.faces.pop_front() {
            Some(face) => {
                debug_assert!(
                    face >= 1 && face <= faces,
                    "scripted face {} does not fit a d{}",
                    face,
                    faces
                );
                face
            }
            None => panic!("dice script exhausted while rolling a d{}", faces),
        }
    }
}

/// A single recorded draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    pub faces: u32,
    pub face: u32,
}

/// Wraps any source and keeps a log of every draw for replay
#[derive(Debug, Clone)]
pub struct RecordingDice<D> {
    inner: D,
    draws: Vec<Draw>,
}

impl<D: DiceSource> RecordingDice<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            draws: Vec::new(),
        }
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    /// Script that replays the recorded draws
    pub fn replay(&self) -> ScriptedDice {
        ScriptedDice::new(self.draws.iter().map(|d| d.face))
    }

    pub fn into_inner(self) -> D {
        self.inner
    }
}

impl<D: DiceSource> DiceSource for RecordingDice<D> {
    fn roll_die(&mut self, faces: u32) -> u32 {
        let face = self.inner.roll_die(faces);
        self.draws.push(Draw { faces, face });
        face
    }
}
