//! Critical hits from structure damage

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::config::config;
use crate::dice::DiceSource;

/// Number of critical hits a ship suffers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CriticalSeverity {
    #[default]
    None,
    Count(u32),
}

impl CriticalSeverity {
    pub fn count(self) -> u32 {
        match self {
            CriticalSeverity::None => 0,
            CriticalSeverity::Count(n) => n,
        }
    }
}

impl fmt::Display for CriticalSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriticalSeverity::None | CriticalSeverity::Count(0) => write!(f, "No Critical Hits"),
            CriticalSeverity::Count(1) => write!(f, "1 Critical Hit"),
            CriticalSeverity::Count(n) => write!(f, "{} Critical Hits", n),
        }
    }
}

/// Roll on the critical table
///
/// `2d6 + floor(input / divisor)`, then a band decides how many criticals.
pub fn roll_critical<D: DiceSource + ?Sized>(input: i32, dice: &mut D) -> CriticalSeverity {
    let divisor = config().critical_damage_divisor.max(1);
    let base = (dice.roll_die(6) + dice.roll_die(6)) as i32;
    let score = base + input.div_euclid(divisor);

    let severity = match score {
        ..=8 => CriticalSeverity::None,
        ..=10 => CriticalSeverity::Count(1),
        ..=12 => CriticalSeverity::Count(dice.roll_die(3) + 1),
        ..=14 => CriticalSeverity::Count(dice.roll_die(6) + 1),
        _ => CriticalSeverity::Count(dice.roll_die(6) + dice.roll_die(6) + 2),
    };

    tracing::debug!(input, score, %severity, "critical roll");
    severity
}
