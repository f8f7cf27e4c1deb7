//! Combat reports and the presenters that publish them
//!
//! Resolution never formats anything itself. Finished outcomes are wrapped
//! in a [`CombatReport`] and handed to whichever [`Presenter`] the host
//! injects.

use std::io::Write;

use serde::Serialize;

use crate::battle::UnitOutcome;
use crate::combat::{AttackOutcome, WoundReport};
use crate::core::error::Result;
use crate::ship::{ShipOutcome, TurretOutcome};

/// A finished resolution, ready to show
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CombatReport {
    Attack(AttackOutcome),
    Unit(UnitOutcome),
    Ship(ShipOutcome),
    Turret(TurretOutcome),
    /// Wounds a personal attack inflicted on its defender
    Wounds(WoundReport),
    /// The weapon had no ammunition left
    EmptyClip { weapon: String },
}

/// Sink for combat reports
pub trait Presenter {
    fn publish(&mut self, report: &CombatReport) -> Result<()>;
}

/// Logs a one-line summary per report
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingPresenter;

impl Presenter for TracingPresenter {
    fn publish(&mut self, report: &CombatReport) -> Result<()> {
        match report {
            CombatReport::Attack(outcome) => tracing::info!(
                target_number = outcome.target,
                result = outcome.result,
                dos = outcome.dos,
                dof = outcome.dof,
                hits = outcome.number_of_hits,
                "attack"
            ),
            CombatReport::Unit(outcome) => tracing::info!(
                target_number = outcome.target,
                hits = outcome.number_of_hits,
                dealt = outcome.damage_dealt,
                brutals = outcome.brutals,
                "unit attack"
            ),
            CombatReport::Ship(outcome) => tracing::info!(
                target_number = outcome.target,
                hits = outcome.number_of_hits,
                shots = outcome.shots.len(),
                "ship attack"
            ),
            CombatReport::Turret(outcome) => tracing::info!(
                target_number = outcome.target,
                hits = outcome.turret_hits,
                "turret fire"
            ),
            CombatReport::Wounds(report) => tracing::info!(
                wounds = report.wounds,
                critical = report.critical_damage,
                "wounds applied"
            ),
            CombatReport::EmptyClip { weapon } => tracing::info!(weapon = %weapon, "empty clip"),
        }
        Ok(())
    }
}

/// Human-readable text
#[derive(Debug)]
pub struct TextPresenter<W: Write> {
    out: W,
}

impl<W: Write> TextPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_attack(&mut self, outcome: &AttackOutcome) -> Result<()> {
        let verdict = if outcome.is_jammed {
            "JAMMED".to_string()
        } else if outcome.is_success {
            format!("HIT with {} DoS", outcome.dos)
        } else {
            format!("MISS with {} DoF", outcome.dof)
        };
        writeln!(
            self.out,
            "Attack: rolled {} vs {}: {}",
            outcome.result, outcome.target, verdict
        )?;
        if outcome.is_overheated {
            writeln!(self.out, "  weapon overheats")?;
        }
        if let Some(psy) = &outcome.psy {
            writeln!(
                self.out,
                "  psy rating {}{}{}",
                psy.value,
                if psy.push { ", pushed" } else { "" },
                if psy.has_phenomena { ", phenomena!" } else { "" }
            )?;
        }
        for (i, damage) in outcome.damages.iter().enumerate() {
            write!(
                self.out,
                "  hit {}: {} damage ({}) to {}, pen {}",
                i + 1,
                damage.total,
                damage.formula,
                damage.location,
                damage.penetration
            )?;
            if damage.righteous_fury > 0 {
                write!(self.out, ", righteous fury {}", damage.righteous_fury)?;
            }
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn write_unit(&mut self, outcome: &UnitOutcome) -> Result<()> {
        writeln!(
            self.out,
            "Unit attack vs {}: {} hits from {} models",
            outcome.target,
            outcome.number_of_hits,
            outcome.models.len()
        )?;
        writeln!(
            self.out,
            "  damage dealt {}, brutal {}, crits {}",
            outcome.damage_dealt, outcome.brutals, outcome.crits
        )?;
        Ok(())
    }

    fn write_ship(&mut self, outcome: &ShipOutcome) -> Result<()> {
        writeln!(
            self.out,
            "Ship attack vs {}: {} hits",
            outcome.target, outcome.number_of_hits
        )?;
        if outcome.turret_hits > 0 || outcome.waves > 0 {
            writeln!(
                self.out,
                "  {} waves launched, {} shot down",
                outcome.waves, outcome.turret_hits
            )?;
        }
        for (i, shot) in outcome.shots.iter().enumerate() {
            write!(self.out, "  shot {}: rolled {}", i + 1, shot.result)?;
            match (shot.damage, shot.location) {
                (Some(damage), Some(location)) => {
                    write!(self.out, ", {} damage to {}", damage, location)?
                }
                (Some(damage), None) => write!(self.out, ", {} damage", damage)?,
                _ => write!(self.out, ", miss")?,
            }
            if let Some(critical) = shot.critical {
                write!(self.out, ", {}", critical)?;
            }
            writeln!(self.out)?;
        }
        Ok(())
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn publish(&mut self, report: &CombatReport) -> Result<()> {
        match report {
            CombatReport::Attack(outcome) => self.write_attack(outcome)?,
            CombatReport::Unit(outcome) => self.write_unit(outcome)?,
            CombatReport::Ship(outcome) => self.write_ship(outcome)?,
            CombatReport::Turret(outcome) => writeln!(
                self.out,
                "Turrets vs {}: {} of {} hit",
                outcome.target,
                outcome.turret_hits,
                outcome.results.len()
            )?,
            CombatReport::Wounds(report) => {
                for record in &report.records {
                    writeln!(
                        self.out,
                        "  {} {} to {}",
                        record.amount, record.source, record.location
                    )?;
                }
                writeln!(
                    self.out,
                    "Defender now at {} wounds, {} critical",
                    report.wounds, report.critical_damage
                )?
            }
            CombatReport::EmptyClip { weapon } => {
                writeln!(self.out, "{}: empty clip, reload!", weapon)?
            }
        }
        Ok(())
    }
}

/// One JSON document per line
#[derive(Debug)]
pub struct JsonPresenter<W: Write> {
    out: W,
    pretty: bool,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out, pretty: false }
    }

    pub fn pretty(out: W) -> Self {
        Self { out, pretty: true }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn publish(&mut self, report: &CombatReport) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.out, report)?;
        } else {
            serde_json::to_writer(&mut self.out, report)?;
        }
        writeln!(self.out)?;
        Ok(())
    }
}

/// Keeps every report in memory
#[derive(Debug, Default, Clone)]
pub struct RecordingPresenter {
    pub reports: Vec<CombatReport>,
}

impl Presenter for RecordingPresenter {
    fn publish(&mut self, report: &CombatReport) -> Result<()> {
        self.reports.push(report.clone());
        Ok(())
    }
}
