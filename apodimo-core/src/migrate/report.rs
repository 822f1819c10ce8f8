//! Per-entity outcomes aggregated into per-phase reports

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Phase;
use crate::Error;

/// What happened to a single entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    /// Written to the destination
    Created,
    /// A same-named destination entity already existed
    Skipped,
    /// Would have been written (dry run)
    Planned,
    /// Read from the source only
    Previewed,
}

/// A failed entity and the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub entity: String,
    pub error: String,
}

/// Entity names grouped by what happened to them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
    pub planned: Vec<String>,
    pub previewed: Vec<String>,
    pub failures: Vec<Failure>,
}

impl Outcome {
    /// Outcome holding a single entity result
    pub fn of(entity: impl Into<String>, result: Result<Disposition, Error>) -> Self {
        let mut outcome = Self::default();
        outcome.record(entity, result);
        outcome
    }

    /// Record an entity result, logging failures
    pub fn record(&mut self, entity: impl Into<String>, result: Result<Disposition, Error>) {
        let entity = entity.into();
        match result {
            Ok(Disposition::Created) => self.created.push(entity),
            Ok(Disposition::Skipped) => self.skipped.push(entity),
            Ok(Disposition::Planned) => self.planned.push(entity),
            Ok(Disposition::Previewed) => self.previewed.push(entity),
            Err(e) => self.fail(entity, &e),
        }
    }

    /// Record a failed entity
    pub fn fail(&mut self, entity: impl Into<String>, error: &Error) {
        let entity = entity.into();
        warn!(entity = %entity, error = %error, "Migration step failed");
        self.failures.push(Failure {
            entity,
            error: error.to_string(),
        });
    }

    /// Fold another outcome into this one
    pub fn merge(&mut self, other: Outcome) {
        self.created.extend(other.created);
        self.skipped.extend(other.skipped);
        self.planned.extend(other.planned);
        self.previewed.extend(other.previewed);
        self.failures.extend(other.failures);
    }

    /// Whether any entity failed
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Result of one migration phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseReport {
    pub phase: Phase,
    pub outcome: Outcome,
}

impl PhaseReport {
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            outcome: Outcome::default(),
        }
    }

    /// Report for a phase that could not list its parent entities
    pub fn aborted(phase: Phase, entity: impl Into<String>, error: &Error) -> Self {
        let mut report = Self::new(phase);
        report.outcome.fail(entity, error);
        report
    }

    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome.merge(outcome);
        self
    }
}

impl fmt::Display for PhaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = &self.outcome;
        write!(
            f,
            "{:<14} created {:>4}  skipped {:>4}  failed {:>4}",
            self.phase.as_str(),
            o.created.len(),
            o.skipped.len(),
            o.failures.len()
        )?;
        if !o.planned.is_empty() {
            write!(f, "  planned {:>4}", o.planned.len())?;
        }
        if !o.previewed.is_empty() {
            write!(f, "  previewed {:>4}", o.previewed.len())?;
        }
        Ok(())
    }
}

/// Reports of every phase that ran, in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    pub phases: Vec<PhaseReport>,
}

impl MigrationReport {
    /// Whether any entity in any phase failed
    pub fn has_failures(&self) -> bool {
        self.phases.iter().any(|p| p.outcome.has_failures())
    }

    /// All failures tagged with their phase
    pub fn failures(&self) -> impl Iterator<Item = (Phase, &Failure)> {
        self.phases
            .iter()
            .flat_map(|p| p.outcome.failures.iter().map(move |f| (p.phase, f)))
    }

    /// Report of one phase, if it ran
    pub fn phase(&self, phase: Phase) -> Option<&PhaseReport> {
        self.phases.iter().find(|p| p.phase == phase)
    }
}
