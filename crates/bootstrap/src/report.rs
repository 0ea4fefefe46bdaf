// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	time::Duration,
};

use docinit_server::Outcome;
use serde::{Serialize, Serializer};

/// The three steps of a run, in the order they execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
	Credential,
	Collection,
	Index,
}

impl Step {
	pub const ALL: [Step; 3] = [Step::Credential, Step::Collection, Step::Index];
}

impl Display for Step {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Step::Credential => f.pad("create credential"),
			Step::Collection => f.pad("create collection"),
			Step::Index => f.pad("create index"),
		}
	}
}

fn as_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
	serializer.serialize_f64(elapsed.as_micros() as f64 / 1000.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
	pub step: Step,
	/// What the step acted on, e.g. `test@gtest` or `gtest.user`.
	pub target: String,
	pub outcome: Outcome,
	#[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
	pub elapsed: Duration,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
	pub database: String,
	pub steps: Vec<StepReport>,
	#[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
	pub elapsed: Duration,
}

impl Report {
	pub fn step(&self, step: Step) -> Option<&StepReport> {
		self.steps.iter().find(|s| s.step == step)
	}

	pub fn outcome(&self, step: Step) -> Option<Outcome> {
		self.step(step).map(|s| s.outcome)
	}

	/// Whether nothing had to be created.
	pub fn is_noop(&self) -> bool {
		self.steps.iter().all(|s| s.outcome == Outcome::Unchanged)
	}
}

impl Display for Report {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		for step in &self.steps {
			writeln!(f, "{:<18} {:<28} {:<9} {:>8.1?}", step.step, step.target, step.outcome, step.elapsed)?;
		}
		write!(f, "bootstrap of `{}` finished in {:.1?}", self.database, self.elapsed)
	}
}
