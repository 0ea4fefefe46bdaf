// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Instant;

use docinit_collation::Comparator;
use docinit_server::{AdminSession, Outcome};
use docinit_type::{ErrorKind, ExistingCredential, Plan, Result};
use tracing::{info, instrument, warn};

use crate::{
	Report, Step, StepReport, preflight,
	verify::{self, Verification},
};

/// Applies a [`Plan`] through an [`AdminSession`].
///
/// A run performs the preflight, then creates the credential, the collection
/// and the unique index in that order. The first error ends the run; whatever
/// earlier steps created stays in place.
#[derive(Debug, Clone)]
pub struct Bootstrapper {
	plan: Plan,
}

impl Bootstrapper {
	/// Validates the plan, including that every collation names a locale the
	/// collation engine knows.
	pub fn new(plan: Plan) -> Result<Self> {
		plan.validate()?;
		Comparator::new(plan.collection.collation.as_ref())?;
		Comparator::new(plan.index.collation.as_ref())?;
		Ok(Self {
			plan,
		})
	}

	pub fn plan(&self) -> &Plan {
		&self.plan
	}

	#[instrument(name = "bootstrap::run", level = "info", skip_all, fields(database = %self.plan.database))]
	pub async fn run<S: AdminSession + ?Sized>(&self, session: &S) -> Result<Report> {
		let started = Instant::now();
		preflight::check(session, &self.plan).await?;

		let mut steps = Vec::with_capacity(Step::ALL.len());
		for step in Step::ALL {
			let step_started = Instant::now();
			let result = match step {
				Step::Credential => self.create_credential(session).await,
				Step::Collection => self.create_collection(session).await,
				Step::Index => self.create_index(session).await,
			};
			let outcome = result.inspect_err(|err| {
				warn!(%step, object = %self.target(step), kind = ?err.kind(), "step failed, aborting run");
			})?;

			let report = StepReport {
				step,
				target: self.target(step),
				outcome,
				elapsed: step_started.elapsed(),
			};
			info!(%step, object = %report.target, %outcome, elapsed = ?report.elapsed, "step finished");
			steps.push(report);
		}

		Ok(Report {
			database: self.plan.database.clone(),
			steps,
			elapsed: started.elapsed(),
		})
	}

	/// Read-only check of what a run would have created.
	#[instrument(name = "bootstrap::verify", level = "info", skip_all, fields(database = %self.plan.database))]
	pub async fn verify<S: AdminSession + ?Sized>(&self, session: &S) -> Result<Verification> {
		let plan = &self.plan;
		let credential = session.find_credential(&plan.database, &plan.credential.name).await?;
		let collection = session.find_collection(&plan.database, &plan.collection.name).await?;
		let indexes = session.list_indexes(&plan.database, &plan.index.collection).await?;

		Ok(Verification {
			credential: verify::check_credential(plan, credential),
			collection: verify::check_collection(plan, collection),
			index: verify::check_index(plan, &indexes),
		})
	}

	fn target(&self, step: Step) -> String {
		let plan = &self.plan;
		match step {
			Step::Credential => format!("{}@{}", plan.credential.name, plan.database),
			Step::Collection => format!("{}.{}", plan.database, plan.collection.name),
			Step::Index => format!("{}.{}", plan.index.namespace(&plan.database), plan.index.effective_name()),
		}
	}

	async fn create_credential<S: AdminSession + ?Sized>(&self, session: &S) -> Result<Outcome> {
		match session.create_credential(&self.plan.database, &self.plan.credential).await {
			Err(err)
				if err.kind() == ErrorKind::AlreadyExists
					&& self.plan.existing_credential == ExistingCredential::Keep =>
			{
				info!(name = %self.plan.credential.name, "keeping existing credential");
				Ok(Outcome::Unchanged)
			}
			result => result,
		}
	}

	async fn create_collection<S: AdminSession + ?Sized>(&self, session: &S) -> Result<Outcome> {
		let plan = &self.plan;
		match session.create_collection(&plan.database, &plan.collection).await {
			Err(err) if err.kind() == ErrorKind::AlreadyExists => {
				// an existing collection with the same rule is what we wanted
				match session.find_collection(&plan.database, &plan.collection.name).await {
					Ok(Some(existing)) if existing.matches(&plan.collection) => Ok(Outcome::Unchanged),
					_ => Err(err),
				}
			}
			result => result,
		}
	}

	async fn create_index<S: AdminSession + ?Sized>(&self, session: &S) -> Result<Outcome> {
		session.create_index(&self.plan.database, &self.plan.index).await
	}
}
