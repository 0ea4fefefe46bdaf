// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use docinit_type::{Collation, CollectionInfo, CredentialInfo, IndexDef, IndexInfo, Plan};
use serde::Serialize;

use crate::Step;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "lowercase")]
pub enum Check {
	Present,
	Missing,
	Mismatch(String),
}

impl Check {
	pub fn is_present(&self) -> bool {
		matches!(self, Check::Present)
	}
}

impl Display for Check {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Check::Present => f.write_str("present"),
			Check::Missing => f.write_str("missing"),
			Check::Mismatch(reason) => write!(f, "mismatch: {}", reason),
		}
	}
}

/// State of the three planned objects on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verification {
	pub credential: Check,
	pub collection: Check,
	pub index: Check,
}

impl Verification {
	pub fn is_complete(&self) -> bool {
		self.checks().iter().all(|(_, check)| check.is_present())
	}

	pub fn checks(&self) -> [(Step, &Check); 3] {
		[(Step::Credential, &self.credential), (Step::Collection, &self.collection), (Step::Index, &self.index)]
	}
}

impl Display for Verification {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		for (step, check) in self.checks() {
			let object = match step {
				Step::Credential => "credential",
				Step::Collection => "collection",
				Step::Index => "index",
			};
			writeln!(f, "{:<11} {}", object, check)?;
		}
		Ok(())
	}
}

fn describe(collation: Option<&Collation>) -> String {
	collation.map(ToString::to_string).unwrap_or_else(|| Collation::SIMPLE_LOCALE.to_string())
}

pub(crate) fn check_credential(plan: &Plan, found: Option<CredentialInfo>) -> Check {
	let Some(info) = found else {
		return Check::Missing;
	};
	if let Some(grant) = plan.credential.roles.iter().find(|g| !info.has_role(g)) {
		return Check::Mismatch(format!("role {} is not granted", grant));
	}
	if let Some(mechanism) = plan.credential.mechanisms.iter().find(|m| !info.mechanisms.contains(m)) {
		return Check::Mismatch(format!("mechanism {} is not enabled", mechanism));
	}
	Check::Present
}

pub(crate) fn check_collection(plan: &Plan, found: Option<CollectionInfo>) -> Check {
	match found {
		None => Check::Missing,
		Some(info) if info.matches(&plan.collection) => Check::Present,
		Some(info) => Check::Mismatch(format!(
			"collation is {} instead of {}",
			describe(info.collation.as_ref()),
			describe(plan.collection.collation.as_ref())
		)),
	}
}

pub(crate) fn check_index(plan: &Plan, indexes: &[IndexInfo]) -> Check {
	// the server reports an index created without a collation with the
	// collection's default
	let planned = IndexDef {
		collation: plan.index.collation.clone().or_else(|| plan.collection.collation.clone()),
		..plan.index.clone()
	};

	if indexes.iter().any(|index| index.matches(&planned)) {
		return Check::Present;
	}
	match indexes.iter().find(|index| index.has_same_key(&planned)) {
		None => Check::Missing,
		Some(index) if index.unique != planned.unique => {
			Check::Mismatch(format!("index `{}` has unique = {}", index.name, index.unique))
		}
		Some(index) => Check::Mismatch(format!(
			"index `{}` uses collation {} instead of {}",
			index.name,
			describe(index.collation.as_ref()),
			describe(planned.collation.as_ref())
		)),
	}
}
