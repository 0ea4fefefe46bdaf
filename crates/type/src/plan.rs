// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};

use crate::{
	Collation, CollectionDef, CredentialDef, Error, IndexDef, IndexOrder, Mechanism, PasswordDigestor, RoleGrant,
	Secret, Strength,
};

/// What to do when the principal already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExistingCredential {
	/// Abort the run with `AlreadyExists`.
	#[default]
	Fail,
	/// Leave the existing principal untouched and continue.
	Keep,
}

pub const DEFAULT_DATABASE: &str = "gtest";
pub const DEFAULT_PRINCIPAL: &str = "test";
pub const DEFAULT_SECRET: &str = "password";
pub const DEFAULT_ROLE: &str = "readWrite";
pub const DEFAULT_COLLECTION: &str = "user";
pub const DEFAULT_FIELD: &str = "username";

fn default_collation() -> Collation {
	Collation::new("en_US", Strength::Secondary)
}

/// Everything one bootstrap run applies to a database.
///
/// Deserializes from a partial description: a key that is left out takes its
/// default relative to the rest of the plan. Roles default to
/// `readWrite` on the plan database, the index defaults to the plan
/// collection and inherits its collation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PlanFile")]
pub struct Plan {
	pub database: String,
	pub credential: CredentialDef,
	pub collection: CollectionDef,
	pub index: IndexDef,
	pub existing_credential: ExistingCredential,
}

impl Default for Plan {
	fn default() -> Self {
		Self::from(PlanFile::default())
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PlanFile {
	database: Option<String>,
	credential: CredentialFile,
	collection: CollectionFile,
	index: IndexFile,
	existing_credential: ExistingCredential,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CredentialFile {
	name: Option<String>,
	secret: Option<Secret>,
	roles: Option<Vec<RoleGrant>>,
	mechanisms: Option<Vec<Mechanism>>,
	digestor: PasswordDigestor,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CollectionFile {
	name: Option<String>,
	collation: Option<Collation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct IndexFile {
	collection: Option<String>,
	field: Option<String>,
	order: IndexOrder,
	unique: Option<bool>,
	collation: Option<Collation>,
	name: Option<String>,
}

impl From<PlanFile> for Plan {
	fn from(file: PlanFile) -> Self {
		let database = file.database.unwrap_or_else(|| DEFAULT_DATABASE.to_string());

		let credential = CredentialDef {
			name: file.credential.name.unwrap_or_else(|| DEFAULT_PRINCIPAL.to_string()),
			secret: file.credential.secret.unwrap_or_else(|| Secret::new(DEFAULT_SECRET)),
			roles: file.credential.roles.unwrap_or_else(|| vec![RoleGrant::new(DEFAULT_ROLE, database.clone())]),
			mechanisms: file.credential.mechanisms.unwrap_or_else(|| vec![Mechanism::ScramSha1]),
			digestor: file.credential.digestor,
		};

		let collection = CollectionDef::new(
			file.collection.name.unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
			Some(file.collection.collation.unwrap_or_else(default_collation)),
		);

		let index = IndexDef {
			collection: file.index.collection.unwrap_or_else(|| collection.name.clone()),
			field: file.index.field.unwrap_or_else(|| DEFAULT_FIELD.to_string()),
			order: file.index.order,
			unique: file.index.unique.unwrap_or(true),
			collation: file.index.collation.or_else(|| collection.collation.clone()),
			name: file.index.name,
		};

		Self {
			database,
			credential,
			collection,
			index,
			existing_credential: file.existing_credential,
		}
	}
}

impl Plan {
	pub fn validate(&self) -> crate::Result<()> {
		validate_database_name(&self.database)?;

		let credential = &self.credential;
		if credential.name.is_empty() {
			return Err(invalid("credential", "principal name must not be empty"));
		}
		if credential.secret.is_empty() {
			return Err(invalid("credential", format!("secret for `{}` must not be empty", credential.name)));
		}
		if credential.roles.is_empty() {
			return Err(invalid("credential", format!("`{}` must be granted at least one role", credential.name)));
		}
		for grant in &credential.roles {
			if grant.role.is_empty() {
				return Err(invalid("credential", "role name must not be empty"));
			}
			validate_database_name(&grant.db)?;
		}
		if credential.mechanisms.is_empty() {
			return Err(invalid(
				"credential",
				format!("`{}` must support at least one authentication mechanism", credential.name),
			));
		}

		validate_collection_name(&self.collection.name)?;

		let index = &self.index;
		if index.collection != self.collection.name {
			return Err(invalid(
				"index",
				format!(
					"index targets collection `{}` but the plan creates `{}`",
					index.collection, self.collection.name
				),
			));
		}
		if index.field.is_empty() || index.field.starts_with('$') {
			return Err(invalid("index", format!("`{}` is not a valid field path", index.field)));
		}
		if index.field.split('.').any(str::is_empty) {
			return Err(invalid("index", format!("`{}` contains an empty path segment", index.field)));
		}

		Ok(())
	}
}

fn validate_database_name(name: &str) -> crate::Result<()> {
	const FORBIDDEN: [char; 8] = ['/', '\\', '.', ' ', '"', '$', '*', '\0'];

	if name.is_empty() {
		return Err(invalid("database", "database name must not be empty"));
	}
	if name.len() >= 64 {
		return Err(invalid("database", format!("database name `{}` must be shorter than 64 bytes", name)));
	}
	if let Some(c) = name.chars().find(|c| FORBIDDEN.contains(c)) {
		return Err(invalid("database", format!("database name `{}` contains forbidden character {:?}", name, c)));
	}
	Ok(())
}

fn validate_collection_name(name: &str) -> crate::Result<()> {
	if name.is_empty() {
		return Err(invalid("collection", "collection name must not be empty"));
	}
	if name.contains('$') || name.contains('\0') {
		return Err(invalid("collection", format!("collection name `{}` contains a forbidden character", name)));
	}
	if name.starts_with("system.") {
		return Err(invalid("collection", format!("`{}` is in the reserved system namespace", name)));
	}
	Ok(())
}

fn invalid(subject: &str, message: impl Into<String>) -> Error {
	Error::Invalid {
		subject: subject.to_string(),
		message: message.into(),
	}
}
