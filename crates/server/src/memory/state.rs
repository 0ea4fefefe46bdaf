// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::BTreeMap;

use argon2::{
	Algorithm, Argon2, Params, Version,
	password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use docinit_collation::Comparator;
use docinit_type::{
	Collation, CollectionInfo, CredentialInfo, Document, Error, IndexInfo, IndexKey, IndexOrder, Mechanism,
	RoleGrant, Secret,
};
use serde_json::Value;
use uuid::Uuid;

pub(crate) const ID_FIELD: &str = "_id";
pub(crate) const ID_INDEX: &str = "_id_";

#[derive(Debug, Default)]
pub(crate) struct State {
	pub access_control: bool,
	/// Keyed by (authentication database, name).
	pub users: BTreeMap<(String, String), StoredUser>,
	pub databases: BTreeMap<String, BTreeMap<String, StoredCollection>>,
}

#[derive(Debug, Clone)]
pub(crate) struct StoredUser {
	pub roles: Vec<RoleGrant>,
	pub mechanisms: Vec<Mechanism>,
	pub digest: String,
}

#[derive(Debug, Clone)]
pub(crate) struct StoredCollection {
	pub collation: Option<Collation>,
	pub indexes: Vec<IndexInfo>,
	pub documents: Vec<Document>,
}

impl StoredCollection {
	pub fn new(collation: Option<Collation>) -> Self {
		let collation = normalize(collation);
		Self {
			indexes: vec![IndexInfo {
				name: ID_INDEX.to_string(),
				keys: vec![IndexKey {
					field: ID_FIELD.to_string(),
					order: IndexOrder::Ascending,
				}],
				unique: true,
				collation: collation.clone(),
			}],
			collation,
			documents: Vec::new(),
		}
	}

	pub fn info(&self, database: &str, name: &str) -> CollectionInfo {
		CollectionInfo {
			database: database.to_string(),
			name: name.to_string(),
			collation: self.collation.clone(),
		}
	}

	/// First stored document whose key for `index` equals the key of
	/// `document`, under the index collation.
	pub fn find_duplicate<'a>(
		&'a self,
		index: &IndexInfo,
		document: &Document,
		comparator: &Comparator,
	) -> Option<&'a Document> {
		let key = index_key(index, document);
		self.documents.iter().find(|existing| {
			index_key(index, existing).iter().zip(&key).all(|(l, r)| comparator.values_equal(l, r))
		})
	}
}

impl State {
	pub fn collection(&self, database: &str, name: &str) -> Option<&StoredCollection> {
		self.databases.get(database).and_then(|collections| collections.get(name))
	}

	/// Returns the collection, creating it with the simple collation when
	/// missing.
	pub fn collection_or_create(&mut self, database: &str, name: &str) -> &mut StoredCollection {
		self.databases
			.entry(database.to_string())
			.or_default()
			.entry(name.to_string())
			.or_insert_with(|| StoredCollection::new(None))
	}

	pub fn user(&self, database: &str, name: &str) -> Option<&StoredUser> {
		self.users.get(&(database.to_string(), name.to_string()))
	}

	pub fn credential_info(&self, database: &str, name: &str) -> Option<CredentialInfo> {
		self.user(database, name).map(|user| CredentialInfo {
			name: name.to_string(),
			database: database.to_string(),
			roles: user.roles.clone(),
			mechanisms: user.mechanisms.clone(),
		})
	}
}

/// `simple` is the same rule as no collation at all.
pub(crate) fn normalize(collation: Option<Collation>) -> Option<Collation> {
	collation.filter(|c| !c.is_simple())
}

/// Values of the index fields in `document`; a missing field indexes as
/// `null`.
pub(crate) fn index_key(index: &IndexInfo, document: &Document) -> Vec<Value> {
	index.keys.iter().map(|key| field_value(document, &key.field).cloned().unwrap_or(Value::Null)).collect()
}

/// Resolves a dotted path through nested objects.
pub(crate) fn field_value<'a>(document: &'a Document, path: &str) -> Option<&'a Value> {
	let mut segments = path.split('.');
	let mut current = document.get(segments.next()?)?;
	for segment in segments {
		current = current.as_object()?.get(segment)?;
	}
	Some(current)
}

pub(crate) fn duplicate_key_message(namespace: &str, index: &IndexInfo, document: &Document) -> String {
	let collation = match &index.collation {
		Some(collation) => format!(" collation: {}", collation.locale),
		None => String::new(),
	};
	let key = index
		.keys
		.iter()
		.map(|key| {
			let value = field_value(document, &key.field).cloned().unwrap_or(Value::Null);
			format!("{}: {}", key.field, value)
		})
		.collect::<Vec<_>>()
		.join(", ");
	format!(
		"E11000 duplicate key error collection: {} index: {}{} dup key: {{ {} }}",
		namespace, index.name, collation, key
	)
}

pub(crate) fn generate_id() -> Value {
	Value::String(Uuid::new_v4().simple().to_string())
}

// Light parameters; this server only lives inside one process.
fn hasher() -> docinit_type::Result<Argon2<'static>> {
	let params = Params::new(4096, 1, 1, None).map_err(|e| Error::invalid("argon2 parameters", e.to_string()))?;
	Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

pub(crate) fn digest(secret: &Secret) -> docinit_type::Result<String> {
	let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
		.map_err(|e| Error::invalid("credential salt", e.to_string()))?;
	let hash = hasher()?
		.hash_password(secret.expose().as_bytes(), &salt)
		.map_err(|e| Error::invalid("credential secret", e.to_string()))?;
	Ok(hash.to_string())
}

pub(crate) fn verify(secret: &Secret, digest: &str) -> bool {
	let Ok(hash) = PasswordHash::new(digest) else {
		return false;
	};
	hasher().map(|h| h.verify_password(secret.expose().as_bytes(), &hash).is_ok()).unwrap_or(false)
}
