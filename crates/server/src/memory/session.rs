// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use async_trait::async_trait;
use docinit_collation::Comparator;
use docinit_type::{
	Action, Collation, CollectionDef, CollectionInfo, ConnectionStatus, CredentialDef, CredentialInfo, Document, Error,
	IndexDef, IndexInfo, IndexKey, ObjectKind, Principal, Privilege, Resource, Result,
};
use parking_lot::Mutex;
use tracing::{debug, instrument};

use super::{
	role,
	state::{self, ID_FIELD, State, StoredCollection, StoredUser},
};
use crate::{AdminSession, Outcome};

/// A session against a [`super::MemoryServer`], optionally authenticated.
///
/// Privileges are resolved from the principal's roles on every command, so
/// grants made after the session was opened are honored.
#[derive(Clone)]
pub struct MemorySession {
	state: Arc<Mutex<State>>,
	principal: Option<Principal>,
}

impl MemorySession {
	pub(crate) fn new(state: Arc<Mutex<State>>, principal: Option<Principal>) -> Self {
		Self {
			state,
			principal,
		}
	}

	fn privileges(&self, state: &State) -> Vec<Privilege> {
		if !state.access_control {
			return vec![Privilege::new(Resource::AnyResource, Action::ALL)];
		}
		let Some(user) = self.principal.as_ref().and_then(|p| state.user(&p.database, &p.name)) else {
			return vec![];
		};
		user.roles.iter().filter_map(role::privileges).flatten().collect()
	}

	fn authorize(&self, state: &State, action: Action, target: Resource) -> Result<()> {
		if self.privileges(state).iter().any(|p| p.allows(action, &target)) {
			return Ok(());
		}
		let reason = match &self.principal {
			None => "command requires authentication".to_string(),
			Some(principal) => format!("not authorized: {} may not {} on {}", principal, action, target),
		};
		Err(Error::PermissionDenied {
			action: action.to_string(),
			resource: target.to_string(),
			reason: Some(reason),
		})
	}
}

fn rejected(operation: &str, code: i32, code_name: &str, message: impl Into<String>) -> Error {
	Error::Rejected {
		operation: operation.to_string(),
		code,
		code_name: code_name.to_string(),
		message: message.into(),
	}
}

fn constraint_violation(namespace: &str, index: &IndexInfo, duplicate: &Document) -> Error {
	Error::ConstraintViolation {
		namespace: namespace.to_string(),
		index: index.name.clone(),
		reason: state::duplicate_key_message(namespace, index, duplicate),
	}
}

#[async_trait]
impl AdminSession for MemorySession {
	async fn connection_status(&self) -> Result<ConnectionStatus> {
		let state = self.state.lock();
		let principals = self
			.principal
			.iter()
			.filter(|p| state.user(&p.database, &p.name).is_some())
			.cloned()
			.collect::<Vec<_>>();
		// without access control nobody is authenticated and nothing is listed
		let privileges = if principals.is_empty() {
			vec![]
		} else {
			self.privileges(&state)
		};
		Ok(ConnectionStatus {
			principals,
			privileges,
		})
	}

	#[instrument(name = "server::memory::create_credential", level = "debug", skip(self, credential), fields(name = %credential.name))]
	async fn create_credential(&self, database: &str, credential: &CredentialDef) -> Result<Outcome> {
		let mut state = self.state.lock();

		self.authorize(&state, Action::CreateUser, Resource::database(database))?;
		for grant in &credential.roles {
			self.authorize(&state, Action::GrantRole, Resource::database(grant.db.as_str()))?;
		}

		if credential.mechanisms.is_empty() {
			return Err(rejected("createUser", 2, "BadValue", "mechanisms field must not be empty"));
		}
		for grant in &credential.roles {
			if role::privileges(grant).is_none() {
				return Err(rejected("createUser", 31, "RoleNotFound", format!("Could not find role: {}", grant)));
			}
		}

		let key = (database.to_string(), credential.name.clone());
		if state.users.contains_key(&key) {
			let name = format!("{}@{}", credential.name, database);
			return Err(Error::AlreadyExists {
				kind: ObjectKind::Credential,
				reason: Some(format!("User \"{}\" already exists", name)),
				name,
			});
		}

		let digest = state::digest(&credential.secret)?;
		state.users.insert(
			key,
			StoredUser {
				roles: credential.roles.clone(),
				mechanisms: credential.mechanisms.clone(),
				digest,
			},
		);
		debug!(database, roles = credential.roles.len(), "credential stored");
		Ok(Outcome::Created)
	}

	#[instrument(name = "server::memory::create_collection", level = "debug", skip(self, collection), fields(name = %collection.name))]
	async fn create_collection(&self, database: &str, collection: &CollectionDef) -> Result<Outcome> {
		let mut state = self.state.lock();
		self.authorize(&state, Action::CreateCollection, Resource::collection(database, collection.name.as_str()))?;

		Comparator::new(collection.collation.as_ref())?;

		if state.collection(database, &collection.name).is_some() {
			let namespace = format!("{}.{}", database, collection.name);
			return Err(Error::AlreadyExists {
				kind: ObjectKind::Collection,
				reason: Some(format!("Collection already exists. NS: {}", namespace)),
				name: namespace,
			});
		}

		state.databases
			.entry(database.to_string())
			.or_default()
			.insert(collection.name.clone(), StoredCollection::new(collection.collation.clone()));
		Ok(Outcome::Created)
	}

	#[instrument(name = "server::memory::create_index", level = "debug", skip(self, index), fields(collection = %index.collection, field = %index.field))]
	async fn create_index(&self, database: &str, index: &IndexDef) -> Result<Outcome> {
		let mut state = self.state.lock();
		let target = Resource::collection(database, index.collection.as_str());
		self.authorize(&state, Action::CreateIndex, target.clone())?;
		if state.collection(database, &index.collection).is_none() {
			self.authorize(&state, Action::CreateCollection, target)?;
		}

		let namespace = index.namespace(database);
		// the collection is only created once the index is known to build
		let implicit;
		let collection = match state.collection(database, &index.collection) {
			Some(collection) => collection,
			None => {
				implicit = StoredCollection::new(None);
				&implicit
			}
		};

		let requested = IndexInfo {
			name: index.effective_name(),
			keys: vec![IndexKey {
				field: index.field.clone(),
				order: index.order,
			}],
			unique: index.unique,
			// an index without its own collation inherits the collection's
			collation: state::normalize(index.collation.clone().or_else(|| collection.collation.clone())),
		};
		let comparator = Comparator::new(requested.collation.as_ref())?;

		for existing in &collection.indexes {
			let same_key = existing.keys == requested.keys;
			let same_rule = Collation::same_rule(existing.collation.as_ref(), requested.collation.as_ref());
			let identical = same_key && same_rule && existing.unique == requested.unique;

			if existing.name == requested.name {
				if identical {
					return Ok(Outcome::Unchanged);
				}
				return Err(Error::AlreadyExists {
					kind: ObjectKind::Index,
					name: namespace_index(&namespace, &requested.name),
					reason: Some(format!(
						"An existing index has the same name as the requested index but different options: {}",
						existing.name
					)),
				});
			}
			if same_key && same_rule {
				return Err(Error::AlreadyExists {
					kind: ObjectKind::Index,
					name: namespace_index(&namespace, &requested.name),
					reason: Some(format!("Index already exists with a different name: {}", existing.name)),
				});
			}
		}

		if requested.unique {
			for (position, document) in collection.documents.iter().enumerate() {
				let key = state::index_key(&requested, document);
				let clash = collection.documents[position + 1..].iter().any(|other| {
					state::index_key(&requested, other)
						.iter()
						.zip(&key)
						.all(|(l, r)| comparator.values_equal(l, r))
				});
				if clash {
					return Err(constraint_violation(&namespace, &requested, document));
				}
			}
		}

		state.collection_or_create(database, &index.collection).indexes.push(requested);
		Ok(Outcome::Created)
	}

	#[instrument(name = "server::memory::insert", level = "trace", skip(self, document))]
	async fn insert(&self, database: &str, collection: &str, mut document: Document) -> Result<()> {
		let mut state = self.state.lock();
		self.authorize(&state, Action::Insert, Resource::collection(database, collection))?;

		let namespace = format!("{}.{}", database, collection);
		let stored = state.collection_or_create(database, collection);
		if !document.contains_key(ID_FIELD) {
			document.insert(ID_FIELD.to_string(), state::generate_id());
		}

		for index in stored.indexes.iter().filter(|i| i.unique) {
			let comparator = Comparator::new(index.collation.as_ref())?;
			if stored.find_duplicate(index, &document, &comparator).is_some() {
				return Err(constraint_violation(&namespace, index, &document));
			}
		}

		stored.documents.push(document);
		Ok(())
	}

	async fn find_credential(&self, database: &str, name: &str) -> Result<Option<CredentialInfo>> {
		let state = self.state.lock();
		self.authorize(&state, Action::ViewUser, Resource::database(database))?;
		Ok(state.credential_info(database, name))
	}

	async fn find_collection(&self, database: &str, name: &str) -> Result<Option<CollectionInfo>> {
		let state = self.state.lock();
		self.authorize(&state, Action::ListCollections, Resource::database(database))?;
		Ok(state.collection(database, name).map(|c| c.info(database, name)))
	}

	async fn list_indexes(&self, database: &str, collection: &str) -> Result<Vec<IndexInfo>> {
		let state = self.state.lock();
		self.authorize(&state, Action::ListIndexes, Resource::collection(database, collection))?;
		Ok(state.collection(database, collection).map(|c| c.indexes.clone()).unwrap_or_default())
	}
}

fn namespace_index(namespace: &str, index: &str) -> String {
	format!("{}.{}", namespace, index)
}
