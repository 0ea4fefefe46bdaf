// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Privilege model used to decide, before touching anything, whether the
//! administrative session may perform a bootstrap.
//!
//! Resources follow the server's matching rules: an empty database or
//! collection name in a granted resource is a wildcard, `anyResource` covers
//! everything and `cluster` covers only cluster-wide actions.

use std::{
	collections::BTreeSet,
	fmt::{Display, Formatter},
	str::FromStr,
};

use serde::{Deserialize, Serialize};

/// Privilege actions docinit cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
	CreateUser,
	GrantRole,
	ViewUser,
	CreateCollection,
	CreateIndex,
	ListCollections,
	ListIndexes,
	DropCollection,
	DropIndex,
	Find,
	Insert,
	Update,
	Remove,
}

impl Action {
	pub const ALL: [Action; 13] = [
		Action::CreateUser,
		Action::GrantRole,
		Action::ViewUser,
		Action::CreateCollection,
		Action::CreateIndex,
		Action::ListCollections,
		Action::ListIndexes,
		Action::DropCollection,
		Action::DropIndex,
		Action::Find,
		Action::Insert,
		Action::Update,
		Action::Remove,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			Action::CreateUser => "createUser",
			Action::GrantRole => "grantRole",
			Action::ViewUser => "viewUser",
			Action::CreateCollection => "createCollection",
			Action::CreateIndex => "createIndex",
			Action::ListCollections => "listCollections",
			Action::ListIndexes => "listIndexes",
			Action::DropCollection => "dropCollection",
			Action::DropIndex => "dropIndex",
			Action::Find => "find",
			Action::Insert => "insert",
			Action::Update => "update",
			Action::Remove => "remove",
		}
	}
}

impl Display for Action {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Action {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Action::ALL.into_iter().find(|a| a.as_str() == s).ok_or(())
	}
}

/// What a privilege applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
	AnyResource,
	Cluster,
	Namespace {
		database: String,
		collection: String,
	},
}

impl Resource {
	/// Database-level resource (empty collection).
	pub fn database(database: impl Into<String>) -> Self {
		Resource::Namespace {
			database: database.into(),
			collection: String::new(),
		}
	}

	pub fn collection(database: impl Into<String>, collection: impl Into<String>) -> Self {
		Resource::Namespace {
			database: database.into(),
			collection: collection.into(),
		}
	}

	/// Whether a privilege granted on `self` applies to `target`.
	pub fn covers(&self, target: &Resource) -> bool {
		match (self, target) {
			(Resource::AnyResource, _) => true,
			(Resource::Cluster, Resource::Cluster) => true,
			(
				Resource::Namespace {
					database,
					collection,
				},
				Resource::Namespace {
					database: target_database,
					collection: target_collection,
				},
			) => {
				(database.is_empty() || database == target_database)
					&& (collection.is_empty() || collection == target_collection)
			}
			_ => false,
		}
	}
}

impl Display for Resource {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Resource::AnyResource => f.write_str("any resource"),
			Resource::Cluster => f.write_str("cluster"),
			Resource::Namespace {
				database,
				collection,
			} if collection.is_empty() => write!(f, "database `{}`", database),
			Resource::Namespace {
				database,
				collection,
			} => write!(f, "collection `{}.{}`", database, collection),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Privilege {
	pub resource: Resource,
	pub actions: BTreeSet<Action>,
}

impl Privilege {
	pub fn new(resource: Resource, actions: impl IntoIterator<Item = Action>) -> Self {
		Self {
			resource,
			actions: actions.into_iter().collect(),
		}
	}

	pub fn allows(&self, action: Action, target: &Resource) -> bool {
		self.actions.contains(&action) && self.resource.covers(target)
	}
}

/// An authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
	pub name: String,
	pub database: String,
}

impl Principal {
	pub fn new(name: impl Into<String>, database: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			database: database.into(),
		}
	}
}

impl Display for Principal {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}@{}", self.name, self.database)
	}
}

/// Who the session is and what it may do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
	pub principals: Vec<Principal>,
	pub privileges: Vec<Privilege>,
}

impl ConnectionStatus {
	pub fn is_authenticated(&self) -> bool {
		!self.principals.is_empty()
	}

	pub fn allows(&self, action: Action, target: &Resource) -> bool {
		self.privileges.iter().any(|p| p.allows(action, target))
	}
}
