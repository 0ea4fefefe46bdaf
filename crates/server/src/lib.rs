// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The administrative session a bootstrap run talks through.
//!
//! [`AdminSession`] is the seam between the bootstrapper and a database
//! server. Two implementations ship with the crate:
//!
//! - [`mongo::MongoSession`] issues the server's administrative commands over
//!   the official driver (feature `mongo`, on by default);
//! - [`memory::MemoryServer`] is an in-process server with the same
//!   observable behavior for users, roles, collations and unique indexes.

#![cfg_attr(not(debug_assertions), deny(warnings))]

use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use docinit_type::{
	CollectionDef, CollectionInfo, ConnectionStatus, CredentialDef, CredentialInfo, Document, IndexDef, IndexInfo,
	Result,
};
use serde::{Deserialize, Serialize};

pub mod memory;
#[cfg(feature = "mongo")]
pub mod mongo;

/// Result of a create call that the server acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
	Created,
	/// An identical object was already in place.
	Unchanged,
}

impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Outcome::Created => f.pad("created"),
			Outcome::Unchanged => f.pad("unchanged"),
		}
	}
}

#[async_trait]
pub trait AdminSession: Send + Sync {
	/// Authenticated principals and their privileges.
	async fn connection_status(&self) -> Result<ConnectionStatus>;

	/// Registers a principal in `database`. The secret is sent in clear and
	/// digested by the server.
	async fn create_credential(&self, database: &str, credential: &CredentialDef) -> Result<Outcome>;

	/// Fails with `AlreadyExists` whenever the collection is already there;
	/// deciding whether that is acceptable is the caller's business.
	async fn create_collection(&self, database: &str, collection: &CollectionDef) -> Result<Outcome>;

	/// An identical existing index yields [`Outcome::Unchanged`]; a
	/// conflicting one fails with `AlreadyExists`.
	async fn create_index(&self, database: &str, index: &IndexDef) -> Result<Outcome>;

	async fn insert(&self, database: &str, collection: &str, document: Document) -> Result<()>;

	async fn find_credential(&self, database: &str, name: &str) -> Result<Option<CredentialInfo>>;

	async fn find_collection(&self, database: &str, name: &str) -> Result<Option<CollectionInfo>>;

	/// Empty when the collection does not exist.
	async fn list_indexes(&self, database: &str, collection: &str) -> Result<Vec<IndexInfo>>;
}
