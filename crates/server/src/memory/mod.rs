// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! In-process document server.
//!
//! Keeps users, collections, indexes and documents behind one mutex and
//! enforces what the bootstrap depends on: role based privileges, collation
//! aware unique indexes, and secrets digested on the server side.

mod role;
mod session;
mod state;

use std::sync::Arc;

use docinit_type::{Error, Mechanism, Principal, RoleGrant, Secret};
use parking_lot::Mutex;
use tracing::instrument;

pub use self::session::MemorySession;
use self::state::{State, StoredUser};

pub const ADMIN_DATABASE: &str = "admin";
pub const DEFAULT_ADMIN: &str = "admin";

#[derive(Clone)]
pub struct MemoryServer(Arc<Mutex<State>>);

impl MemoryServer {
	/// A server with access control and one `root` principal `admin@admin`
	/// whose secret is `admin`.
	pub fn new() -> docinit_type::Result<Self> {
		Self::with_admin(DEFAULT_ADMIN, &Secret::new(DEFAULT_ADMIN))
	}

	#[instrument(name = "server::memory::new", level = "debug", skip(secret))]
	pub fn with_admin(name: &str, secret: &Secret) -> docinit_type::Result<Self> {
		let mut state = State {
			access_control: true,
			..State::default()
		};
		state.users.insert(
			(ADMIN_DATABASE.to_string(), name.to_string()),
			StoredUser {
				roles: vec![RoleGrant::new("root", ADMIN_DATABASE)],
				mechanisms: vec![Mechanism::ScramSha1, Mechanism::ScramSha256],
				digest: state::digest(secret)?,
			},
		);
		Ok(Self(Arc::new(Mutex::new(state))))
	}

	/// A server that lets every session do everything, like a server started
	/// without `--auth`.
	pub fn without_access_control() -> Self {
		Self(Arc::new(Mutex::new(State::default())))
	}

	/// Checks `secret` against the digest stored for `name` in `database`.
	pub fn authenticate(&self, database: &str, name: &str, secret: &Secret) -> docinit_type::Result<Principal> {
		let state = self.0.lock();
		match state.user(database, name) {
			Some(user) if state::verify(secret, &user.digest) => Ok(Principal::new(name, database)),
			_ => Err(Error::Authentication {
				message: format!("authentication of `{}@{}` failed", name, database),
			}),
		}
	}

	/// Opens a session authenticated as `name@database`.
	pub fn session(&self, database: &str, name: &str, secret: &Secret) -> docinit_type::Result<MemorySession> {
		let principal = self.authenticate(database, name, secret)?;
		Ok(MemorySession::new(self.0.clone(), Some(principal)))
	}

	/// Session of the default administrator created by [`MemoryServer::new`].
	pub fn admin_session(&self) -> docinit_type::Result<MemorySession> {
		self.session(ADMIN_DATABASE, DEFAULT_ADMIN, &Secret::new(DEFAULT_ADMIN))
	}

	pub fn anonymous_session(&self) -> MemorySession {
		MemorySession::new(self.0.clone(), None)
	}

	pub fn document_count(&self, database: &str, collection: &str) -> usize {
		self.0.lock().collection(database, collection).map(|c| c.documents.len()).unwrap_or(0)
	}

	pub fn collection_names(&self, database: &str) -> Vec<String> {
		self.0.lock().databases.get(database).map(|c| c.keys().cloned().collect()).unwrap_or_default()
	}

	pub fn credential_names(&self, database: &str) -> Vec<String> {
		self.0.lock().users.keys().filter(|(db, _)| db == database).map(|(_, name)| name.clone()).collect()
	}
}
