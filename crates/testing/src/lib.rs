// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Test fixtures shared across the docinit crates.

pub mod tempdir;

use std::env;

use docinit_server::memory::{MemoryServer, MemorySession};
use docinit_type::{CredentialDef, Document, Mechanism, PasswordDigestor, Plan, RoleGrant, Secret};

/// Environment variable holding the URI of a disposable real server.
pub const MONGO_URI_ENV: &str = "DOCINIT_TEST_MONGO_URI";

/// URI of a real server to test against, if one was configured.
pub fn mongo_uri() -> Option<String> {
	env::var(MONGO_URI_ENV).ok().filter(|uri| !uri.trim().is_empty())
}

/// A fresh server with access control on and an authenticated root session.
pub fn fresh_server() -> (MemoryServer, MemorySession) {
	let server = MemoryServer::new().expect("memory server");
	let session = server.admin_session().expect("admin session");
	(server, session)
}

/// A session on `server` for a principal that may read and write `gtest` but
/// not administer users.
pub async fn unprivileged_session(server: &MemoryServer, admin: &MemorySession) -> MemorySession {
	use docinit_server::AdminSession;

	let credential = CredentialDef {
		name: "app".to_string(),
		secret: Secret::new("app"),
		roles: vec![RoleGrant::new("readWrite", "gtest")],
		mechanisms: vec![Mechanism::ScramSha256],
		digestor: PasswordDigestor::Server,
	};
	admin.create_credential("admin", &credential).await.expect("create unprivileged principal");
	server.session("admin", "app", &Secret::new("app")).expect("unprivileged session")
}

/// The default plan, pointed at `database`.
pub fn plan_for(database: &str) -> Plan {
	let mut plan = Plan::default();
	plan.database = database.to_string();
	for grant in &mut plan.credential.roles {
		grant.db = database.to_string();
	}
	plan
}

/// A database name no other test uses.
pub fn unique_database(prefix: &str) -> String {
	format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())[..32].to_string()
}

pub fn user(username: &str) -> Document {
	let mut document = Document::new();
	document.insert("username".to_string(), serde_json::Value::String(username.to_string()));
	document
}
