// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Built-in roles of the in-memory server.

use docinit_type::{Action, Privilege, Resource, RoleGrant};

use super::ADMIN_DATABASE;

const READ: [Action; 3] = [Action::Find, Action::ListCollections, Action::ListIndexes];

const WRITE: [Action; 7] = [
	Action::Insert,
	Action::Update,
	Action::Remove,
	Action::CreateCollection,
	Action::CreateIndex,
	Action::DropCollection,
	Action::DropIndex,
];

const DB_ADMIN: [Action; 6] = [
	Action::ListCollections,
	Action::ListIndexes,
	Action::CreateCollection,
	Action::CreateIndex,
	Action::DropCollection,
	Action::DropIndex,
];

const USER_ADMIN: [Action; 3] = [Action::CreateUser, Action::GrantRole, Action::ViewUser];

/// Privileges a role grants, or `None` when no such role exists on that
/// database.
pub(crate) fn privileges(grant: &RoleGrant) -> Option<Vec<Privilege>> {
	let on_database = |actions: Vec<Action>| vec![Privilege::new(Resource::database(grant.db.as_str()), actions)];
	let on_every_database = |actions: Vec<Action>| vec![Privilege::new(Resource::database(""), actions)];
	let admin_only = grant.db == ADMIN_DATABASE;

	let privileges = match grant.role.as_str() {
		"read" => on_database(READ.to_vec()),
		"readWrite" => on_database(READ.iter().chain(WRITE.iter()).copied().collect()),
		"dbAdmin" => on_database(DB_ADMIN.to_vec()),
		"userAdmin" => on_database(USER_ADMIN.to_vec()),
		"dbOwner" => on_database(READ.iter().chain(WRITE.iter()).chain(USER_ADMIN.iter()).copied().collect()),
		"readAnyDatabase" if admin_only => on_every_database(READ.to_vec()),
		"readWriteAnyDatabase" if admin_only => {
			on_every_database(READ.iter().chain(WRITE.iter()).copied().collect())
		}
		"userAdminAnyDatabase" if admin_only => on_every_database(USER_ADMIN.to_vec()),
		"root" if admin_only => vec![Privilege::new(Resource::AnyResource, Action::ALL)],
		_ => return None,
	};
	Some(privileges)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_read_write_covers_collections_of_its_database() {
		let privileges = privileges(&RoleGrant::new("readWrite", "gtest")).unwrap();
		let allows = |action, target: &Resource| privileges.iter().any(|p| p.allows(action, target));

		assert!(allows(Action::Insert, &Resource::collection("gtest", "user")));
		assert!(allows(Action::CreateIndex, &Resource::collection("gtest", "user")));
		assert!(!allows(Action::CreateUser, &Resource::database("gtest")));
		assert!(!allows(Action::Insert, &Resource::collection("other", "user")));
	}

	#[test]
	fn test_any_database_roles_only_exist_on_admin() {
		assert!(privileges(&RoleGrant::new("root", "admin")).is_some());
		assert!(privileges(&RoleGrant::new("root", "gtest")).is_none());
		assert!(privileges(&RoleGrant::new("userAdminAnyDatabase", "gtest")).is_none());
	}

	#[test]
	fn test_unknown_role() {
		assert!(privileges(&RoleGrant::new("readWrit", "gtest")).is_none());
	}
}
