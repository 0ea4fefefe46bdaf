// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Administrative command documents.

use docinit_type::{Collation, CredentialDef, IndexDef, PasswordDigestor};
use mongodb::bson::{Bson, Document, doc};

pub(crate) fn collation(collation: &Collation) -> Document {
	doc! {
		"locale": collation.locale.as_str(),
		"strength": i32::from(collation.strength.level()),
	}
}

pub(crate) fn create_user(credential: &CredentialDef) -> Document {
	let roles = credential
		.roles
		.iter()
		.map(|grant| Bson::Document(doc! { "role": grant.role.as_str(), "db": grant.db.as_str() }))
		.collect::<Vec<_>>();
	let mechanisms = credential.mechanisms.iter().map(|m| Bson::String(m.as_str().to_string())).collect::<Vec<_>>();

	let digest_password = match credential.digestor {
		PasswordDigestor::Server => true,
	};

	doc! {
		"createUser": credential.name.as_str(),
		"pwd": credential.secret.expose(),
		"roles": roles,
		"mechanisms": mechanisms,
		"digestPassword": digest_password,
	}
}

pub(crate) fn create_collection(name: &str, collation: Option<&Collation>) -> Document {
	let mut command = doc! { "create": name };
	if let Some(c) = collation {
		command.insert("collation", self::collation(c));
	}
	command
}

pub(crate) fn create_indexes(index: &IndexDef) -> Document {
	let mut key = Document::new();
	key.insert(index.field.as_str(), index.order.as_i32());
	let mut spec = doc! {
		"key": key,
		"name": index.effective_name(),
		"unique": index.unique,
	};
	if let Some(c) = &index.collation {
		spec.insert("collation", collation(c));
	}
	doc! {
		"createIndexes": index.collection.as_str(),
		"indexes": [spec],
	}
}

pub(crate) fn users_info(name: &str, database: &str) -> Document {
	doc! {
		"usersInfo": { "user": name, "db": database },
		"showCredentials": false,
	}
}

pub(crate) fn list_collections(name: &str) -> Document {
	doc! {
		"listCollections": 1,
		"filter": { "name": name },
	}
}

pub(crate) fn list_indexes(collection: &str) -> Document {
	doc! { "listIndexes": collection }
}

pub(crate) fn connection_status() -> Document {
	doc! { "connectionStatus": 1, "showPrivileges": true }
}

pub(crate) fn drop_all_users() -> Document {
	doc! { "dropAllUsersFromDatabase": 1 }
}

pub(crate) fn drop_database() -> Document {
	doc! { "dropDatabase": 1 }
}

pub(crate) fn ping() -> Document {
	doc! { "ping": 1 }
}

#[cfg(test)]
mod tests {
	use docinit_type::{Mechanism, RoleGrant, Secret, Strength};

	use super::*;

	fn en_us() -> Collation {
		Collation::new("en_US", Strength::Secondary)
	}

	#[test]
	fn test_create_user_delegates_digest_to_server() {
		let credential = CredentialDef {
			name: "test".to_string(),
			secret: Secret::new("password"),
			roles: vec![RoleGrant::new("readWrite", "gtest")],
			mechanisms: vec![Mechanism::ScramSha1],
			digestor: PasswordDigestor::Server,
		};

		assert_eq!(
			create_user(&credential),
			doc! {
				"createUser": "test",
				"pwd": "password",
				"roles": [{ "role": "readWrite", "db": "gtest" }],
				"mechanisms": ["SCRAM-SHA-1"],
				"digestPassword": true,
			}
		);
	}

	#[test]
	fn test_create_collection_with_collation() {
		assert_eq!(
			create_collection("user", Some(&en_us())),
			doc! { "create": "user", "collation": { "locale": "en_US", "strength": 2 } }
		);
		assert_eq!(create_collection("user", None), doc! { "create": "user" });
	}

	#[test]
	fn test_create_indexes() {
		let index = IndexDef::unique("user", "username", Some(en_us()));
		assert_eq!(
			create_indexes(&index),
			doc! {
				"createIndexes": "user",
				"indexes": [{
					"key": { "username": 1 },
					"name": "username_1",
					"unique": true,
					"collation": { "locale": "en_US", "strength": 2 },
				}],
			}
		);
	}
}
