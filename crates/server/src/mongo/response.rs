// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Typed views over administrative command replies.

use std::str::FromStr;

use docinit_type::{
	Action, Collation, CollectionInfo, ConnectionStatus, CredentialInfo, Error, IndexInfo, IndexKey, IndexOrder,
	Mechanism, Principal, Privilege, Resource, RoleGrant, Strength,
};
use mongodb::bson::{Bson, Document, from_document};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

fn parse<T: DeserializeOwned>(reply: Document, command: &str) -> docinit_type::Result<T> {
	from_document(reply).map_err(|e| Error::Rejected {
		operation: command.to_string(),
		code: 0,
		code_name: "UnexpectedReply".to_string(),
		message: e.to_string(),
	})
}

#[derive(Debug, Deserialize)]
struct RawCollation {
	locale: String,
	#[serde(default)]
	strength: Option<i32>,
}

impl RawCollation {
	fn into_collation(self) -> docinit_type::Result<Collation> {
		let strength = match self.strength {
			None => Strength::default(),
			Some(level) => u8::try_from(level)
				.map_err(|e| e.to_string())
				.and_then(Strength::try_from)
				.map_err(|e| Error::invalid("collation reported by server", e))?,
		};
		Ok(Collation::new(self.locale, strength))
	}
}

fn collation(raw: Option<RawCollation>) -> docinit_type::Result<Option<Collation>> {
	raw.map(RawCollation::into_collation).transpose()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Cursor<T> {
	#[serde(default = "Vec::new")]
	first_batch: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct CursorReply<T> {
	cursor: Cursor<T>,
}

#[derive(Debug, Deserialize)]
struct RawRole {
	role: String,
	db: String,
}

#[derive(Debug, Deserialize)]
struct RawUser {
	user: String,
	db: String,
	#[serde(default)]
	roles: Vec<RawRole>,
	#[serde(default)]
	mechanisms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct UsersInfoReply {
	users: Vec<RawUser>,
}

pub(crate) fn users_info(reply: Document) -> docinit_type::Result<Option<CredentialInfo>> {
	let reply: UsersInfoReply = parse(reply, "usersInfo")?;
	Ok(reply.users.into_iter().next().map(|user| CredentialInfo {
		name: user.user,
		database: user.db,
		roles: user.roles.into_iter().map(|r| RoleGrant::new(r.role, r.db)).collect(),
		// mechanisms this build does not model are not reported
		mechanisms: user.mechanisms.iter().filter_map(|m| Mechanism::from_str(m).ok()).collect(),
	}))
}

#[derive(Debug, Default, Deserialize)]
struct RawCollectionOptions {
	#[serde(default)]
	collation: Option<RawCollation>,
}

#[derive(Debug, Deserialize)]
struct RawCollection {
	name: String,
	#[serde(default)]
	options: RawCollectionOptions,
}

pub(crate) fn list_collections(database: &str, reply: Document) -> docinit_type::Result<Option<CollectionInfo>> {
	let reply: CursorReply<RawCollection> = parse(reply, "listCollections")?;
	reply.cursor
		.first_batch
		.into_iter()
		.next()
		.map(|c| {
			Ok(CollectionInfo {
				database: database.to_string(),
				name: c.name,
				collation: collation(c.options.collation)?,
			})
		})
		.transpose()
}

#[derive(Debug, Deserialize)]
struct RawIndex {
	name: String,
	key: Document,
	#[serde(default)]
	unique: bool,
	#[serde(default)]
	collation: Option<RawCollation>,
}

fn key_order(value: &Bson) -> Option<IndexOrder> {
	let order = match value {
		Bson::Int32(v) => *v as i64,
		Bson::Int64(v) => *v,
		Bson::Double(v) => *v as i64,
		_ => return None,
	};
	match order {
		o if o > 0 => Some(IndexOrder::Ascending),
		o if o < 0 => Some(IndexOrder::Descending),
		_ => None,
	}
}

pub(crate) fn list_indexes(reply: Document) -> docinit_type::Result<Vec<IndexInfo>> {
	let reply: CursorReply<RawIndex> = parse(reply, "listIndexes")?;
	let mut indexes = Vec::with_capacity(reply.cursor.first_batch.len());
	for raw in reply.cursor.first_batch {
		let keys = raw
			.key
			.iter()
			.map(|(field, value)| {
				key_order(value).map(|order| IndexKey {
					field: field.clone(),
					order,
				})
			})
			.collect::<Option<Vec<_>>>();

		// text, hashed and geo indexes have no plain ordering
		let Some(keys) = keys else {
			debug!(index = %raw.name, "skipping special index");
			continue;
		};

		indexes.push(IndexInfo {
			name: raw.name,
			keys,
			unique: raw.unique,
			collation: collation(raw.collation)?,
		});
	}
	Ok(indexes)
}

const ANY_ACTION: &str = "anyAction";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResource {
	#[serde(default)]
	any_resource: bool,
	#[serde(default)]
	cluster: bool,
	#[serde(default)]
	db: Option<String>,
	#[serde(default)]
	collection: Option<String>,
}

impl RawResource {
	fn into_resource(self) -> Resource {
		if self.any_resource {
			Resource::AnyResource
		} else if self.cluster {
			Resource::Cluster
		} else {
			Resource::collection(self.db.unwrap_or_default(), self.collection.unwrap_or_default())
		}
	}
}

#[derive(Debug, Deserialize)]
struct RawPrivilege {
	resource: RawResource,
	#[serde(default)]
	actions: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAuthInfo {
	#[serde(default)]
	authenticated_users: Vec<RawPrincipal>,
	#[serde(default)]
	authenticated_user_privileges: Vec<RawPrivilege>,
}

#[derive(Debug, Deserialize)]
struct RawPrincipal {
	user: String,
	db: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionStatusReply {
	auth_info: RawAuthInfo,
}

pub(crate) fn connection_status(reply: Document) -> docinit_type::Result<ConnectionStatus> {
	let reply: ConnectionStatusReply = parse(reply, "connectionStatus")?;
	Ok(ConnectionStatus {
		principals: reply.auth_info.authenticated_users.into_iter().map(|u| Principal::new(u.user, u.db)).collect(),
		privileges: reply
			.auth_info
			.authenticated_user_privileges
			.into_iter()
			.map(|p| {
				let resource = p.resource.into_resource();
				if p.actions.iter().any(|a| a == ANY_ACTION) {
					return Privilege::new(resource, Action::ALL);
				}
				// only the actions this crate reasons about are kept
				Privilege::new(resource, p.actions.iter().filter_map(|a| Action::from_str(a).ok()))
			})
			.collect(),
	})
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateIndexesReply {
	#[serde(default)]
	pub num_indexes_before: Option<i32>,
	#[serde(default)]
	pub num_indexes_after: Option<i32>,
}

impl CreateIndexesReply {
	/// The server answers an identical request with unchanged counts.
	pub fn created(&self) -> bool {
		match (self.num_indexes_before, self.num_indexes_after) {
			(Some(before), Some(after)) => after > before,
			_ => true,
		}
	}
}

pub(crate) fn create_indexes(reply: Document) -> docinit_type::Result<CreateIndexesReply> {
	parse(reply, "createIndexes")
}

#[cfg(test)]
mod tests {
	use mongodb::bson::doc;

	use super::*;

	#[test]
	fn test_users_info() {
		let reply = doc! {
			"users": [{
				"_id": "gtest.test",
				"userId": "uuid",
				"user": "test",
				"db": "gtest",
				"roles": [{ "role": "readWrite", "db": "gtest" }],
				"mechanisms": ["SCRAM-SHA-1"],
			}],
			"ok": 1.0,
		};
		let info = users_info(reply).unwrap().unwrap();
		assert_eq!(info.name, "test");
		assert_eq!(info.database, "gtest");
		assert!(info.has_role(&RoleGrant::new("readWrite", "gtest")));
		assert_eq!(info.mechanisms, vec![Mechanism::ScramSha1]);

		assert!(users_info(doc! { "users": [], "ok": 1.0 }).unwrap().is_none());
	}

	#[test]
	fn test_list_collections_reads_collation() {
		let reply = doc! {
			"cursor": {
				"id": 0_i64,
				"ns": "gtest.$cmd.listCollections",
				"firstBatch": [{
					"name": "user",
					"type": "collection",
					"options": {
						"collation": {
							"locale": "en_US",
							"caseLevel": false,
							"caseFirst": "off",
							"strength": 2,
							"numericOrdering": false,
							"alternate": "non-ignorable",
							"maxVariable": "punct",
							"normalization": false,
							"backwards": false,
							"version": "57.1",
						}
					},
				}],
			},
			"ok": 1.0,
		};
		let info = list_collections("gtest", reply).unwrap().unwrap();
		assert_eq!(info.collation, Some(Collation::new("en_US", Strength::Secondary)));
	}

	#[test]
	fn test_list_indexes_skips_special_keys() {
		let reply = doc! {
			"cursor": {
				"id": 0_i64,
				"firstBatch": [
					{ "v": 2, "key": { "_id": 1 }, "name": "_id_" },
					{ "v": 2, "key": { "username": 1 }, "name": "username_1", "unique": true,
					  "collation": { "locale": "en_US", "strength": 2 } },
					{ "v": 2, "key": { "_fts": "text", "_ftsx": 1 }, "name": "bio_text" },
				],
			},
			"ok": 1.0,
		};
		let indexes = list_indexes(reply).unwrap();
		assert_eq!(indexes.len(), 2);
		assert_eq!(indexes[1].name, "username_1");
		assert!(indexes[1].unique);
		assert_eq!(indexes[1].collation, Some(Collation::new("en_US", Strength::Secondary)));
		assert!(!indexes[0].unique);
	}

	#[test]
	fn test_connection_status() {
		let reply = doc! {
			"authInfo": {
				"authenticatedUsers": [{ "user": "admin", "db": "admin" }],
				"authenticatedUserRoles": [{ "role": "root", "db": "admin" }],
				"authenticatedUserPrivileges": [
					{ "resource": { "anyResource": true }, "actions": ["anyAction"] },
					{ "resource": { "db": "", "collection": "" }, "actions": ["createUser", "insert", "bypassDocumentValidation"] },
					{ "resource": { "cluster": true }, "actions": ["shutdown"] },
				],
			},
			"ok": 1.0,
		};
		let status = connection_status(reply).unwrap();
		assert_eq!(status.principals, vec![Principal::new("admin", "admin")]);
		assert_eq!(status.privileges.len(), 3);
		assert_eq!(status.privileges[0], Privilege::new(Resource::AnyResource, Action::ALL));
		assert_eq!(status.privileges[1].actions.len(), 2);
		assert!(status.privileges[2].actions.is_empty());
		assert!(status.allows(Action::CreateIndex, &Resource::collection("gtest", "user")));
	}

	#[test]
	fn test_connection_status_without_auth() {
		let reply = doc! {
			"authInfo": { "authenticatedUsers": [], "authenticatedUserRoles": [] },
			"ok": 1.0,
		};
		assert!(!connection_status(reply).unwrap().is_authenticated());
	}

	#[test]
	fn test_create_indexes_counts() {
		let created = create_indexes(doc! { "numIndexesBefore": 1, "numIndexesAfter": 2, "ok": 1.0 }).unwrap();
		assert!(created.created());

		let unchanged = create_indexes(doc! {
			"numIndexesBefore": 2,
			"numIndexesAfter": 2,
			"note": "all indexes already exist",
			"ok": 1.0,
		})
		.unwrap();
		assert!(!unchanged.created());
	}
}
