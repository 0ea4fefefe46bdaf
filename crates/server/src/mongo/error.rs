// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Classification of driver errors into docinit errors.

use std::fmt::{Display, Formatter};

use docinit_type::{Action, Error, ObjectKind, Resource};
use mongodb::error::{ErrorKind as DriverErrorKind, WriteFailure};

/// What was being attempted when the server answered with an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Operation {
	Connect,
	CreateCredential {
		database: String,
		name: String,
	},
	CreateCollection {
		database: String,
		name: String,
	},
	CreateIndex {
		database: String,
		collection: String,
		name: String,
	},
	Insert {
		database: String,
		collection: String,
	},
	Inspect {
		command: &'static str,
		database: String,
	},
}

impl Operation {
	fn action(&self) -> Action {
		match self {
			Operation::Connect => Action::ListCollections,
			Operation::CreateCredential {
				..
			} => Action::CreateUser,
			Operation::CreateCollection {
				..
			} => Action::CreateCollection,
			Operation::CreateIndex {
				..
			} => Action::CreateIndex,
			Operation::Insert {
				..
			} => Action::Insert,
			Operation::Inspect {
				command,
				..
			} => match *command {
				"usersInfo" => Action::ViewUser,
				"listIndexes" => Action::ListIndexes,
				"dropDatabase" | "dropAllUsersFromDatabase" => Action::DropCollection,
				_ => Action::ListCollections,
			},
		}
	}

	fn resource(&self) -> Resource {
		match self {
			Operation::Connect => Resource::Cluster,
			Operation::CreateCredential {
				database,
				..
			}
			| Operation::Inspect {
				database,
				..
			} => Resource::database(database.as_str()),
			Operation::CreateCollection {
				database,
				name,
			} => Resource::collection(database.as_str(), name.as_str()),
			Operation::CreateIndex {
				database,
				collection,
				..
			}
			| Operation::Insert {
				database,
				collection,
			} => Resource::collection(database.as_str(), collection.as_str()),
		}
	}

	fn namespace(&self) -> String {
		match self.resource() {
			Resource::Namespace {
				database,
				collection,
			} if collection.is_empty() => database,
			Resource::Namespace {
				database,
				collection,
			} => format!("{}.{}", database, collection),
			other => other.to_string(),
		}
	}
}

impl Display for Operation {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Operation::Connect => f.write_str("connect"),
			Operation::CreateCredential {
				..
			} => f.write_str("createUser"),
			Operation::CreateCollection {
				..
			} => f.write_str("create"),
			Operation::CreateIndex {
				..
			} => f.write_str("createIndexes"),
			Operation::Insert {
				..
			} => f.write_str("insert"),
			Operation::Inspect {
				command,
				..
			} => f.write_str(command),
		}
	}
}

pub(crate) const UNAUTHORIZED: i32 = 13;
pub(crate) const AUTHENTICATION_FAILED: i32 = 18;
pub(crate) const NAMESPACE_NOT_FOUND: i32 = 26;
pub(crate) const NAMESPACE_EXISTS: i32 = 48;
pub(crate) const INDEX_OPTIONS_CONFLICT: i32 = 85;
pub(crate) const INDEX_KEY_SPECS_CONFLICT: i32 = 86;
pub(crate) const DUPLICATE_KEY: i32 = 11000;
pub(crate) const USER_ALREADY_EXISTS: i32 = 51003;

/// Codes the server uses when it cannot be reached or is not in a state to
/// serve: host unreachable, host not found, network timeout, shutdown in
/// progress, primary stepped down, socket exception.
const CONNECTION_CODES: [i32; 6] = [6, 7, 89, 91, 189, 9001];

/// Maps a server error code onto a docinit error for `operation`.
pub(crate) fn from_code(operation: &Operation, code: i32, code_name: &str, message: &str) -> Error {
	let reason = Some(message.to_string());
	match (code, operation) {
		(
			USER_ALREADY_EXISTS | DUPLICATE_KEY,
			Operation::CreateCredential {
				database,
				name,
			},
		) => Error::AlreadyExists {
			kind: ObjectKind::Credential,
			name: format!("{}@{}", name, database),
			reason,
		},
		(
			NAMESPACE_EXISTS,
			Operation::CreateCollection {
				..
			},
		) => Error::AlreadyExists {
			kind: ObjectKind::Collection,
			name: operation.namespace(),
			reason,
		},
		(
			INDEX_OPTIONS_CONFLICT | INDEX_KEY_SPECS_CONFLICT,
			Operation::CreateIndex {
				name,
				..
			},
		) => Error::AlreadyExists {
			kind: ObjectKind::Index,
			name: format!("{}.{}", operation.namespace(), name),
			reason,
		},
		(
			DUPLICATE_KEY,
			Operation::CreateIndex {
				name,
				..
			},
		) => Error::ConstraintViolation {
			namespace: operation.namespace(),
			index: name.clone(),
			reason: message.to_string(),
		},
		(
			DUPLICATE_KEY,
			Operation::Insert {
				..
			},
		) => Error::ConstraintViolation {
			namespace: operation.namespace(),
			index: duplicate_index_name(message).unwrap_or_else(|| "unknown".to_string()),
			reason: message.to_string(),
		},
		(UNAUTHORIZED, _) => Error::PermissionDenied {
			action: operation.action().to_string(),
			resource: operation.resource().to_string(),
			reason,
		},
		(AUTHENTICATION_FAILED, _) => Error::Authentication {
			message: message.to_string(),
		},
		(code, _) if CONNECTION_CODES.contains(&code) => Error::connection(format!("{} ({})", message, code_name)),
		_ => Error::Rejected {
			operation: operation.to_string(),
			code,
			code_name: code_name.to_string(),
			message: message.to_string(),
		},
	}
}

/// Classifies a driver error raised while performing `operation`.
pub(crate) fn classify(err: mongodb::error::Error, operation: &Operation) -> Error {
	match *err.kind {
		DriverErrorKind::Command(ref command) => {
			from_code(operation, command.code, &command.code_name, &command.message)
		}
		DriverErrorKind::Write(WriteFailure::WriteError(ref write)) => from_code(
			operation,
			write.code,
			write.code_name.as_deref().unwrap_or("WriteError"),
			&write.message,
		),
		DriverErrorKind::Write(WriteFailure::WriteConcernError(ref concern)) => {
			from_code(operation, concern.code, &concern.code_name, &concern.message)
		}
		DriverErrorKind::Authentication {
			ref message,
			..
		} => Error::Authentication {
			message: message.clone(),
		},
		DriverErrorKind::ServerSelection {
			ref message,
			..
		}
		| DriverErrorKind::ConnectionPoolCleared {
			ref message,
			..
		}
		| DriverErrorKind::DnsResolve {
			ref message,
			..
		} => Error::connection(message.clone()),
		DriverErrorKind::Io(ref io) => Error::connection(io.to_string()),
		DriverErrorKind::InvalidArgument {
			ref message,
			..
		} => Error::invalid("connection options", message.clone()),
		_ => Error::Rejected {
			operation: operation.to_string(),
			code: 0,
			code_name: "DriverError".to_string(),
			message: err.to_string(),
		},
	}
}

/// Extracts the index name from an `E11000 duplicate key error` message.
pub(crate) fn duplicate_index_name(message: &str) -> Option<String> {
	let rest = &message[message.find(" index: ")? + " index: ".len()..];
	let name = rest.split_whitespace().next()?;
	Some(name.to_string())
}

#[cfg(test)]
mod tests {
	use docinit_type::ErrorKind;

	use super::*;

	fn create_user() -> Operation {
		Operation::CreateCredential {
			database: "gtest".to_string(),
			name: "test".to_string(),
		}
	}

	fn create_index() -> Operation {
		Operation::CreateIndex {
			database: "gtest".to_string(),
			collection: "user".to_string(),
			name: "username_1".to_string(),
		}
	}

	#[test]
	fn test_existing_user() {
		let err = from_code(&create_user(), 51003, "Location51003", "User \"test@gtest\" already exists");
		assert_eq!(err.kind(), ErrorKind::AlreadyExists);
		assert_eq!(err.to_string(), "credential `test@gtest` already exists");

		// older servers report a duplicate key on admin.system.users
		let err = from_code(&create_user(), 11000, "DuplicateKey", "E11000 duplicate key error");
		assert_eq!(err.kind(), ErrorKind::AlreadyExists);
	}

	#[test]
	fn test_existing_collection() {
		let operation = Operation::CreateCollection {
			database: "gtest".to_string(),
			name: "user".to_string(),
		};
		let err = from_code(&operation, 48, "NamespaceExists", "Collection already exists. NS: gtest.user");
		assert_eq!(err.kind(), ErrorKind::AlreadyExists);
		assert_eq!(err.to_string(), "collection `gtest.user` already exists");
	}

	#[test]
	fn test_index_codes() {
		let err = from_code(&create_index(), 86, "IndexKeySpecsConflict", "conflict");
		assert_eq!(err.kind(), ErrorKind::AlreadyExists);
		assert_eq!(err.diagnostic().code, "INDEX_001");

		let err = from_code(&create_index(), 11000, "DuplicateKey", "E11000 duplicate key error");
		assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
	}

	#[test]
	fn test_duplicate_key_on_insert_names_the_index() {
		let operation = Operation::Insert {
			database: "gtest".to_string(),
			collection: "user".to_string(),
		};
		let message = r#"E11000 duplicate key error collection: gtest.user index: username_1 collation: en_US dup key: { username: "alice" }"#;
		match from_code(&operation, 11000, "DuplicateKey", message) {
			Error::ConstraintViolation {
				namespace,
				index,
				..
			} => {
				assert_eq!(namespace, "gtest.user");
				assert_eq!(index, "username_1");
			}
			other => panic!("unexpected error: {:?}", other),
		}
	}

	#[test]
	fn test_unauthorized_names_action_and_resource() {
		let err = from_code(&create_user(), 13, "Unauthorized", "not authorized on gtest to execute command");
		assert_eq!(err.kind(), ErrorKind::PermissionDenied);
		assert_eq!(err.to_string(), "permission denied: `createUser` on database `gtest`");
	}

	#[test]
	fn test_other_codes() {
		assert_eq!(from_code(&create_user(), 18, "AuthenticationFailed", "bad auth").kind(), ErrorKind::Authentication);
		assert_eq!(from_code(&Operation::Connect, 6, "HostUnreachable", "down").kind(), ErrorKind::Connection);
		let err = from_code(&create_user(), 31, "RoleNotFound", "Could not find role: readWrit@gtest");
		assert_eq!(err.kind(), ErrorKind::Rejected);
		assert_eq!(err.to_string(), "server rejected createUser: Could not find role: readWrit@gtest");
	}

	#[test]
	fn test_duplicate_index_name() {
		assert_eq!(duplicate_index_name("E11000 duplicate key error collection: a.b index: x_1 dup key"), Some("x_1".to_string()));
		assert_eq!(duplicate_index_name("something else"), None);
	}
}
