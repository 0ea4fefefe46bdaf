// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Debug, Display, Formatter},
	str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A credential secret. Never printed, never serialized in clear.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
	pub const REDACTED: &'static str = "***";

	pub fn new(secret: impl Into<String>) -> Self {
		Self(secret.into())
	}

	/// The clear-text secret, for handing to the server.
	pub fn expose(&self) -> &str {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "Secret({})", Self::REDACTED)
	}
}

impl Serialize for Secret {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(Self::REDACTED)
	}
}

impl<'de> Deserialize<'de> for Secret {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		String::deserialize(deserializer).map(Secret)
	}
}

/// Authentication mechanism a credential accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mechanism {
	#[serde(rename = "SCRAM-SHA-1")]
	ScramSha1,
	#[serde(rename = "SCRAM-SHA-256")]
	ScramSha256,
}

impl Mechanism {
	pub fn as_str(&self) -> &'static str {
		match self {
			Mechanism::ScramSha1 => "SCRAM-SHA-1",
			Mechanism::ScramSha256 => "SCRAM-SHA-256",
		}
	}
}

impl Display for Mechanism {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Mechanism {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"SCRAM-SHA-1" => Ok(Mechanism::ScramSha1),
			"SCRAM-SHA-256" => Ok(Mechanism::ScramSha256),
			other => Err(format!("unsupported authentication mechanism `{}`", other)),
		}
	}
}

/// Who computes the stored credential digest.
///
/// Only the server does: the clear secret travels over the administrative
/// session and the server derives what it stores, so stored credentials stay
/// compatible with the server's own authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordDigestor {
	#[default]
	Server,
}

/// A role granted on a database.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleGrant {
	pub role: String,
	pub db: String,
}

impl RoleGrant {
	pub fn new(role: impl Into<String>, db: impl Into<String>) -> Self {
		Self {
			role: role.into(),
			db: db.into(),
		}
	}
}

impl Display for RoleGrant {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}@{}", self.role, self.db)
	}
}

/// A principal to create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialDef {
	pub name: String,
	pub secret: Secret,
	pub roles: Vec<RoleGrant>,
	pub mechanisms: Vec<Mechanism>,
	#[serde(default)]
	pub digestor: PasswordDigestor,
}

/// A principal as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialInfo {
	pub name: String,
	pub database: String,
	pub roles: Vec<RoleGrant>,
	pub mechanisms: Vec<Mechanism>,
}

impl CredentialInfo {
	pub fn has_role(&self, grant: &RoleGrant) -> bool {
		self.roles.iter().any(|r| r == grant)
	}
}
