// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::Collation;

/// Key direction of an index field, serialized as `1` / `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum IndexOrder {
	#[default]
	Ascending,
	Descending,
}

impl IndexOrder {
	pub fn as_i32(self) -> i32 {
		match self {
			IndexOrder::Ascending => 1,
			IndexOrder::Descending => -1,
		}
	}
}

impl TryFrom<i32> for IndexOrder {
	type Error = String;

	fn try_from(value: i32) -> Result<Self, Self::Error> {
		match value {
			1 => Ok(IndexOrder::Ascending),
			-1 => Ok(IndexOrder::Descending),
			other => Err(format!("index order must be 1 or -1, got {}", other)),
		}
	}
}

impl From<IndexOrder> for i32 {
	fn from(order: IndexOrder) -> Self {
		order.as_i32()
	}
}

impl Display for IndexOrder {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_i32())
	}
}

/// A single-field index to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDef {
	pub collection: String,
	pub field: String,
	#[serde(default)]
	pub order: IndexOrder,
	#[serde(default = "default_unique")]
	pub unique: bool,
	#[serde(default)]
	pub collation: Option<Collation>,
	/// Explicit index name; derived from the key when absent.
	#[serde(default)]
	pub name: Option<String>,
}

fn default_unique() -> bool {
	true
}

impl IndexDef {
	pub fn unique(collection: impl Into<String>, field: impl Into<String>, collation: Option<Collation>) -> Self {
		Self {
			collection: collection.into(),
			field: field.into(),
			order: IndexOrder::Ascending,
			unique: true,
			collation,
			name: None,
		}
	}

	/// The name the server will know this index by, `<field>_<order>` unless
	/// one was given.
	pub fn effective_name(&self) -> String {
		self.name.clone().unwrap_or_else(|| format!("{}_{}", self.field, self.order))
	}

	pub fn namespace(&self, database: &str) -> String {
		format!("{}.{}", database, self.collection)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexKey {
	pub field: String,
	pub order: IndexOrder,
}

/// An index as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexInfo {
	pub name: String,
	pub keys: Vec<IndexKey>,
	pub unique: bool,
	pub collation: Option<Collation>,
}

impl IndexInfo {
	pub fn has_same_key(&self, def: &IndexDef) -> bool {
		matches!(self.keys.as_slice(), [key] if key.field == def.field && key.order == def.order)
	}

	/// Same key, same uniqueness, same comparison rule. The name is not part
	/// of the identity.
	pub fn matches(&self, def: &IndexDef) -> bool {
		self.has_same_key(def)
			&& self.unique == def.unique
			&& Collation::same_rule(self.collation.as_ref(), def.collation.as_ref())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Strength;

	#[test]
	fn test_effective_name_defaults_to_key() {
		let index = IndexDef::unique("user", "username", None);
		assert_eq!(index.effective_name(), "username_1");

		let mut descending = index.clone();
		descending.order = IndexOrder::Descending;
		assert_eq!(descending.effective_name(), "username_-1");

		let mut named = index;
		named.name = Some("by_username".to_string());
		assert_eq!(named.effective_name(), "by_username");
	}

	#[test]
	fn test_index_info_matches() {
		let collation = Collation::new("en_US", Strength::Secondary);
		let def = IndexDef::unique("user", "username", Some(collation.clone()));

		let info = IndexInfo {
			name: "whatever".to_string(),
			keys: vec![IndexKey {
				field: "username".to_string(),
				order: IndexOrder::Ascending,
			}],
			unique: true,
			collation: Some(collation),
		};
		assert!(info.matches(&def));

		let not_unique = IndexInfo {
			unique: false,
			..info.clone()
		};
		assert!(not_unique.has_same_key(&def));
		assert!(!not_unique.matches(&def));

		let binary = IndexInfo {
			collation: None,
			..info
		};
		assert!(!binary.matches(&def));
	}

	#[test]
	fn test_unique_defaults_to_true() {
		let def: IndexDef = serde_json::from_str(r#"{"collection":"user","field":"email"}"#).unwrap();
		assert!(def.unique);
		assert_eq!(def.order, IndexOrder::Ascending);
	}
}
