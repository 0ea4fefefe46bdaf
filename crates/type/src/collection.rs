// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};

use crate::Collation;

/// A collection to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDef {
	pub name: String,
	#[serde(default)]
	pub collation: Option<Collation>,
}

impl CollectionDef {
	pub fn new(name: impl Into<String>, collation: Option<Collation>) -> Self {
		Self {
			name: name.into(),
			collation,
		}
	}
}

/// A collection as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
	pub database: String,
	pub name: String,
	pub collation: Option<Collation>,
}

impl CollectionInfo {
	pub fn matches(&self, def: &CollectionDef) -> bool {
		self.name == def.name && Collation::same_rule(self.collation.as_ref(), def.collation.as_ref())
	}
}
