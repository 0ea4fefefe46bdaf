// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Comparison level of a collation.
///
/// Serialized as the numeric level the server understands (1 through 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Strength {
	/// Base letters only.
	Primary,
	/// Base letters and accents, case ignored.
	Secondary,
	/// Base letters, accents and case.
	#[default]
	Tertiary,
	Quaternary,
	Identical,
}

impl Strength {
	pub fn level(self) -> u8 {
		match self {
			Strength::Primary => 1,
			Strength::Secondary => 2,
			Strength::Tertiary => 3,
			Strength::Quaternary => 4,
			Strength::Identical => 5,
		}
	}
}

impl TryFrom<u8> for Strength {
	type Error = String;

	fn try_from(level: u8) -> Result<Self, Self::Error> {
		match level {
			1 => Ok(Strength::Primary),
			2 => Ok(Strength::Secondary),
			3 => Ok(Strength::Tertiary),
			4 => Ok(Strength::Quaternary),
			5 => Ok(Strength::Identical),
			other => Err(format!("collation strength must be between 1 and 5, got {}", other)),
		}
	}
}

impl From<Strength> for u8 {
	fn from(strength: Strength) -> Self {
		strength.level()
	}
}

impl Display for Strength {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.level())
	}
}

/// A locale-aware string comparison rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Collation {
	pub locale: String,
	#[serde(default)]
	pub strength: Strength,
}

impl Collation {
	/// Locale name the server reserves for plain binary comparison.
	pub const SIMPLE_LOCALE: &'static str = "simple";

	pub fn new(locale: impl Into<String>, strength: Strength) -> Self {
		Self {
			locale: locale.into(),
			strength,
		}
	}

	pub fn simple() -> Self {
		Self::new(Self::SIMPLE_LOCALE, Strength::default())
	}

	pub fn is_simple(&self) -> bool {
		self.locale == Self::SIMPLE_LOCALE
	}

	/// Whether two rules compare strings identically.
	///
	/// An absent rule is binary comparison. Locale identifiers are compared
	/// with `_` and `-` treated as the same separator, because the server
	/// echoes whichever form it was given.
	pub fn same_rule(left: Option<&Collation>, right: Option<&Collation>) -> bool {
		let left = left.filter(|c| !c.is_simple());
		let right = right.filter(|c| !c.is_simple());
		match (left, right) {
			(None, None) => true,
			(Some(l), Some(r)) => {
				l.strength == r.strength && normalize_locale(&l.locale) == normalize_locale(&r.locale)
			}
			_ => false,
		}
	}
}

impl Display for Collation {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if self.is_simple() {
			f.write_str(Self::SIMPLE_LOCALE)
		} else {
			write!(f, "{} (strength {})", self.locale, self.strength)
		}
	}
}

fn normalize_locale(locale: &str) -> String {
	locale.replace('-', "_").to_ascii_lowercase()
}
