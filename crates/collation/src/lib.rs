// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Locale-aware string comparison.
//!
//! A [`Comparator`] turns a [`Collation`] into an ordering over strings using
//! the Unicode Collation Algorithm as implemented by ICU4X. Strength levels map
//! one to one onto ICU strengths, so `en_US` at strength 2 treats `Alice` and
//! `alice` as equal while keeping `alice` and `alicé` apart.

#![cfg_attr(not(debug_assertions), deny(warnings))]

use std::{
	cmp::Ordering,
	fmt::{Debug, Formatter},
};

use docinit_type::{Collation, Error, Strength};
use icu_collator::{
	Collator, CollatorBorrowed, CollatorPreferences,
	options::{CollatorOptions, Strength as IcuStrength},
};
use icu_locale_core::Locale;
use serde_json::Value;
use tracing::instrument;

pub enum Comparator {
	/// Code point comparison, used when no collation (or `simple`) applies.
	Binary,
	Icu {
		collation: Collation,
		collator: Box<CollatorBorrowed<'static>>,
	},
}

impl Debug for Comparator {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Comparator::Binary => f.write_str("Comparator::Binary"),
			Comparator::Icu {
				collation,
				..
			} => write!(f, "Comparator::Icu({})", collation),
		}
	}
}

impl Comparator {
	#[instrument(name = "collation::comparator::new", level = "trace")]
	pub fn new(collation: Option<&Collation>) -> docinit_type::Result<Self> {
		let Some(collation) = collation.filter(|c| !c.is_simple()) else {
			return Ok(Comparator::Binary);
		};

		let locale = parse_locale(&collation.locale)?;
		let mut options = CollatorOptions::default();
		options.strength = Some(icu_strength(collation.strength));

		let collator = Collator::try_new(CollatorPreferences::from(&locale), options).map_err(|e| {
			Error::invalid("collation", format!("no collation data for locale `{}`: {}", collation.locale, e))
		})?;

		Ok(Comparator::Icu {
			collation: collation.clone(),
			collator: Box::new(collator),
		})
	}

	pub fn compare(&self, left: &str, right: &str) -> Ordering {
		match self {
			Comparator::Binary => left.cmp(right),
			Comparator::Icu {
				collator,
				..
			} => collator.compare(left, right),
		}
	}

	pub fn equal(&self, left: &str, right: &str) -> bool {
		self.compare(left, right) == Ordering::Equal
	}

	/// Equality of two field values as a unique index sees it: strings
	/// compare under the collation (also inside arrays and objects), numbers
	/// compare numerically, everything else structurally.
	pub fn values_equal(&self, left: &Value, right: &Value) -> bool {
		match (left, right) {
			(Value::String(l), Value::String(r)) => self.equal(l, r),
			(Value::Number(l), Value::Number(r)) => match (l.as_f64(), r.as_f64()) {
				(Some(l), Some(r)) => l == r,
				_ => l == r,
			},
			(Value::Array(l), Value::Array(r)) => {
				l.len() == r.len() && l.iter().zip(r).all(|(l, r)| self.values_equal(l, r))
			}
			(Value::Object(l), Value::Object(r)) => {
				l.len() == r.len()
					&& l.iter().zip(r).all(|((lk, lv), (rk, rv))| lk == rk && self.values_equal(lv, rv))
			}
			_ => left == right,
		}
	}
}

/// Accepts both the server's `en_US` form and BCP-47 `en-US`.
pub fn parse_locale(locale: &str) -> docinit_type::Result<Locale> {
	if locale.trim().is_empty() {
		return Err(Error::invalid("collation", "locale must not be empty"));
	}
	locale.replace('_', "-")
		.parse::<Locale>()
		.map_err(|e| Error::invalid("collation", format!("`{}` is not a valid locale identifier: {}", locale, e)))
}

fn icu_strength(strength: Strength) -> IcuStrength {
	match strength {
		Strength::Primary => IcuStrength::Primary,
		Strength::Secondary => IcuStrength::Secondary,
		Strength::Tertiary => IcuStrength::Tertiary,
		Strength::Quaternary => IcuStrength::Quaternary,
		Strength::Identical => IcuStrength::Identical,
	}
}

#[cfg(test)]
mod tests {
	use docinit_type::ErrorKind;
	use serde_json::json;

	use super::*;

	fn en_us(strength: Strength) -> Comparator {
		Comparator::new(Some(&Collation::new("en_US", strength))).unwrap()
	}

	#[test]
	fn test_secondary_ignores_case() {
		let cmp = en_us(Strength::Secondary);
		assert!(cmp.equal("Alice", "alice"));
		assert!(cmp.equal("ALICE", "alice"));
	}

	#[test]
	fn test_secondary_keeps_accents() {
		let cmp = en_us(Strength::Secondary);
		assert!(!cmp.equal("alice", "alicé"));
		assert!(!cmp.equal("Alice", "alicé"));
	}

	#[test]
	fn test_primary_ignores_case_and_accents() {
		let cmp = en_us(Strength::Primary);
		assert!(cmp.equal("alice", "alicé"));
		assert!(cmp.equal("Alice", "ALICÉ"));
		assert!(!cmp.equal("alice", "alicia"));
	}

	#[test]
	fn test_tertiary_keeps_case() {
		let cmp = en_us(Strength::Tertiary);
		assert!(!cmp.equal("Alice", "alice"));
		assert!(cmp.equal("alice", "alice"));
	}

	#[test]
	fn test_binary_without_collation() {
		let cmp = Comparator::new(None).unwrap();
		assert!(matches!(cmp, Comparator::Binary));
		assert!(!cmp.equal("Alice", "alice"));

		let simple = Comparator::new(Some(&Collation::simple())).unwrap();
		assert!(matches!(simple, Comparator::Binary));
	}

	#[test]
	fn test_ordering_is_linguistic() {
		let cmp = en_us(Strength::Tertiary);
		assert_eq!(cmp.compare("apple", "Banana"), Ordering::Less);
		assert_eq!(Comparator::Binary.compare("apple", "Banana"), Ordering::Greater);
	}

	#[test]
	fn test_values_equal() {
		let cmp = en_us(Strength::Secondary);
		assert!(cmp.values_equal(&json!("Bob"), &json!("bob")));
		assert!(cmp.values_equal(&json!(["Bob", 1]), &json!(["BOB", 1.0])));
		assert!(cmp.values_equal(&json!({"first": "Bob"}), &json!({"first": "bob"})));
		assert!(!cmp.values_equal(&json!("1"), &json!(1)));
		assert!(cmp.values_equal(&json!(null), &json!(null)));
	}

	#[test]
	fn test_invalid_locale() {
		let err = Comparator::new(Some(&Collation::new("not a locale!", Strength::Secondary))).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Invalid);

		let err = parse_locale("").unwrap_err();
		assert_eq!(err.diagnostic().code, "CONFIG_001");
	}

	#[test]
	fn test_parse_locale_accepts_underscore() {
		assert_eq!(parse_locale("en_US").unwrap(), parse_locale("en-US").unwrap());
	}
}
