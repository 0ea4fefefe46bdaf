// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use docinit_bootstrap::{Report, Verification};
use docinit_type::{Error, Plan, error::diagnostic::DefaultRenderer};
use serde::Serialize;
use serde_json::json;

use crate::cli::OutputFormat;

fn to_json<T: Serialize>(value: &T) -> String {
	serde_json::to_string_pretty(value).unwrap_or_else(|e| json!({ "error": e.to_string() }).to_string())
}

pub fn report(format: OutputFormat, report: &Report) -> String {
	match format {
		OutputFormat::Text => report.to_string(),
		OutputFormat::Json => to_json(report),
	}
}

pub fn verification(format: OutputFormat, verification: &Verification) -> String {
	match format {
		OutputFormat::Text => verification.to_string().trim_end().to_string(),
		OutputFormat::Json => to_json(&json!({
			"complete": verification.is_complete(),
			"checks": verification,
		})),
	}
}

/// The plan is always JSON; the secret serializes redacted.
pub fn plan(plan: &Plan) -> String {
	to_json(plan)
}

pub fn error(format: OutputFormat, err: &Error) -> String {
	let diagnostic = err.diagnostic();
	match format {
		OutputFormat::Text => DefaultRenderer::render_string(&diagnostic).trim_end().to_string(),
		OutputFormat::Json => to_json(&json!({ "kind": err.kind(), "error": diagnostic })),
	}
}

#[cfg(test)]
mod tests {
	use docinit_bootstrap::Check;
	use docinit_type::ObjectKind;

	use super::*;

	#[test]
	fn test_plan_redacts_secret() {
		let rendered = plan(&Plan::default());
		assert!(rendered.contains(r#""secret": "***""#));
		assert!(!rendered.contains("password"));
	}

	#[test]
	fn test_error_json() {
		let err = Error::AlreadyExists {
			kind: ObjectKind::Credential,
			name: "test@gtest".to_string(),
			reason: None,
		};
		let value: serde_json::Value = serde_json::from_str(&error(OutputFormat::Json, &err)).unwrap();
		assert_eq!(value["kind"], "already_exists");
		assert_eq!(value["error"]["code"], "CREDENTIAL_001");
	}

	#[test]
	fn test_error_text() {
		let err = Error::connection("server selection timed out");
		let rendered = error(OutputFormat::Text, &err);
		assert!(rendered.starts_with("error[CONNECTION_001]: connection error: server selection timed out"));
	}

	#[test]
	fn test_verification_text() {
		let verification = Verification {
			credential: Check::Present,
			collection: Check::Present,
			index: Check::Missing,
		};
		assert_eq!(
			super::verification(OutputFormat::Text, &verification),
			"credential  present\ncollection  present\nindex       missing"
		);
	}
}
