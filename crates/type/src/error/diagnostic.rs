// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter, Write};

use serde::{Deserialize, Serialize};

use crate::{Error, ObjectKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
	pub code: String,
	pub message: String,
	pub label: Option<String>,
	pub help: Option<String>,
	pub notes: Vec<String>,
	pub cause: Option<Box<Diagnostic>>,
}

pub trait IntoDiagnostic {
	fn into_diagnostic(self) -> Diagnostic;
}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&DefaultRenderer::render_string(self))
	}
}

/// Plain-text rendering used on the terminal.
pub struct DefaultRenderer;

impl DefaultRenderer {
	pub fn render_string(diagnostic: &Diagnostic) -> String {
		let mut out = String::new();
		Self::render(&mut out, diagnostic, 0);
		out
	}

	fn render(out: &mut String, diagnostic: &Diagnostic, depth: usize) {
		let indent = "  ".repeat(depth);
		let _ = writeln!(out, "{}error[{}]: {}", indent, diagnostic.code, diagnostic.message);
		if let Some(label) = &diagnostic.label {
			let _ = writeln!(out, "{}  --> {}", indent, label);
		}
		if let Some(help) = &diagnostic.help {
			let _ = writeln!(out, "{}  help: {}", indent, help);
		}
		for note in &diagnostic.notes {
			let _ = writeln!(out, "{}  note: {}", indent, note);
		}
		if let Some(cause) = &diagnostic.cause {
			let _ = writeln!(out, "{}  caused by:", indent);
			Self::render(out, cause, depth + 1);
		}
	}
}

fn server_note(reason: Option<String>) -> Vec<String> {
	reason.map(|r| vec![format!("server reported: {}", r)]).unwrap_or_default()
}

impl IntoDiagnostic for Error {
	fn into_diagnostic(self) -> Diagnostic {
		let message = self.to_string();
		match self {
			Error::AlreadyExists {
				kind,
				name,
				reason,
			} => {
				let (code, help) = match kind {
					ObjectKind::Credential => (
						"CREDENTIAL_001",
						"drop the principal first, or set `existing_credential = \"keep\"` to leave it in place",
					),
					ObjectKind::Collection => (
						"COLLECTION_001",
						"an existing collection with a different collation cannot be changed in place; drop it or align the plan",
					),
					ObjectKind::Index => (
						"INDEX_001",
						"an index with the same name or key but different options exists; drop it or rename the planned index",
					),
				};
				Diagnostic {
					code: code.to_string(),
					message,
					label: Some(format!("{} `{}`", kind, name)),
					help: Some(help.to_string()),
					notes: server_note(reason),
					cause: None,
				}
			}

			Error::PermissionDenied {
				action,
				resource,
				reason,
			} => {
				let mut notes = vec![
					"docinit checks privileges before creating anything, so nothing was changed when this is reported by the preflight".to_string(),
				];
				notes.extend(server_note(reason));
				Diagnostic {
					code: "AUTH_001".to_string(),
					message,
					label: Some(format!("missing `{}`", action)),
					help: Some(format!(
						"connect with a principal granted `{}` on {} (for example the `root` or `userAdminAnyDatabase` + `readWriteAnyDatabase` roles)",
						action, resource
					)),
					notes,
					cause: None,
				}
			}

			Error::ConstraintViolation {
				namespace,
				index,
				reason,
			} => Diagnostic {
				code: "INDEX_002".to_string(),
				message,
				label: Some(format!("duplicate key for `{}` in `{}`", index, namespace)),
				help: Some("values that compare equal under the index collation count as duplicates; remove or rename the conflicting documents".to_string()),
				notes: vec![reason],
				cause: None,
			},

			Error::Connection {
				..
			} => Diagnostic {
				code: "CONNECTION_001".to_string(),
				message,
				label: None,
				help: Some("check the connection URI, network reachability and that the server is running".to_string()),
				notes: vec![],
				cause: None,
			},

			Error::Authentication {
				..
			} => Diagnostic {
				code: "AUTH_002".to_string(),
				message,
				label: None,
				help: Some("check the administrative user, secret and authentication database in the connection URI".to_string()),
				notes: vec![],
				cause: None,
			},

			Error::Rejected {
				code,
				code_name,
				..
			} => Diagnostic {
				code: "SERVER_001".to_string(),
				message,
				label: Some(format!("server error {} ({})", code, code_name)),
				help: None,
				notes: vec![],
				cause: None,
			},

			Error::Invalid {
				subject,
				..
			} => Diagnostic {
				code: "CONFIG_001".to_string(),
				message,
				label: Some(format!("invalid {}", subject)),
				help: Some("fix the plan in the configuration file or on the command line".to_string()),
				notes: vec![],
				cause: None,
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_codes_per_object_kind() {
		let code = |kind| {
			Error::AlreadyExists {
				kind,
				name: "x".to_string(),
				reason: None,
			}
			.diagnostic()
			.code
		};
		assert_eq!(code(ObjectKind::Credential), "CREDENTIAL_001");
		assert_eq!(code(ObjectKind::Collection), "COLLECTION_001");
		assert_eq!(code(ObjectKind::Index), "INDEX_001");
	}

	#[test]
	fn test_server_reason_becomes_note() {
		let diagnostic = Error::AlreadyExists {
			kind: ObjectKind::Collection,
			name: "gtest.user".to_string(),
			reason: Some("Collection already exists. NS: gtest.user".to_string()),
		}
		.diagnostic();
		assert_eq!(diagnostic.notes, vec!["server reported: Collection already exists. NS: gtest.user".to_string()]);
	}

	#[test]
	fn test_render() {
		let diagnostic = Diagnostic {
			code: "INDEX_002".to_string(),
			message: "uniqueness constraint `username_1` violated on `gtest.user`".to_string(),
			label: None,
			help: Some("remove duplicates".to_string()),
			notes: vec!["dup key: { username: \"alice\" }".to_string()],
			cause: Some(Box::new(Diagnostic {
				code: "SERVER_001".to_string(),
				message: "E11000".to_string(),
				label: None,
				help: None,
				notes: vec![],
				cause: None,
			})),
		};

		let rendered = DefaultRenderer::render_string(&diagnostic);
		assert_eq!(
			rendered,
			"error[INDEX_002]: uniqueness constraint `username_1` violated on `gtest.user`\n  help: remove duplicates\n  note: dup key: { username: \"alice\" }\n  caused by:\n  error[SERVER_001]: E11000\n"
		);
	}
}
