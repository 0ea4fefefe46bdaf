// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Error type returned by every docinit crate.
//!
//! Each variant keeps the structured facts (what object, which action, what
//! the server said) and renders into a [`Diagnostic`] with a stable code.

pub mod diagnostic;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use self::diagnostic::{Diagnostic, IntoDiagnostic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
	Credential,
	Collection,
	Index,
}

impl Display for ObjectKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			ObjectKind::Credential => f.write_str("credential"),
			ObjectKind::Collection => f.write_str("collection"),
			ObjectKind::Index => f.write_str("index"),
		}
	}
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
	AlreadyExists,
	PermissionDenied,
	ConstraintViolation,
	Connection,
	Authentication,
	Rejected,
	Invalid,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
	#[error("{kind} `{name}` already exists")]
	AlreadyExists {
		kind: ObjectKind,
		name: String,
		reason: Option<String>,
	},

	#[error("permission denied: `{action}` on {resource}")]
	PermissionDenied {
		action: String,
		resource: String,
		reason: Option<String>,
	},

	#[error("uniqueness constraint `{index}` violated on `{namespace}`")]
	ConstraintViolation {
		namespace: String,
		index: String,
		reason: String,
	},

	#[error("connection error: {message}")]
	Connection {
		message: String,
	},

	#[error("authentication failed: {message}")]
	Authentication {
		message: String,
	},

	#[error("server rejected {operation}: {message}")]
	Rejected {
		operation: String,
		code: i32,
		code_name: String,
		message: String,
	},

	#[error("invalid {subject}: {message}")]
	Invalid {
		subject: String,
		message: String,
	},
}

impl Error {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::AlreadyExists {
				..
			} => ErrorKind::AlreadyExists,
			Error::PermissionDenied {
				..
			} => ErrorKind::PermissionDenied,
			Error::ConstraintViolation {
				..
			} => ErrorKind::ConstraintViolation,
			Error::Connection {
				..
			} => ErrorKind::Connection,
			Error::Authentication {
				..
			} => ErrorKind::Authentication,
			Error::Rejected {
				..
			} => ErrorKind::Rejected,
			Error::Invalid {
				..
			} => ErrorKind::Invalid,
		}
	}

	pub fn diagnostic(&self) -> Diagnostic {
		self.clone().into_diagnostic()
	}

	pub fn connection(message: impl Into<String>) -> Self {
		Error::Connection {
			message: message.into(),
		}
	}

	pub fn invalid(subject: impl Into<String>, message: impl Into<String>) -> Self {
		Error::Invalid {
			subject: subject.into(),
			message: message.into(),
		}
	}
}
