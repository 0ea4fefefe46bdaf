// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Shared definitions for docinit.
//!
//! Everything a bootstrap run talks about lives here: the objects it creates
//! (credential, collection, index), the comparison rule they share, the
//! privilege model used by the preflight, and the error type every other
//! crate returns.

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod collation;
pub mod collection;
pub mod credential;
pub mod error;
pub mod index;
pub mod plan;
pub mod privilege;

pub use collation::{Collation, Strength};
pub use collection::{CollectionDef, CollectionInfo};
pub use credential::{CredentialDef, CredentialInfo, Mechanism, PasswordDigestor, RoleGrant, Secret};
pub use error::{Error, ErrorKind, ObjectKind, diagnostic::Diagnostic};
pub use index::{IndexDef, IndexInfo, IndexKey, IndexOrder};
pub use plan::{ExistingCredential, Plan};
pub use privilege::{Action, ConnectionStatus, Principal, Privilege, Resource};

/// A document as inserted into a collection.
pub type Document = serde_json::Map<String, serde_json::Value>;

pub type Result<T> = std::result::Result<T, Error>;
