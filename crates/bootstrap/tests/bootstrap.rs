// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use docinit_bootstrap::{Bootstrapper, Check, Step};
use docinit_server::{AdminSession, Outcome, memory::MemoryServer};
use docinit_testing::{fresh_server, unprivileged_session, user};
use docinit_type::{Collation, CollectionDef, ErrorKind, ExistingCredential, IndexOrder, Plan, Secret, Strength};

fn en_us() -> Option<Collation> {
	Some(Collation::new("en_US", Strength::Secondary))
}

#[tokio::test]
async fn test_fresh_database() {
	let (server, session) = fresh_server();
	let report = Bootstrapper::new(Plan::default()).unwrap().run(&session).await.unwrap();

	assert_eq!(report.steps.len(), 3);
	assert!(report.steps.iter().all(|s| s.outcome == Outcome::Created));
	assert_eq!(report.step(Step::Credential).unwrap().target, "test@gtest");

	let credential = session.find_credential("gtest", "test").await.unwrap().unwrap();
	assert_eq!(credential.roles.len(), 1);
	assert_eq!(credential.roles[0].role, "readWrite");
	assert_eq!(credential.roles[0].db, "gtest");
	assert!(server.authenticate("gtest", "test", &Secret::new("password")).is_ok());

	assert_eq!(server.collection_names("gtest"), vec!["user".to_string()]);
	let collection = session.find_collection("gtest", "user").await.unwrap().unwrap();
	assert_eq!(collection.collation, en_us());

	let indexes = session.list_indexes("gtest", "user").await.unwrap();
	let username = indexes.iter().find(|i| i.name == "username_1").unwrap();
	assert!(username.unique);
	assert_eq!(username.keys[0].field, "username");
	assert_eq!(username.keys[0].order, IndexOrder::Ascending);
	assert_eq!(username.collation, en_us());
}

#[tokio::test]
async fn test_second_run_fails_at_credential() {
	let (server, session) = fresh_server();
	let bootstrapper = Bootstrapper::new(Plan::default()).unwrap();
	bootstrapper.run(&session).await.unwrap();

	let err = bootstrapper.run(&session).await.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::AlreadyExists);
	assert_eq!(err.diagnostic().code, "CREDENTIAL_001");

	assert_eq!(server.credential_names("gtest"), vec!["test".to_string()]);
	assert_eq!(server.collection_names("gtest").len(), 1);
	assert_eq!(session.list_indexes("gtest", "user").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_second_run_keeping_credential_is_noop() {
	let (_server, session) = fresh_server();
	let mut plan = Plan::default();
	plan.existing_credential = ExistingCredential::Keep;
	let bootstrapper = Bootstrapper::new(plan).unwrap();

	assert!(!bootstrapper.run(&session).await.unwrap().is_noop());
	let report = bootstrapper.run(&session).await.unwrap();
	assert!(report.is_noop());
	assert_eq!(session.list_indexes("gtest", "user").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_case_insensitive_uniqueness() {
	let (server, session) = fresh_server();
	Bootstrapper::new(Plan::default()).unwrap().run(&session).await.unwrap();

	session.insert("gtest", "user", user("Alice")).await.unwrap();
	let err = session.insert("gtest", "user", user("alice")).await.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
	assert_eq!(server.document_count("gtest", "user"), 1);
}

#[tokio::test]
async fn test_accents_stay_distinct() {
	let (server, session) = fresh_server();
	Bootstrapper::new(Plan::default()).unwrap().run(&session).await.unwrap();

	session.insert("gtest", "user", user("alice")).await.unwrap();
	session.insert("gtest", "user", user("alicé")).await.unwrap();
	assert_eq!(server.document_count("gtest", "user"), 2);
}

#[tokio::test]
async fn test_application_credential_can_write() {
	let (server, session) = fresh_server();
	Bootstrapper::new(Plan::default()).unwrap().run(&session).await.unwrap();

	let app = server.session("gtest", "test", &Secret::new("password")).unwrap();
	app.insert("gtest", "user", user("bob")).await.unwrap();
	let err = app.insert("gtest", "user", user("BOB")).await.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
}

#[tokio::test]
async fn test_unprivileged_session_changes_nothing() {
	let (server, admin) = fresh_server();
	let session = unprivileged_session(&server, &admin).await;

	let err = Bootstrapper::new(Plan::default()).unwrap().run(&session).await.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::PermissionDenied);
	assert_eq!(err.to_string(), "permission denied: `createUser` on database `gtest`");

	assert!(server.credential_names("gtest").is_empty());
	assert!(server.collection_names("gtest").is_empty());
}

#[tokio::test]
async fn test_anonymous_session_is_denied_by_server() {
	let server = MemoryServer::new().unwrap();
	let session = server.anonymous_session();

	let err = Bootstrapper::new(Plan::default()).unwrap().run(&session).await.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::PermissionDenied);
	assert!(server.credential_names("gtest").is_empty());
}

#[tokio::test]
async fn test_server_without_access_control() {
	let server = MemoryServer::without_access_control();
	let report = Bootstrapper::new(Plan::default()).unwrap().run(&server.anonymous_session()).await.unwrap();
	assert_eq!(report.outcome(Step::Index), Some(Outcome::Created));
}

#[tokio::test]
async fn test_collection_failure_leaves_credential_and_skips_index() {
	let (server, session) = fresh_server();
	session.create_collection("gtest", &CollectionDef::new("user", None)).await.unwrap();

	let err = Bootstrapper::new(Plan::default()).unwrap().run(&session).await.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::AlreadyExists);
	assert_eq!(err.diagnostic().code, "COLLECTION_001");

	assert_eq!(server.credential_names("gtest"), vec!["test".to_string()]);
	let indexes = session.list_indexes("gtest", "user").await.unwrap();
	assert_eq!(indexes.len(), 1);
	assert_eq!(indexes[0].name, "_id_");
}

#[tokio::test]
async fn test_existing_identical_collection_is_unchanged() {
	let (_server, session) = fresh_server();
	session.create_collection("gtest", &CollectionDef::new("user", en_us())).await.unwrap();

	let report = Bootstrapper::new(Plan::default()).unwrap().run(&session).await.unwrap();
	assert_eq!(report.outcome(Step::Credential), Some(Outcome::Created));
	assert_eq!(report.outcome(Step::Collection), Some(Outcome::Unchanged));
	assert_eq!(report.outcome(Step::Index), Some(Outcome::Created));
}

#[tokio::test]
async fn test_existing_duplicates_block_index() {
	let (_server, session) = fresh_server();
	session.create_collection("gtest", &CollectionDef::new("user", en_us())).await.unwrap();
	session.insert("gtest", "user", user("Carol")).await.unwrap();
	session.insert("gtest", "user", user("carol")).await.unwrap();

	let err = Bootstrapper::new(Plan::default()).unwrap().run(&session).await.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
	assert_eq!(err.diagnostic().code, "INDEX_002");
}

#[tokio::test]
async fn test_verify() {
	let (_server, session) = fresh_server();
	let bootstrapper = Bootstrapper::new(Plan::default()).unwrap();

	let before = bootstrapper.verify(&session).await.unwrap();
	assert_eq!(before.credential, Check::Missing);
	assert_eq!(before.collection, Check::Missing);
	assert_eq!(before.index, Check::Missing);

	bootstrapper.run(&session).await.unwrap();
	let after = bootstrapper.verify(&session).await.unwrap();
	assert!(after.is_complete(), "{}", after);
}

#[tokio::test]
async fn test_verify_reports_mismatched_collection() {
	let (_server, session) = fresh_server();
	session.create_collection("gtest", &CollectionDef::new("user", None)).await.unwrap();

	let verification = Bootstrapper::new(Plan::default()).unwrap().verify(&session).await.unwrap();
	assert!(matches!(verification.collection, Check::Mismatch(_)));
	assert_eq!(verification.index, Check::Missing);
}
