// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Privilege check performed before the first side effect.

use docinit_server::AdminSession;
use docinit_type::{Action, ConnectionStatus, Error, Plan, Resource, Result};
use tracing::{debug, instrument};

/// Every (action, resource) pair a run of `plan` needs.
pub fn required(plan: &Plan) -> Vec<(Action, Resource)> {
	let mut required = vec![(Action::CreateUser, Resource::database(plan.database.as_str()))];
	for grant in &plan.credential.roles {
		let pair = (Action::GrantRole, Resource::database(grant.db.as_str()));
		if !required.contains(&pair) {
			required.push(pair);
		}
	}
	required.push((Action::CreateCollection, Resource::collection(plan.database.as_str(), plan.collection.name.as_str())));
	// an existing identical collection is only recognized through listCollections
	required.push((Action::ListCollections, Resource::database(plan.database.as_str())));
	required.push((Action::CreateIndex, Resource::collection(plan.database.as_str(), plan.index.collection.as_str())));
	required
}

/// First requirement `status` does not satisfy.
pub fn missing(status: &ConnectionStatus, plan: &Plan) -> Option<(Action, Resource)> {
	required(plan).into_iter().find(|(action, resource)| !status.allows(*action, resource))
}

#[instrument(name = "bootstrap::preflight", level = "debug", skip_all)]
pub(crate) async fn check<S: AdminSession + ?Sized>(session: &S, plan: &Plan) -> Result<()> {
	let status = session.connection_status().await?;
	if !status.is_authenticated() {
		debug!("no authenticated principal, leaving authorization to the server");
		return Ok(());
	}

	if let Some((action, resource)) = missing(&status, plan) {
		let principals = status.principals.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
		return Err(Error::PermissionDenied {
			action: action.to_string(),
			resource: resource.to_string(),
			reason: Some(format!("{} lacks this privilege", principals)),
		});
	}
	Ok(())
}
