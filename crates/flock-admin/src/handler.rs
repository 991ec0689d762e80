//! Admin HTTP surface: privilege grant/revoke and first-admin bootstrap.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use flock_core::extract::Auth;
use flock_types::identity_adapter::{AdminLevel, ClaimsAuthority};
use flock_types::types::ApiResponse;

use crate::grants;
use crate::prelude::*;

/// Request body for granting admin privileges
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantPrivilegesRequest {
	pub target_user_id: Box<str>,
	pub level: AdminLevel,
	pub reason: Box<str>,
}

/// POST /api/admin/privileges - Grant an admin level to a user
pub async fn post_privileges(
	State(app): State<App>,
	Auth(auth): Auth,
	Json(req): Json<GrantPrivilegesRequest>,
) -> FlResult<(StatusCode, Json<ApiResponse<ClaimsAuthority>>)> {
	let claims =
		grants::set_admin_privileges(&app, &auth, &req.target_user_id, req.level, &req.reason)
			.await?;
	Ok((StatusCode::OK, Json(ApiResponse::new(claims))))
}

/// Request body for revoking admin privileges
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokePrivilegesRequest {
	pub target_user_id: Box<str>,
	pub reason: Box<str>,
}

/// DELETE /api/admin/privileges - Revoke all admin privileges from a user
pub async fn delete_privileges(
	State(app): State<App>,
	Auth(auth): Auth,
	Json(req): Json<RevokePrivilegesRequest>,
) -> FlResult<(StatusCode, Json<ApiResponse<()>>)> {
	grants::remove_admin_privileges(&app, &auth, &req.target_user_id, &req.reason).await?;
	Ok((StatusCode::OK, Json(ApiResponse::new(()))))
}

/// Request body for the first-admin bootstrap
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapRequest {
	pub setup_key: Option<Box<str>>,
}

/// POST /api/admin/bootstrap - Make the caller the initial super admin
///
/// Authenticated but deliberately not behind the admin middleware: by
/// definition nobody is an admin yet when this is legal to call.
pub async fn post_bootstrap(
	State(app): State<App>,
	Auth(auth): Auth,
	Json(req): Json<BootstrapRequest>,
) -> FlResult<(StatusCode, Json<ApiResponse<ClaimsAuthority>>)> {
	let claims =
		grants::create_initial_super_admin(&app, &auth, req.setup_key.as_deref()).await?;
	Ok((StatusCode::CREATED, Json(ApiResponse::new(claims))))
}

// vim: ts=4
