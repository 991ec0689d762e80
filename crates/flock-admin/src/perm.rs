//! Admin permission middleware

use axum::{
	extract::{Request, State},
	middleware::Next,
	response::Response,
};

use flock_core::extract::Auth;

use crate::guard;
use crate::prelude::*;

/// Middleware that checks if the current user holds admin claims.
///
/// Route-level gate only; the handlers behind it still check the specific
/// permission they need through the privilege guard. The gate runs the
/// same dual-source rule as the guard, so a stored role claiming an admin
/// level the token lacks is recorded before the denial.
pub async fn require_admin(
	State(app): State<App>,
	Auth(auth_ctx): Auth,
	req: Request,
	next: Next,
) -> Result<Response, Error> {
	guard::ensure_admin_claims(&app, &auth_ctx).await?;
	Ok(next.run(req).await)
}

// vim: ts=4
