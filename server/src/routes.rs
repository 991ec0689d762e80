//! Route table.

use axum::{
	middleware,
	routing::{delete, get, patch, post},
	Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::require_auth;
use flock_core::app::App;

pub fn init(app: App) -> Router {
	let admin_router = Router::new()
		.route("/api/notifications/system", post(flock_notify::handler::post_system_notification))
		.route("/api/notifications", delete(flock_notify::handler::delete_notifications))
		.route("/api/admin/privileges", post(flock_admin::handler::post_privileges))
		.route("/api/admin/privileges", delete(flock_admin::handler::delete_privileges))
		.layer(middleware::from_fn_with_state(app.clone(), flock_admin::perm::require_admin));

	let user_router = Router::new()
		.route("/api/notifications", post(flock_notify::handler::post_notification))
		.route("/api/notifications", get(flock_notify::handler::get_notifications))
		.route(
			"/api/notifications/{notification_id}/read",
			patch(flock_notify::handler::patch_notification_read),
		)
		.route("/api/admin/bootstrap", post(flock_admin::handler::post_bootstrap));

	Router::new()
		.merge(admin_router)
		.merge(user_router)
		.layer(middleware::from_fn_with_state(app.clone(), require_auth))
		.layer(TraceLayer::new_for_http())
		.with_state(app)
}

// vim: ts=4
