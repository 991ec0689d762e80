//! Notification API handlers.
//!
//! The create path is the full guard pipeline in order: sanitize the
//! message, validate permissions, consult the rate limiter, then persist.
//! A failure at any stage stops the pipeline before any write happens.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use flock_core::extract::{Auth, ClientIp};
use flock_core::guard;
use flock_core::rate_limit::RateSubject;
use flock_core::sanitize::{self, FieldKind, SanitizeRejection};
use flock_core::utils::{bounded, random_id};
use flock_types::meta_adapter::ListNotificationsOptions;
use flock_types::notification::{CreateNotification, Notification, NotificationRef};
use flock_types::security::{AuditEntry, AuditKind, SecurityEventKind};
use flock_types::types::ApiResponse;

use crate::perm;
use crate::prelude::*;

const PERM_SYSTEM: &str = "notifications.system";
const PERM_MODERATE: &str = "notifications.moderate";

/// Sanitize a message field; a matched threat signature records a security
/// event with the original text before the request is denied.
async fn clean_message(
	app: &App,
	actor_id: &str,
	text: &str,
	kind: FieldKind,
) -> FlResult<String> {
	match sanitize::validate(text, kind) {
		Ok(clean) => Ok(clean),
		Err(SanitizeRejection::ThreatDetected(matched)) => {
			warn!(
				subject = %actor_id,
				class = matched.class.as_str(),
				"Threat signature in submitted content"
			);
			app.security
				.report(
					SecurityEventKind::ThreatDetected,
					actor_id,
					serde_json::json!({
						"class": matched.class.as_str(),
						"fragment": matched.fragment,
						"original": text,
					}),
				)
				.await;
			Err(SanitizeRejection::ThreatDetected(matched).into())
		}
		Err(rejection) => Err(rejection.into()),
	}
}

/// POST /api/notifications - Create a notification (guarded pipeline)
pub async fn post_notification(
	State(app): State<App>,
	Auth(auth): Auth,
	ClientIp(client_ip): ClientIp,
	Json(req): Json<CreateNotification>,
) -> FlResult<(StatusCode, Json<ApiResponse<Notification>>)> {
	let actor_id = &*auth.user_id;
	let typ = req.reference.typ();

	let message = clean_message(&app, actor_id, &req.message, FieldKind::Comment).await?;
	let parties = perm::check_create(&app, actor_id, &req).await?;

	let subject = RateSubject {
		actor_id,
		actor_created_at: parties.actor.created_at,
		client_ip: client_ip.as_deref(),
		target_id: &req.target_user_id,
		target_verified: parties.target.verified,
		target_follower_count: parties.target.follower_count,
		typ,
	};
	app.rate_limiter.check(&subject, &app.security).await?;

	let notification = Notification {
		notification_id: random_id().into(),
		user_id: req.target_user_id.clone(),
		from_user_id: auth.user_id.clone(),
		reference: req.reference.clone(),
		message: message.into(),
		is_read: false,
		created_at: Timestamp::now(),
	};
	app.meta_adapter.create_notification(&notification).await?;

	info!(
		subject = %actor_id,
		target = %req.target_user_id,
		typ = typ.as_str(),
		"Notification created"
	);
	Ok((StatusCode::CREATED, Json(ApiResponse::new(notification))))
}

/// Request body for bulk system notifications
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemNotificationRequest {
	pub target_user_ids: Vec<Box<str>>,
	pub message: Box<str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemNotificationResponse {
	pub notification_ids: Vec<Box<str>>,
}

/// POST /api/notifications/system - Broadcast a system notification
/// (admin-gated)
pub async fn post_system_notification(
	State(app): State<App>,
	Auth(auth): Auth,
	Json(req): Json<SystemNotificationRequest>,
) -> FlResult<(StatusCode, Json<ApiResponse<SystemNotificationResponse>>)> {
	guard::authorize(&app, &auth, PERM_SYSTEM).await?;
	if req.target_user_ids.is_empty() {
		return Err(Error::InvalidArgument("targetUserIds must not be empty".into()));
	}
	if req.target_user_ids.len() > app.config.bulk_limit {
		return Err(Error::InvalidArgument(format!(
			"at most {} targets per call",
			app.config.bulk_limit
		)));
	}

	let message: Box<str> =
		clean_message(&app, &auth.user_id, &req.message, FieldKind::Body).await?.into();

	let mut notification_ids = Vec::with_capacity(req.target_user_ids.len());
	for target_id in &req.target_user_ids {
		let profile = app.meta_adapter.read_profile(target_id).await?;
		if profile.is_none() {
			debug!(target = %target_id, "Skipping system notification for unknown user");
			continue;
		}
		let notification = Notification {
			notification_id: random_id().into(),
			user_id: target_id.clone(),
			from_user_id: auth.user_id.clone(),
			reference: NotificationRef::System,
			message: message.clone(),
			is_read: false,
			created_at: Timestamp::now(),
		};
		app.meta_adapter.create_notification(&notification).await?;
		notification_ids.push(notification.notification_id);
	}

	info!(subject = %auth.user_id, created = notification_ids.len(), "System notification broadcast");
	Ok((
		StatusCode::CREATED,
		Json(ApiResponse::new(SystemNotificationResponse { notification_ids })),
	))
}

/// Request body for bulk moderation deletes
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteNotificationsRequest {
	pub notification_ids: Vec<Box<str>>,
	/// Human-supplied justification, mandatory
	pub reason: Box<str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteNotificationsResponse {
	pub deleted: u32,
}

/// DELETE /api/notifications - Bulk delete for moderation (admin-gated)
pub async fn delete_notifications(
	State(app): State<App>,
	Auth(auth): Auth,
	Json(req): Json<DeleteNotificationsRequest>,
) -> FlResult<(StatusCode, Json<ApiResponse<DeleteNotificationsResponse>>)> {
	guard::authorize(&app, &auth, PERM_MODERATE).await?;
	if req.notification_ids.is_empty() {
		return Err(Error::InvalidArgument("notificationIds must not be empty".into()));
	}
	if req.notification_ids.len() > app.config.bulk_limit {
		return Err(Error::InvalidArgument(format!(
			"at most {} notifications per call",
			app.config.bulk_limit
		)));
	}
	let reason = sanitize::sanitize_input(&req.reason);
	if reason.is_empty() {
		return Err(Error::InvalidArgument("reason must not be empty".into()));
	}

	let timeout_ms = app.config.rate_limit.store_timeout_ms;
	let deleted = bounded(
		timeout_ms,
		"notification delete",
		app.meta_adapter.delete_notifications(&req.notification_ids),
	)
	.await?;

	let entry = AuditEntry {
		kind: AuditKind::NotificationsDeleted,
		executor_id: auth.user_id.clone(),
		target_id: req.notification_ids.join(",").into(),
		prior_permissions: vec![],
		new_permissions: vec![],
		reason: reason.into(),
		created_at: Timestamp::now(),
	};
	if let Err(e) = app.meta_adapter.append_audit_entry(&entry).await {
		warn!(executor = %auth.user_id, "Failed to write delete audit entry: {}", e);
	}

	info!(subject = %auth.user_id, deleted, "Notifications deleted");
	Ok((StatusCode::OK, Json(ApiResponse::new(DeleteNotificationsResponse { deleted }))))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotificationsQuery {
	#[serde(default)]
	pub unread_only: bool,
	pub limit: Option<u32>,
}

/// GET /api/notifications - List the caller's notifications
pub async fn get_notifications(
	State(app): State<App>,
	Auth(auth): Auth,
	Query(query): Query<ListNotificationsQuery>,
) -> FlResult<(StatusCode, Json<ApiResponse<Vec<Notification>>>)> {
	let opts = ListNotificationsOptions { unread_only: query.unread_only, limit: query.limit };
	let list = app.meta_adapter.list_notifications(&auth.user_id, &opts).await?;
	Ok((StatusCode::OK, Json(ApiResponse::new(list))))
}

/// PATCH /api/notifications/{id}/read - Mark one notification read
pub async fn patch_notification_read(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(notification_id): Path<String>,
) -> FlResult<(StatusCode, Json<ApiResponse<()>>)> {
	app.meta_adapter.mark_notification_read(&auth.user_id, &notification_id).await?;
	Ok((StatusCode::OK, Json(ApiResponse::new(()))))
}


// vim: ts=4
