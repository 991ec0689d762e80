//! Permission validation for notification creation.
//!
//! Checks run cheapest-first and short-circuit on the first failure:
//! self-notification, actor/target existence, block relationship, then the
//! type-specific ownership rule. Store reads are bounded; a timeout denies.

use flock_core::utils::bounded;
use flock_types::meta_adapter::Profile;
use flock_types::notification::{CreateNotification, NotificationRef, NotificationType};

use crate::prelude::*;

/// Profiles resolved during validation, reused by the rate limiter.
#[derive(Clone, Debug)]
pub struct ValidatedParties {
	pub actor: Profile,
	pub target: Profile,
}

/// Validate that `actor_id` may create `req` for its target.
///
/// System notifications never pass here; they go through the admin-gated
/// endpoint instead.
pub async fn check_create(
	app: &App,
	actor_id: &str,
	req: &CreateNotification,
) -> FlResult<ValidatedParties> {
	let typ = req.reference.typ();
	let target_id = &*req.target_user_id;
	let timeout_ms = app.config.rate_limit.store_timeout_ms;

	if typ == NotificationType::System {
		warn!(subject = %actor_id, "System notification attempted outside the admin endpoint");
		return Err(Error::PermissionDenied);
	}

	if actor_id == target_id {
		return Err(Error::InvalidArgument("cannot send a notification to yourself".into()));
	}

	let actor = bounded(timeout_ms, "actor profile read", app.meta_adapter.read_profile(actor_id))
		.await?
		.ok_or(Error::NotFound)?;
	let target =
		bounded(timeout_ms, "target profile read", app.meta_adapter.read_profile(target_id))
			.await?
			.ok_or(Error::NotFound)?;

	if bounded(timeout_ms, "block check", app.meta_adapter.is_blocked(actor_id, target_id)).await? {
		warn!(subject = %actor_id, target = %target_id, "Notification denied by block relationship");
		return Err(Error::PermissionDenied);
	}

	check_ownership(app, actor_id, target_id, &req.reference, timeout_ms).await?;

	Ok(ValidatedParties { actor, target })
}

/// The referenced resource must belong to the notification's target: you
/// can only be notified about likes of your own post, replies to your own
/// comment, and so on.
async fn check_ownership(
	app: &App,
	actor_id: &str,
	target_id: &str,
	reference: &NotificationRef,
	timeout_ms: u64,
) -> FlResult<()> {
	let author = match reference {
		NotificationRef::Like { post_id }
		| NotificationRef::Comment { post_id }
		| NotificationRef::Repost { post_id } => {
			bounded(timeout_ms, "post author read", app.meta_adapter.read_post_author(post_id))
				.await?
				.ok_or(Error::NotFound)?
		}
		NotificationRef::Reply { comment_id } => bounded(
			timeout_ms,
			"comment author read",
			app.meta_adapter.read_comment_author(comment_id),
		)
		.await?
		.ok_or(Error::NotFound)?,
		NotificationRef::Follow | NotificationRef::Mention | NotificationRef::System => {
			return Ok(())
		}
	};

	if &*author != target_id {
		warn!(
			subject = %actor_id,
			target = %target_id,
			owner = %author,
			typ = reference.typ().as_str(),
			"Notification denied: referenced resource not owned by target"
		);
		return Err(Error::PermissionDenied);
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use flock_core::app::AppState;
	use flock_core::config::GuardConfig;
	use flock_core::rate_limit::MemoryCounterStore;
	use flock_identity_adapter_memory::IdentityAdapterMemory;
	use flock_meta_adapter_memory::MetaAdapterMemory;
	use std::sync::Arc;

	fn profile(user_id: &str) -> Profile {
		Profile {
			user_id: user_id.into(),
			name: user_id.into(),
			verified: false,
			follower_count: 0,
			created_at: Timestamp(0),
		}
	}

	fn setup() -> (App, Arc<MetaAdapterMemory>) {
		let meta = Arc::new(MetaAdapterMemory::new());
		meta.seed_profile(profile("alice"));
		meta.seed_profile(profile("bob"));
		let identity = Arc::new(IdentityAdapterMemory::new("test-secret"));
		let store = Arc::new(MemoryCounterStore::new(1024));
		let app = AppState::new(GuardConfig::default(), meta.clone(), identity, store);
		(app, meta)
	}

	fn like_req(target: &str, post: &str) -> CreateNotification {
		CreateNotification {
			target_user_id: target.into(),
			reference: NotificationRef::Like { post_id: post.into() },
			message: "liked your post".into(),
		}
	}

	#[tokio::test]
	async fn test_owned_post_passes() {
		let (app, meta) = setup();
		meta.seed_post("p1", "bob");
		let parties = check_create(&app, "alice", &like_req("bob", "p1")).await.unwrap();
		assert_eq!(&*parties.target.user_id, "bob");
	}

	#[tokio::test]
	async fn test_self_notification_rejected() {
		let (app, meta) = setup();
		meta.seed_post("p1", "alice");
		let err = check_create(&app, "alice", &like_req("alice", "p1")).await.unwrap_err();
		assert!(matches!(err, Error::InvalidArgument(_)));
	}

	#[tokio::test]
	async fn test_unknown_target_rejected() {
		let (app, _meta) = setup();
		let err = check_create(&app, "alice", &like_req("ghost", "p1")).await.unwrap_err();
		assert!(matches!(err, Error::NotFound));
	}

	#[tokio::test]
	async fn test_block_denies_both_directions() {
		let (app, meta) = setup();
		meta.seed_post("p1", "bob");
		// bob blocked alice; alice still cannot notify bob
		meta.seed_block("bob", "alice");
		let err = check_create(&app, "alice", &like_req("bob", "p1")).await.unwrap_err();
		assert!(matches!(err, Error::PermissionDenied));
	}

	#[tokio::test]
	async fn test_foreign_post_rejected() {
		let (app, meta) = setup();
		meta.seed_profile(profile("carol"));
		// The post belongs to carol, so bob cannot be notified about it
		meta.seed_post("p1", "carol");
		let err = check_create(&app, "alice", &like_req("bob", "p1")).await.unwrap_err();
		assert!(matches!(err, Error::PermissionDenied));
	}

	#[tokio::test]
	async fn test_reply_checks_comment_author() {
		let (app, meta) = setup();
		meta.seed_comment("c1", "bob");
		let req = CreateNotification {
			target_user_id: "bob".into(),
			reference: NotificationRef::Reply { comment_id: "c1".into() },
			message: "replied to you".into(),
		};
		check_create(&app, "alice", &req).await.unwrap();
	}

	#[tokio::test]
	async fn test_follow_needs_no_resource() {
		let (app, _meta) = setup();
		let req = CreateNotification {
			target_user_id: "bob".into(),
			reference: NotificationRef::Follow,
			message: "followed you".into(),
		};
		check_create(&app, "alice", &req).await.unwrap();
	}

	#[tokio::test]
	async fn test_system_type_rejected_here() {
		let (app, _meta) = setup();
		let req = CreateNotification {
			target_user_id: "bob".into(),
			reference: NotificationRef::System,
			message: "maintenance window".into(),
		};
		let err = check_create(&app, "alice", &req).await.unwrap_err();
		assert!(matches!(err, Error::PermissionDenied));
	}
}

// vim: ts=4
