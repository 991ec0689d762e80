//! Notification data model.
//!
//! The notification type enumeration is closed: unknown types fail
//! deserialization at the boundary instead of flowing through as an
//! open-ended metadata map. Each `NotificationRef` variant carries exactly
//! the resource reference its ownership check needs.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::prelude::*;

/// Closed set of notification types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
	Like,
	Comment,
	Follow,
	Mention,
	Reply,
	Repost,
	System,
}

impl NotificationType {
	pub fn as_str(self) -> &'static str {
		match self {
			NotificationType::Like => "like",
			NotificationType::Comment => "comment",
			NotificationType::Follow => "follow",
			NotificationType::Mention => "mention",
			NotificationType::Reply => "reply",
			NotificationType::Repost => "repost",
			NotificationType::System => "system",
		}
	}
}

impl std::fmt::Display for NotificationType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Typed reference evidence per notification type.
///
/// like/comment/repost reference the post the target must own, reply
/// references the comment the target must own, follow/mention/system carry
/// no resource reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum NotificationRef {
	Like { post_id: Box<str> },
	Comment { post_id: Box<str> },
	Repost { post_id: Box<str> },
	Reply { comment_id: Box<str> },
	Follow,
	Mention,
	System,
}

impl NotificationRef {
	pub fn typ(&self) -> NotificationType {
		match self {
			NotificationRef::Like { .. } => NotificationType::Like,
			NotificationRef::Comment { .. } => NotificationType::Comment,
			NotificationRef::Repost { .. } => NotificationType::Repost,
			NotificationRef::Reply { .. } => NotificationType::Reply,
			NotificationRef::Follow => NotificationType::Follow,
			NotificationRef::Mention => NotificationType::Mention,
			NotificationRef::System => NotificationType::System,
		}
	}
}

/// Transient create request. Validated, then transformed into a stored
/// `Notification`; never persisted in this shape.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotification {
	pub target_user_id: Box<str>,
	#[serde(flatten)]
	pub reference: NotificationRef,
	pub message: Box<str>,
}

/// Stored notification record.
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
	pub notification_id: Box<str>,
	/// Recipient
	pub user_id: Box<str>,
	pub from_user_id: Box<str>,
	#[serde(flatten)]
	pub reference: NotificationRef,
	pub message: Box<str>,
	pub is_read: bool,
	pub created_at: Timestamp,
}


// vim: ts=4
