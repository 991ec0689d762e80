//! In-memory IdentityAdapter implementation.
//!
//! Issues HS256 bearer tokens and holds the revocable claims bag per user.
//! The token proves identity only; authorization claims are overlaid from
//! the live bag at verification time, so a revocation takes effect on the
//! next request even for tokens already in flight.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use flock::identity_adapter::{self, AuthCtx, ClaimsAuthority};
use flock::prelude::*;

const TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
	sub: String,
	iat: i64,
	exp: i64,
}

#[derive(Debug)]
pub struct IdentityAdapterMemory {
	secret: Box<str>,
	claims: RwLock<HashMap<Box<str>, ClaimsAuthority>>,
}

impl IdentityAdapterMemory {
	pub fn new(secret: &str) -> Self {
		Self { secret: secret.into(), claims: RwLock::new(HashMap::new()) }
	}

	/// Issue a bearer token for a user.
	pub fn issue_token(&self, user_id: &str) -> FlResult<String> {
		let now = Timestamp::now().0;
		let claims = TokenClaims {
			sub: user_id.to_string(),
			iat: now,
			exp: now + TOKEN_TTL_SECS,
		};
		jsonwebtoken::encode(
			&jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
			&claims,
			&jsonwebtoken::EncodingKey::from_secret(self.secret.as_bytes()),
		)
		.map_err(|e| {
			warn!("JWT encode error: {:?}", e);
			Error::Internal("JWT encode error".into())
		})
	}
}

#[async_trait]
impl identity_adapter::IdentityAdapter for IdentityAdapterMemory {
	async fn verify_token(&self, token: &str) -> FlResult<AuthCtx> {
		let validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256);
		let token_data = jsonwebtoken::decode::<TokenClaims>(
			token,
			&jsonwebtoken::DecodingKey::from_secret(self.secret.as_bytes()),
			&validation,
		)
		.map_err(|e| {
			debug!("JWT decode error: {:?}", e);
			Error::Unauthenticated
		})?;

		let user_id: Box<str> = token_data.claims.sub.into();
		// Authorization comes from the live bag, never from the token body
		let claims = self.claims.read().get(&user_id).cloned().unwrap_or_default();
		Ok(AuthCtx { user_id, claims })
	}

	async fn read_claims(&self, user_id: &str) -> FlResult<ClaimsAuthority> {
		Ok(self.claims.read().get(user_id).cloned().unwrap_or_default())
	}

	async fn update_claims(&self, user_id: &str, claims: &ClaimsAuthority) -> FlResult<()> {
		let mut bags = self.claims.write();
		if claims.is_empty() {
			bags.remove(user_id);
		} else {
			bags.insert(user_id.into(), claims.clone());
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use flock::identity_adapter::IdentityAdapter;

	#[tokio::test]
	async fn test_token_round_trip() {
		let idp = IdentityAdapterMemory::new("test-secret");
		let token = idp.issue_token("alice").unwrap();
		let ctx = idp.verify_token(&token).await.unwrap();
		assert_eq!(&*ctx.user_id, "alice");
		assert!(ctx.claims.is_empty());
	}

	#[tokio::test]
	async fn test_garbage_token_rejected() {
		let idp = IdentityAdapterMemory::new("test-secret");
		assert!(matches!(
			idp.verify_token("not.a.token").await,
			Err(Error::Unauthenticated)
		));
	}

	#[tokio::test]
	async fn test_wrong_secret_rejected() {
		let issuer = IdentityAdapterMemory::new("secret-a");
		let verifier = IdentityAdapterMemory::new("secret-b");
		let token = issuer.issue_token("alice").unwrap();
		assert!(verifier.verify_token(&token).await.is_err());
	}

	#[tokio::test]
	async fn test_claims_update_applies_to_inflight_tokens() {
		let idp = IdentityAdapterMemory::new("test-secret");
		let token = idp.issue_token("alice").unwrap();

		let mut claims = ClaimsAuthority { admin: true, ..Default::default() };
		claims.permissions.insert("notifications.system".into());
		idp.update_claims("alice", &claims).await.unwrap();
		let ctx = idp.verify_token(&token).await.unwrap();
		assert!(ctx.claims.has_permission("notifications.system"));

		// Revocation hits the same token on the next verification
		idp.update_claims("alice", &ClaimsAuthority::default()).await.unwrap();
		let ctx = idp.verify_token(&token).await.unwrap();
		assert!(ctx.claims.is_empty());
	}
}

// vim: ts=4
