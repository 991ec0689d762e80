//! Auth middleware: bearer token to request extensions.

use std::net::{IpAddr, SocketAddr};

use axum::{
	body::Body,
	extract::{ConnectInfo, Request, State},
	middleware::Next,
	response::Response,
};

use flock_core::extract::ClientIp;

use crate::prelude::*;

/// First hop of the X-Forwarded-For chain, if it parses as an address.
fn forwarded_ip(req: &Request<Body>) -> Option<IpAddr> {
	req.headers()
		.get("x-forwarded-for")
		.and_then(|h| h.to_str().ok())
		.and_then(|v| v.split(',').next())
		.and_then(|ip| ip.trim().parse().ok())
}

/// Resolve the client IP. The forwarding header is client-controllable, so
/// it is only consulted behind a reverse proxy that overwrites it; direct
/// deployments use the peer address from the connection info.
fn client_ip(req: &Request<Body>, behind_proxy: bool) -> ClientIp {
	let peer = req.extensions().get::<ConnectInfo<SocketAddr>>().map(|ci| ci.0.ip());
	let ip = if behind_proxy { forwarded_ip(req).or(peer) } else { peer };
	ClientIp(ip.map(|ip| ip.to_string().into()))
}

/// Verifies the bearer token and inserts the `AuthCtx` and client IP into
/// the request extensions. Requests without a valid token are rejected.
pub async fn require_auth(
	State(app): State<App>,
	mut req: Request<Body>,
	next: Next,
) -> Result<Response, Error> {
	let auth_header = req
		.headers()
		.get("Authorization")
		.and_then(|h| h.to_str().ok())
		.ok_or(Error::Unauthenticated)?;

	let token = auth_header.strip_prefix("Bearer ").ok_or(Error::Unauthenticated)?;
	let auth_ctx = app.identity_adapter.verify_token(token).await?;

	let ip = client_ip(&req, app.config.behind_proxy);
	req.extensions_mut().insert(auth_ctx);
	req.extensions_mut().insert(ip);

	Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn request(peer: Option<&str>, forwarded: Option<&str>) -> Request<Body> {
		let mut builder = Request::builder().uri("/");
		if let Some(forwarded) = forwarded {
			builder = builder.header("x-forwarded-for", forwarded);
		}
		let mut req = builder.body(Body::empty()).unwrap();
		if let Some(peer) = peer {
			let addr: SocketAddr = peer.parse().unwrap();
			req.extensions_mut().insert(ConnectInfo(addr));
		}
		req
	}

	#[test]
	fn test_direct_connection_ignores_forwarding_header() {
		let req = request(Some("10.0.0.1:4444"), Some("203.0.113.9"));
		assert_eq!(client_ip(&req, false).0.as_deref(), Some("10.0.0.1"));
	}

	#[test]
	fn test_proxy_mode_takes_first_forwarded_hop() {
		let req = request(Some("10.0.0.1:4444"), Some("203.0.113.9, 10.0.0.1"));
		assert_eq!(client_ip(&req, true).0.as_deref(), Some("203.0.113.9"));
	}

	#[test]
	fn test_proxy_mode_falls_back_to_peer_on_garbage_header() {
		let req = request(Some("10.0.0.1:4444"), Some("not-an-address"));
		assert_eq!(client_ip(&req, true).0.as_deref(), Some("10.0.0.1"));
	}

	#[test]
	fn test_no_peer_and_no_header_yields_none() {
		let req = request(None, None);
		assert!(client_ip(&req, false).0.is_none());
	}
}

// vim: ts=4
