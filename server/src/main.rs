//! Flock server binary: in-memory adapters, config from the environment.

use std::net::SocketAddr;

use flock::{build_memory_app, routes, ServerConfig};

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_target(false)
		.init();

	let config = ServerConfig::from_env();
	let listen = config.listen.clone();
	let (app, _meta, _identity) = build_memory_app(config);
	let router = routes::init(app);

	tracing::info!("Listening on {}", listen);
	let listener = match tokio::net::TcpListener::bind(&*listen).await {
		Ok(listener) => listener,
		Err(e) => {
			tracing::error!("Failed to bind {}: {}", listen, e);
			std::process::exit(1);
		}
	};
	// ConnectInfo carries the peer address the IP rate limit keys on
	let service = router.into_make_service_with_connect_info::<SocketAddr>();
	if let Err(e) = axum::serve(listener, service).await {
		tracing::error!("Server error: {}", e);
		std::process::exit(1);
	}
}

// vim: ts=4
