pub use flock_core::app::App;
pub use flock_types::error::Error;

#[allow(unused_imports)]
pub use tracing::{debug, error, info, warn};

// vim: ts=4
