pub use crate::app::App;
pub use flock_types::error::{Error, FlResult};
pub use flock_types::types::Timestamp;

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
