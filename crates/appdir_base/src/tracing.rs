use crate::error::{AppDirError, AppDirResult};
pub use tracing::instrument;
pub use tracing::{debug, error, info, trace, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Installs the global tracing subscriber.
///
/// Log levels come from `RUST_LOG` and default to `info`. The [`ErrorLayer`] makes
/// span traces available to [`AppDirError`].
pub fn init_tracing() -> AppDirResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|e| {
            Box::new(AppDirError::configuration(format!(
                "Failed to initialize tracing: {}",
                e
            )))
        })
}
