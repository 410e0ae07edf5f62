//! Tracing installation for embedders.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info";

static INSTALLED: Once = Once::new();

/// Installs a `fmt` subscriber filtered by `RUST_LOG` and routes panics through `tracing`.
///
/// On Android records are also forwarded to logcat. Only the first call has an effect. If
/// another global subscriber is already set, it is kept and only the panic hook is installed.
pub fn install() {
    INSTALLED.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        #[cfg(target_os = "android")]
        let result = {
            use tracing_subscriber::prelude::*;
            use tracing_subscriber::util::SubscriberInitExt;

            let registry = tracing_subscriber::registry()
                .with(fmt::layer().without_time().with_ansi(false))
                .with(filter);
            if let Ok(android) = tracing_android::layer("WaterUIProtocol") {
                registry.with(android).try_init()
            } else {
                registry.try_init()
            }
        };

        #[cfg(not(target_os = "android"))]
        let result = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .without_time()
            .with_target(true)
            .try_init();

        if result.is_err() {
            tracing::debug!("A global subscriber is already installed");
        }

        std::panic::set_hook(Box::new(tracing_panic::panic_hook));
    });
}
