//! Log subscriber setup shared by `certd` and `cert`.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber for a CERT binary.
///
/// `RUST_LOG` wins over `level` when set. `json` switches to one JSON object
/// per line. Later calls are no-ops.
pub fn init_tracing(json: bool, level: Level) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let registry = tracing_subscriber::registry().with(filter);
    let layer = fmt::layer().with_target(false);

    let installed = if json {
        registry.with(layer.json()).try_init()
    } else {
        registry.with(layer).try_init()
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Parse a log format name (`text` or `json`) into the `json` flag.
pub fn parse_log_format(format: &str) -> Option<bool> {
    match format.trim().to_ascii_lowercase().as_str() {
        "json" => Some(true),
        "text" | "pretty" | "" => Some(false),
        _ => None,
    }
}
