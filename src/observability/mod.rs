//! Structured logging setup

use tracing_subscriber::{
    fmt, layer::SubscriberExt, registry::Registry, util::SubscriberInitExt, util::TryInitError,
    EnvFilter, Layer,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `log_level`. `format` is one of `json`, `compact` or
/// `pretty`; anything else falls back to the default human-readable output.
pub fn init_observability(log_level: &str, format: &str) -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(output_layer(format))
        .with(env_filter)
        .try_init()
}

fn output_layer(format: &str) -> BoxedLayer {
    match format {
        "json" => fmt::layer().json().with_current_span(false).boxed(),
        "compact" => fmt::layer().compact().with_target(false).boxed(),
        _ => fmt::layer().pretty().boxed(),
    }
}
