use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logger system
pub fn init() {
    // Default to INFO and above unless RUST_LOG overrides
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::Layer::new()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    // Use try_init to avoid crash on re-initialization
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(console_layer)
        .try_init();
}
