use error_stack::{Result, ResultExt};
use std::sync::Once;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

mod config;
pub mod logging;

pub use self::config::{
    ConsoleStream, InvalidConsoleStream, InvalidLoggingStyle, Logging, LoggingStyle,
};

#[derive(Debug, Error)]
#[error("Failed to initialize tracing")]
pub struct TracingInitError;

/// Installs the global subscriber from the logging configuration.
///
/// Span traces are captured for every error produced inside an
/// instrumented function, so [`tracing_error::ErrorLayer`] is always
/// part of the registry.
pub fn init(config: &Logging) -> Result<(), TracingInitError> {
    let console = self::logging::console_layer(config);
    let registry = tracing_subscriber::Registry::default()
        .with(console)
        .with(tracing_error::ErrorLayer::default());

    tracing::subscriber::set_global_default(registry)
        .change_context(TracingInitError)
        .attach_printable("already initialized tracing")?;

    Ok(())
}

pub fn init_for_tests() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let targets = std::env::var("RUST_LOG").unwrap_or_default();
        let console = self::logging::common_layer(
            ConsoleStream::TestWriter,
            false,
            LoggingStyle::Full,
            &targets,
        );

        let registry = tracing_subscriber::Registry::default()
            .with(console)
            .with(tracing_error::ErrorLayer::default());

        // another test harness may have installed its own subscriber
        tracing::subscriber::set_global_default(registry).ok();
    });
}

fn make_env_filter(targets: &str) -> EnvFilter {
    let default_level = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .parse_lossy(targets)
}
