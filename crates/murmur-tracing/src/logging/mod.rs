mod writer;

pub use self::writer::ConsoleWriter;

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use crate::{make_env_filter, Logging, LoggingStyle};

pub fn console_layer<S>(config: &Logging) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    let ansi = config.stream.supports_color();
    common_layer(config.stream, ansi, config.style, &config.targets)
}

pub(crate) fn common_layer<S>(
    maker: impl for<'w> MakeWriter<'w> + Send + Sync + 'static,
    ansi: bool,
    style: LoggingStyle,
    targets: &str,
) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    let filter = make_env_filter(targets);
    let layer = tracing_subscriber::fmt::layer()
        .with_ansi(ansi)
        .with_writer(maker);

    match style {
        LoggingStyle::Compact => layer.compact().with_filter(filter).boxed(),
        LoggingStyle::Full => layer.with_filter(filter).boxed(),
        LoggingStyle::Pretty => layer.pretty().with_filter(filter).boxed(),
        LoggingStyle::Json => layer
            .json()
            .flatten_event(true)
            .with_filter(filter)
            .boxed(),
    }
}
