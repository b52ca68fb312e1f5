//! Log and span output for the `chatgraph` binary.
//!
//! Every process logs to stderr through a `fmt` layer. With `--otel` the same
//! spans are also exported as OpenTelemetry data on stdout, which is enough to
//! inspect `gen_ai.complete` timings locally without a collector.
//!
//! ```no_run
//! chatgraph_observe::tracing_setup::init_tracing(false, "info").unwrap();
//! ```

use std::sync::OnceLock;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const TRACER_NAME: &str = "chatgraph";

/// Set only when span export is on; `shutdown_tracing` flushes it.
static EXPORT_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// `RUST_LOG` wins over the verbosity-derived default.
pub fn build_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

fn stdout_export_provider() -> SdkTracerProvider {
    let provider = SdkTracerProvider::builder()
        .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
        .build();
    let _ = EXPORT_PROVIDER.set(provider.clone());
    opentelemetry::global::set_tracer_provider(provider.clone());
    provider
}

/// Install the global subscriber.
///
/// Span close events are logged, so each model call reports its duration.
/// Fails if a subscriber is already installed.
pub fn init_tracing(
    enable_otel: bool,
    default_filter: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let log_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE);

    let export_layer = enable_otel.then(|| {
        let tracer = stdout_export_provider().tracer(TRACER_NAME);
        tracing_opentelemetry::layer().with_tracer(tracer)
    });

    tracing_subscriber::registry()
        .with(build_filter(default_filter))
        .with(log_layer)
        .with(export_layer)
        .try_init()?;

    Ok(())
}

/// Flush exported spans before exit. Does nothing without `--otel`.
pub fn shutdown_tracing() {
    let Some(provider) = EXPORT_PROVIDER.get() else {
        return;
    };
    if let Err(e) = provider.shutdown() {
        eprintln!("Warning: span export shutdown failed: {e}");
    }
}
