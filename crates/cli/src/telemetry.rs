//! Observability wiring.
//!
//! Installs one global `tracing` subscriber for the whole workspace:
//!
//! - an `EnvFilter` driven by `RUST_LOG` (default [`DEFAULT_FILTER`]);
//! - a formatting layer on stderr, JSON when `PUSHPREVIEW_LOG_JSON=1`, so
//!   stdout carries nothing but workflow commands;
//! - an OpenTelemetry OTLP span exporter when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.

use anyhow::Result;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::TracerProvider;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

pub const DEFAULT_FILTER: &str = "info";

const SERVICE_NAME: &str = "pushpreview-action";

/// Holds the span exporter alive until [`Telemetry::shutdown`].
pub struct Telemetry {
    provider: Option<TracerProvider>,
}

impl Telemetry {
    /// Flushes pending spans. Must run before the process exits.
    pub fn shutdown(self) {
        if let Some(provider) = self.provider {
            if let Err(e) = provider.shutdown() {
                tracing::warn!(error = %e, "Failed to flush OpenTelemetry spans");
            }
        }
    }
}

/// Installs the global subscriber.
///
/// Must be called from inside the tokio runtime when OTLP export is enabled.
pub fn init() -> Result<Telemetry> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json_logs = std::env::var("PUSHPREVIEW_LOG_JSON").unwrap_or_default() == "1";
    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = if json_logs {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };

    let otlp_enabled = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .map(|v| !v.is_empty())
        .unwrap_or(false);
    let provider = if otlp_enabled {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .build()?;
        Some(
            TracerProvider::builder()
                .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
                .build(),
        )
    } else {
        None
    };
    let otel_layer = provider
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer(SERVICE_NAME)));

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(otel_layer)
        .with(filter)
        .try_init()?;

    Ok(Telemetry { provider })
}
