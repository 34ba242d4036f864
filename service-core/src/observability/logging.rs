use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{Resource, runtime, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Settings for [`init_tracing`].
#[derive(Debug, Clone)]
pub struct TracingOptions<'a> {
    pub service_name: &'a str,
    /// Filter directive used when `RUST_LOG` is unset.
    pub log_level: &'a str,
    /// OTLP collector endpoint. Spans are only exported when this is set.
    pub otlp_endpoint: Option<&'a str>,
}

fn otlp_tracer(service_name: &str, endpoint: &str) -> Option<sdktrace::Tracer> {
    let otlp_exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(endpoint);

    match opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(otlp_exporter)
        .with_trace_config(sdktrace::config().with_resource(Resource::new(vec![
            KeyValue::new("service.name", service_name.to_string()),
        ])))
        .install_batch(runtime::Tokio)
    {
        Ok(tracer) => Some(tracer),
        Err(e) => {
            eprintln!(
                "Failed to initialize OTLP tracer for service '{}' at endpoint '{}': {}",
                service_name, endpoint, e
            );
            None
        }
    }
}

/// Install the global subscriber: env filter, JSON log lines and, when an
/// endpoint is configured, an OpenTelemetry export layer.
pub fn init_tracing(options: TracingOptions<'_>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(options.log_level));

    let telemetry = options
        .otlp_endpoint
        .and_then(|endpoint| otlp_tracer(options.service_name, endpoint))
        .map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer));

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(telemetry)
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .json()
                .flatten_event(true),
        )
        .try_init();

    if let Err(e) = result {
        eprintln!(
            "Tracing already initialized for service '{}': {}",
            options.service_name, e
        );
    }
}
