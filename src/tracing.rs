//! Tracing (logging)

use crate::cli::CommandLineArgs;

use opentelemetry::global;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initlialise tracing (logging)
///
/// Applies a filter based on the `RUST_LOG` environment variable, falling back to enable info
/// logging for this crate and tower_http if not set. When Jaeger is enabled, spans are also
/// exported to a Jaeger agent.
pub fn init_tracing(args: &CommandLineArgs) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "incentive_map=info,tower_http=info".into());
    let fmt_layer = tracing_subscriber::fmt::layer();
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    if args.enable_jaeger {
        global::set_text_map_propagator(opentelemetry_jaeger::Propagator::new());
        match opentelemetry_jaeger::new_agent_pipeline()
            .with_service_name("incentive-map")
            .install_batch(opentelemetry::runtime::Tokio)
        {
            Ok(tracer) => {
                registry
                    .with(tracing_opentelemetry::layer().with_tracer(tracer))
                    .init();
            }
            Err(err) => {
                registry.init();
                tracing::error!("Failed to initialise Jaeger tracer: {}", err);
            }
        }
    } else {
        registry.init();
    }
}

/// Flush and shut down any span exporter.
pub fn shutdown_tracing() {
    global::shutdown_tracer_provider();
}
