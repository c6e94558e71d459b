//! Process-wide log output and metric catalogue for `folio serve`.
//!
//! The subscriber writes one line per event to stdout, either compact text
//! for terminals or JSON for collectors. Span traces are captured so error
//! reports logged by the HTTP middleware carry their call path.

use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing::Subscriber;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
};

use crate::application::posts::PAGE_POSTS_HISTOGRAM;
use crate::config::{LogFormat, LoggingSettings};

use super::cache::{CACHE_EVICT_TOTAL, CACHE_HIT_TOTAL, CACHE_MISS_TOTAL};
use super::error::InfraError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetricKind {
    Counter,
    Histogram,
}

/// Every metric folio records, with the help text exporters show for it.
const CATALOGUE: &[(MetricKind, &str, &str)] = &[
    (
        MetricKind::Counter,
        CACHE_HIT_TOTAL,
        "Locale snapshots answered from memory.",
    ),
    (
        MetricKind::Counter,
        CACHE_MISS_TOTAL,
        "Locale snapshots read from posts.toml.",
    ),
    (
        MetricKind::Counter,
        CACHE_EVICT_TOTAL,
        "Locale snapshots pushed out by a newer locale.",
    ),
    (
        MetricKind::Histogram,
        PAGE_POSTS_HISTOGRAM,
        "Posts per served page, including month extension.",
    ),
];

static CATALOGUE_REGISTERED: Once = Once::new();

/// Install the global subscriber. `RUST_LOG` directives refine the configured level.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    register_catalogue();

    tracing_subscriber::registry()
        .with(level_filter(logging))
        .with(ErrorLayer::default())
        .with(output_layer(logging.format))
        .try_init()
        .map_err(|err| InfraError::telemetry(format!("could not install tracing subscriber: {err}")))
}

fn level_filter(logging: &LoggingSettings) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy()
}

fn output_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    match format {
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    }
}

fn register_catalogue() {
    CATALOGUE_REGISTERED.call_once(|| {
        for &(kind, name, help) in CATALOGUE {
            match kind {
                MetricKind::Counter => describe_counter!(name, Unit::Count, help),
                MetricKind::Histogram => describe_histogram!(name, Unit::Count, help),
            }
        }
    });
}
