//! Observability infrastructure for InkAR.
//!
//! Structured logging with consistent spans. This module provides an
//! initialization helper and span constructors shared by the catalog
//! and hydration code paths.

use std::sync::Once;
use tracing::Span;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Log output format.
#[derive(Debug, Clone, Copy, Default)]
pub enum LogFormat {
    /// JSON structured logs (for production).
    Json,
    /// Pretty-printed logs (for development).
    #[default]
    Pretty,
}

/// Initializes the logging subsystem.
///
/// Call once at application startup. Safe to call multiple times;
/// subsequent calls are no-ops.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Controls log levels (e.g., `info`, `inkar_catalog=debug`)
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        match format {
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().json())
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().pretty())
                    .init();
            }
        }
    });
}

/// Creates a span for catalog operations with standard fields.
#[must_use]
pub fn catalog_span(operation: &str, collection: &str) -> Span {
    tracing::info_span!("catalog", op = operation, collection = collection)
}

/// Creates a span for per-item image hydration.
#[must_use]
pub fn hydration_span(item_id: &str, url: &str) -> Span {
    tracing::info_span!("hydrate", item = item_id, url = url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_is_idempotent() {
        // Should not panic (uses Once internally)
        init_logging(LogFormat::Pretty);
        init_logging(LogFormat::Pretty);
    }

    #[test]
    fn catalog_span_enters() {
        let span = catalog_span("load", "tattoometa");
        let _guard = span.enter();
        tracing::info!("test message in span");
    }

    #[test]
    fn hydration_span_enters() {
        let span = hydration_span("tattoo-1", "https://example.com/a.png");
        let _guard = span.enter();
        tracing::info!("hydration message");
    }
}
