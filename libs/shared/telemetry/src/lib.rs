// [libs/shared/telemetry/src/lib.rs]
#![deny(missing_docs)]

//! Structured tracing setup and a global panic hook shared by the Denul
//! binaries. One subscriber, installed once at startup: JSON in release
//! builds, compact human-readable output in debug builds.

use std::panic;
use tracing::{error, info, instrument};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as formatting_layer, EnvFilter};

/// Installs the global `tracing` subscriber and panic hook for `service_name`.
///
/// # Behavior
/// - Debug builds: compact, color-free output, no target module noise.
/// - Release builds: one JSON object per event.
///
/// # Panics
/// Panics if a global subscriber has already been installed.
#[instrument(skip_all)]
pub fn init_tracing(service_name: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "{service_name}={level},libsql=warn",
            level = if cfg!(debug_assertions) { "debug" } else { "info" }
        )
        .into()
    });

    if cfg!(debug_assertions) {
        tracing_subscriber::registry()
            .with(filter)
            .with(formatting_layer::layer().compact().with_target(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(formatting_layer::layer().json().flatten_event(true))
            .init();
    }

    let service = service_name.to_string();
    panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
            .unwrap_or("non-string panic payload");

        error!(
            target: "panic",
            service = %service,
            location = %location,
            "panic: {payload}"
        );
    }));

    info!(service = service_name, "telemetry online");
}
