//! crates/logging/src/tracing_bridge.rs
//! Subscriber setup turning a [`VerbosityConfig`] into tracing filters.
//!
//! Events are formatted by a `tracing-subscriber` fmt layer and filtered by an
//! [`EnvFilter`] built from [`VerbosityConfig::filter_directives`]. A
//! non-empty `RUST_LOG` replaces the derived directives entirely.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logging::{VerbosityConfig, init_tracing};
//!
//! let config = VerbosityConfig::from_verbose_level(2);
//! init_tracing(&config).expect("no subscriber installed yet");
//!
//! tracing::debug!(target: "fletcher::select", "selected avx2");
//! ```

use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use super::config::VerbosityConfig;

/// Filter for `config`, unless `RUST_LOG` holds valid directives.
#[must_use]
pub fn env_filter(config: &VerbosityConfig) -> EnvFilter {
    std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(config.filter_directives()))
}

/// Builds a subscriber writing filtered events to `writer`.
pub fn subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
            .without_time(),
    )
}

/// Installs the global subscriber for `config`, writing to standard error.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_tracing(config: &VerbosityConfig) -> Result<(), TryInitError> {
    subscriber(env_filter(config), std::io::stderr).try_init()
}
