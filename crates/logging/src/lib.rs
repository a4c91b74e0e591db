#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` maps the command-line verbosity flags of `fletcher4sum` onto
//! tracing filters. The checksum crates emit events with explicit targets
//! (`fletcher::select`, `fletcher::bench`, `platform::simd`, `fletcher4sum`)
//! and never install a subscriber themselves.
//!
//! # Design
//!
//! - [`DiagFlag`] names one diagnostic category per tracing target and
//!   [`DiagLevels`] stores a level for each.
//! - [`VerbosityConfig::from_verbose_level`] turns a `-v` count into levels;
//!   [`VerbosityConfig::apply_flag`] adjusts single categories.
//! - With the `tracing` feature, `init_tracing` installs a
//!   `tracing-subscriber` registry with an `EnvFilter` derived from the
//!   configuration and a fmt layer writing to standard error.
//!
//! # Invariants
//!
//! - Warnings are always shown unless the configuration is quiet.
//! - `RUST_LOG`, when set to valid directives, takes precedence over the
//!   derived filter.
//!
//! # Examples
//!
//! ```
//! use logging::{DiagFlag, VerbosityConfig};
//!
//! let mut config = VerbosityConfig::from_verbose_level(1);
//! config.apply_flag("simd2").unwrap();
//!
//! assert_eq!(config.diag.get(DiagFlag::Simd), 2);
//! assert_eq!(
//!     config.filter_directives(),
//!     "warn,fletcher::select=info,platform::simd=debug,fletcher4sum=info"
//! );
//! ```

mod config;
mod levels;
#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use config::{FlagParseError, VerbosityConfig};
pub use levels::{DiagFlag, DiagLevels, level_name};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{env_filter, init_tracing, subscriber};
