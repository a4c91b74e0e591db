//! crates/logging/src/config.rs
//! Verbosity configuration derived from `-v`/`-q` flags.

use thiserror::Error;

use super::levels::{DiagFlag, DiagLevels, level_name};

/// Error returned for an unparsable `FLAG[LEVEL]` diagnostic specification.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown diagnostic flag `{spec}`; expected one of select, simd, bench, tool or all")]
pub struct FlagParseError {
    /// Specification as given.
    pub spec: String,
}

/// Combined verbosity configuration.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerbosityConfig {
    /// Suppress everything below errors.
    pub quiet: bool,
    /// Per-category levels.
    pub diag: DiagLevels,
}

impl VerbosityConfig {
    /// Create a new configuration from a `-v` count.
    ///
    /// | count | effect                                          |
    /// |-------|-------------------------------------------------|
    /// | 0     | warnings only                                   |
    /// | 1     | tool and selection info                         |
    /// | 2     | debug for selection, simd and tool; bench info  |
    /// | 3+    | trace for every category                        |
    #[must_use]
    pub const fn from_verbose_level(level: u8) -> Self {
        let diag = match level {
            0 => DiagLevels::uniform(0),
            1 => DiagLevels {
                select: 1,
                simd: 0,
                bench: 0,
                tool: 1,
            },
            2 => DiagLevels {
                select: 2,
                simd: 2,
                bench: 1,
                tool: 2,
            },
            _ => DiagLevels::uniform(3),
        };
        Self { quiet: false, diag }
    }

    /// Configuration for `--quiet`: errors only.
    #[must_use]
    pub const fn quiet() -> Self {
        Self {
            quiet: true,
            diag: DiagLevels::uniform(0),
        }
    }

    /// Applies a `FLAG[LEVEL]` specification such as `simd2` or `all`.
    ///
    /// A missing level means 1. `all` sets every category.
    ///
    /// # Errors
    ///
    /// Returns [`FlagParseError`] for unknown names and levels above 255.
    pub fn apply_flag(&mut self, spec: &str) -> Result<(), FlagParseError> {
        let spec = spec.trim();
        let split = spec
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(spec.len());
        let (name, digits) = spec.split_at(split);
        let level = if digits.is_empty() {
            1
        } else {
            digits.parse::<u8>().map_err(|_| FlagParseError {
                spec: spec.to_owned(),
            })?
        };

        if name == "all" {
            self.diag = DiagLevels::uniform(level);
            return Ok(());
        }
        let flag = DiagFlag::from_name(name).ok_or_else(|| FlagParseError {
            spec: spec.to_owned(),
        })?;
        self.diag.set(flag, level);
        Ok(())
    }

    /// Level applied to targets without a category level.
    #[must_use]
    pub const fn base_level(&self) -> &'static str {
        if self.quiet { "error" } else { "warn" }
    }

    /// `EnvFilter`-style directives for this configuration, e.g.
    /// `warn,fletcher::select=debug`.
    #[must_use]
    pub fn filter_directives(&self) -> String {
        let mut directives = String::from(self.base_level());
        if self.quiet {
            return directives;
        }
        for flag in DiagFlag::ALL {
            if let Some(level) = level_name(self.diag.get(flag)) {
                directives.push(',');
                directives.push_str(flag.target());
                directives.push('=');
                directives.push_str(level);
            }
        }
        directives
    }
}
