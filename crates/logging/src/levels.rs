//! crates/logging/src/levels.rs
//! Diagnostic categories and their per-category verbosity levels.

/// Diagnostic categories, one per tracing target emitted by the workspace.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagFlag {
    /// Backend selection and implementation overrides.
    Select,
    /// CPU feature detection and vector execution policy.
    Simd,
    /// Backend throughput measurements.
    Bench,
    /// Command-line tool progress.
    Tool,
}

impl DiagFlag {
    /// Every category, in display order.
    pub const ALL: [Self; 4] = [Self::Select, Self::Simd, Self::Bench, Self::Tool];

    /// Name accepted by [`VerbosityConfig::apply_flag`](crate::VerbosityConfig::apply_flag).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Simd => "simd",
            Self::Bench => "bench",
            Self::Tool => "tool",
        }
    }

    /// Tracing target the category controls.
    #[must_use]
    pub const fn target(self) -> &'static str {
        match self {
            Self::Select => "fletcher::select",
            Self::Simd => "platform::simd",
            Self::Bench => "fletcher::bench",
            Self::Tool => "fletcher4sum",
        }
    }

    /// Looks a category up by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.name() == name)
    }
}

/// Verbosity level per diagnostic category.
///
/// Level 0 leaves the category at the base level, 1 enables info events,
/// 2 debug events and 3 or more trace events.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiagLevels {
    /// Backend selection level.
    pub select: u8,
    /// Vector execution level.
    pub simd: u8,
    /// Benchmark level.
    pub bench: u8,
    /// Command-line tool level.
    pub tool: u8,
}

impl DiagLevels {
    /// Every category at `level`.
    #[must_use]
    pub const fn uniform(level: u8) -> Self {
        Self {
            select: level,
            simd: level,
            bench: level,
            tool: level,
        }
    }

    /// Level of `flag`.
    #[must_use]
    pub const fn get(&self, flag: DiagFlag) -> u8 {
        match flag {
            DiagFlag::Select => self.select,
            DiagFlag::Simd => self.simd,
            DiagFlag::Bench => self.bench,
            DiagFlag::Tool => self.tool,
        }
    }

    /// Sets the level of `flag`.
    pub const fn set(&mut self, flag: DiagFlag, level: u8) {
        match flag {
            DiagFlag::Select => self.select = level,
            DiagFlag::Simd => self.simd = level,
            DiagFlag::Bench => self.bench = level,
            DiagFlag::Tool => self.tool = level,
        }
    }
}

/// Tracing level name for a category level, or `None` for level 0.
#[must_use]
pub const fn level_name(level: u8) -> Option<&'static str> {
    match level {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}
