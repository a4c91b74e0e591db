use std::fmt;
use std::sync::OnceLock;

/// Vector instruction-set extensions the checksum kernels can target.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum VectorFeature {
    /// x86 SSE2 (128-bit integer vectors).
    Sse2,
    /// x86 SSSE3 (adds byte shuffles).
    Ssse3,
    /// x86 AVX2 (256-bit integer vectors).
    Avx2,
    /// ARM Advanced SIMD on aarch64.
    Neon,
}

impl VectorFeature {
    /// Lower-case name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sse2 => "sse2",
            Self::Ssse3 => "ssse3",
            Self::Avx2 => "avx2",
            Self::Neon => "neon",
        }
    }
}

impl fmt::Display for VectorFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct CpuFeatures {
    sse2: bool,
    ssse3: bool,
    avx2: bool,
    neon: bool,
}

static CPU_FEATURES: OnceLock<CpuFeatures> = OnceLock::new();

/// Reports whether the running CPU implements `feature`.
///
/// The CPU is queried on first use and the result cached for the lifetime of
/// the process. Features that belong to a different architecture than the
/// compilation target always report `false`.
#[must_use]
pub fn cpu_supports(feature: VectorFeature) -> bool {
    let features = CPU_FEATURES.get_or_init(|| {
        let detected = detect();
        tracing::debug!(
            target: "platform::simd",
            sse2 = detected.sse2,
            ssse3 = detected.ssse3,
            avx2 = detected.avx2,
            neon = detected.neon,
            "detected CPU vector features"
        );
        detected
    });

    match feature {
        VectorFeature::Sse2 => features.sse2,
        VectorFeature::Ssse3 => features.ssse3,
        VectorFeature::Avx2 => features.avx2,
        VectorFeature::Neon => features.neon,
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn detect() -> CpuFeatures {
    CpuFeatures {
        sse2: std::arch::is_x86_feature_detected!("sse2"),
        ssse3: std::arch::is_x86_feature_detected!("ssse3"),
        avx2: std::arch::is_x86_feature_detected!("avx2"),
        neon: false,
    }
}

#[cfg(target_arch = "aarch64")]
fn detect() -> CpuFeatures {
    CpuFeatures {
        neon: std::arch::is_aarch64_feature_detected!("neon"),
        ..CpuFeatures::default()
    }
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
fn detect() -> CpuFeatures {
    CpuFeatures::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_is_stable_across_calls() {
        for feature in [
            VectorFeature::Sse2,
            VectorFeature::Ssse3,
            VectorFeature::Avx2,
            VectorFeature::Neon,
        ] {
            assert_eq!(cpu_supports(feature), cpu_supports(feature));
        }
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn sse2_is_baseline_on_x86_64() {
        assert!(cpu_supports(VectorFeature::Sse2));
        assert!(!cpu_supports(VectorFeature::Neon));
    }

    #[cfg(target_arch = "aarch64")]
    #[test]
    fn x86_features_absent_on_aarch64() {
        assert!(!cpu_supports(VectorFeature::Sse2));
        assert!(!cpu_supports(VectorFeature::Avx2));
    }

    #[test]
    fn avx2_matches_std_detection() {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        assert_eq!(
            cpu_supports(VectorFeature::Avx2),
            std::arch::is_x86_feature_detected!("avx2")
        );
        #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
        assert!(!cpu_supports(VectorFeature::Avx2));
    }

    #[test]
    fn names_are_lowercase() {
        assert_eq!(VectorFeature::Ssse3.to_string(), "ssse3");
        assert_eq!(VectorFeature::Neon.name(), "neon");
    }
}
