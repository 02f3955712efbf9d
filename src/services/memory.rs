//! Memory size normalization.
//!
//! Backends report memory as KiB, MiB or GiB without saying which. The unit
//! is inferred from the magnitude of the first number in the value; the
//! breakpoints are strict, so a value sitting exactly on a threshold
//! belongs to the lower bracket.

use regex::Regex;
use std::sync::OnceLock;

/// Above this a value is read as kibibytes.
pub const KIB_THRESHOLD: f64 = 10_000_000.0;
/// Above this (and up to [`KIB_THRESHOLD`]) a value is read as mebibytes.
pub const MIB_THRESHOLD: f64 = 100_000.0;

const KIB_PER_GIB: f64 = 1_048_576.0;
const MIB_PER_GIB: f64 = 1_024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryUnit {
    Kibibytes,
    Mebibytes,
    Gibibytes,
}

impl MemoryUnit {
    pub fn infer(n: f64) -> MemoryUnit {
        if n > KIB_THRESHOLD {
            MemoryUnit::Kibibytes
        } else if n > MIB_THRESHOLD {
            MemoryUnit::Mebibytes
        } else {
            MemoryUnit::Gibibytes
        }
    }

    pub fn to_gib(self, n: f64) -> f64 {
        match self {
            MemoryUnit::Kibibytes => n / KIB_PER_GIB,
            MemoryUnit::Mebibytes => n / MIB_PER_GIB,
            MemoryUnit::Gibibytes => n,
        }
    }
}

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?\d+(?:[.,]\d+)?").expect("valid number regex"))
}

/// First number in the text (`,` accepted as decimal separator), only if
/// it is finite and positive.
pub fn extract_magnitude(raw: &str) -> Option<f64> {
    let m = number_regex().find(raw.trim())?;
    let n: f64 = m.as_str().replace(',', ".").parse().ok()?;
    if n.is_finite() && n > 0.0 {
        Some(n)
    } else {
        None
    }
}

/// Gigabytes as a fractional number, `0.0` when the value has no usable
/// number. Callers round up when they build a label.
pub fn memory_to_gb(raw: &str) -> f64 {
    match extract_magnitude(raw) {
        Some(n) => MemoryUnit::infer(n).to_gib(n),
        None => 0.0,
    }
}

/// Display form: whole gigabytes rounded up with a ` GB` suffix, or the
/// input unchanged when it holds no positive number.
pub fn format_memory_gb(raw: &str) -> String {
    match extract_magnitude(raw) {
        Some(n) => format!("{} GB", MemoryUnit::infer(n).to_gib(n).ceil() as u64),
        None => raw.to_string(),
    }
}

/// Chart bucket label for a memory value: `"<n> GB"` or `None` when the
/// value cannot be sized.
pub fn memory_bucket_label(raw: &str) -> Option<String> {
    let gb = memory_to_gb(raw);
    if gb > 0.0 {
        Some(format!("{} GB", gb.ceil() as u64))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kilobyte_values() {
        // 64 GiB reported in KiB by the Windows agent
        assert_eq!(format_memory_gb("67037080"), "64 GB");
        assert_eq!(format_memory_gb("10000001"), "10 GB");
    }

    #[test]
    fn megabyte_values() {
        assert_eq!(format_memory_gb("32768"), "32768 GB");
        assert_eq!(format_memory_gb("100001"), "98 GB");
        assert_eq!(format_memory_gb("10000000"), "9766 GB");
    }

    #[test]
    fn gigabyte_values_round_up() {
        assert_eq!(format_memory_gb("15.6"), "16 GB");
        assert_eq!(format_memory_gb("15,2 GB"), "16 GB");
        assert_eq!(format_memory_gb("100000"), "100000 GB");
        assert_eq!(format_memory_gb("Total 8 GB DDR4"), "8 GB");
    }

    #[test]
    fn unusable_values_are_echoed() {
        assert_eq!(format_memory_gb("n/a"), "n/a");
        assert_eq!(format_memory_gb("0"), "0");
        assert_eq!(format_memory_gb("-4"), "-4");
        assert_eq!(format_memory_gb(""), "");
    }

    #[test]
    fn numeric_variant_keeps_fraction() {
        assert!((memory_to_gb("1572864") - 1536.0).abs() < 1e-9);
        assert!((memory_to_gb("16777216") - 16.0).abs() < 1e-9);
        assert_eq!(memory_to_gb("garbage"), 0.0);
        assert_eq!(memory_bucket_label("garbage"), None);
        assert_eq!(memory_bucket_label("16777217").as_deref(), Some("17 GB"));
    }

    #[test]
    fn thresholds_are_strict() {
        assert_eq!(MemoryUnit::infer(KIB_THRESHOLD), MemoryUnit::Mebibytes);
        assert_eq!(MemoryUnit::infer(MIB_THRESHOLD), MemoryUnit::Gibibytes);
        assert_eq!(MemoryUnit::infer(MIB_THRESHOLD + 1.0), MemoryUnit::Mebibytes);
    }
}
