//! Human-readable sizes
//!
//! Parsing of size arguments such as `4K`, `1M` or `2GiB`, and the
//! binary-scaled formatting used by the status line.

use crate::error::{Error, Result};

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;
const TIB: u64 = GIB * 1024;

/// Parse a size with an optional binary suffix (`K`, `M`, `G`, `T`)
///
/// The suffix is case-insensitive and may be followed by `B` or `iB`,
/// so `4k`, `4K`, `4KB` and `4KiB` all mean 4096. A bare number is bytes.
pub fn parse_size(s: &str) -> Result<u64> {
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::InvalidSize("empty string".to_string()));
    }

    let split_pos = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    let (num_str, suffix) = s.split_at(split_pos);

    let num: u64 = num_str
        .parse()
        .map_err(|_| Error::InvalidSize(s.to_string()))?;

    let multiplier = match suffix.trim_start().to_uppercase().as_str() {
        "" | "B" => 1,
        "K" | "KB" | "KIB" => KIB,
        "M" | "MB" | "MIB" => MIB,
        "G" | "GB" | "GIB" => GIB,
        "T" | "TB" | "TIB" => TIB,
        _ => return Err(Error::InvalidSize(s.to_string())),
    };

    num.checked_mul(multiplier)
        .ok_or_else(|| Error::InvalidSize(format!("{} is too large", s)))
}

/// Parse a size that must fit the given upper bound
pub fn parse_bounded_size(s: &str, max: u64) -> Result<u64> {
    let size = parse_size(s)?;
    if size > max {
        return Err(Error::InvalidSize(format!(
            "{} exceeds the maximum of {} bytes",
            s.trim(),
            max
        )));
    }
    Ok(size)
}

/// Format a byte rate with binary units (e.g., "1.5 MiB/s")
pub fn format_byte_rate(bytes_per_second: f64) -> String {
    let rate = if bytes_per_second.is_finite() {
        bytes_per_second.max(0.0)
    } else {
        0.0
    };

    if rate >= TIB as f64 {
        format!("{:.1} TiB/s", rate / TIB as f64)
    } else if rate >= GIB as f64 {
        format!("{:.1} GiB/s", rate / GIB as f64)
    } else if rate >= MIB as f64 {
        format!("{:.1} MiB/s", rate / MIB as f64)
    } else if rate >= KIB as f64 {
        format!("{:.1} KiB/s", rate / KIB as f64)
    } else {
        format!("{:.0} B/s", rate)
    }
}

/// Format a unit rate (lines, records, blocks) per second
pub fn format_unit_rate(per_second: f64) -> String {
    let rate = if per_second.is_finite() {
        per_second.max(0.0)
    } else {
        0.0
    };

    if rate >= 1_000_000.0 {
        format!("{:.1}M/s", rate / 1_000_000.0)
    } else if rate >= 10_000.0 {
        format!("{:.1}k/s", rate / 1_000.0)
    } else {
        format!("{:.1}/s", rate)
    }
}

/// Format elapsed run time (e.g., "42s", "3m 07s", "2h 05m")
pub fn format_elapsed(seconds: u64) -> String {
    if seconds >= 3600 {
        format!("{}h {:02}m", seconds / 3600, (seconds % 3600) / 60)
    } else if seconds >= 60 {
        format!("{}m {:02}s", seconds / 60, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}
