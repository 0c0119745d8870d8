//! Human-readable byte rates

use core::fmt::Write;

use heapless::String;

/// Capacity of a humanized rate ("1023.99 Kb")
pub const RATE_TEXT_LEN: usize = 16;

const UNITS: [&str; 9] = ["b", "Kb", "Mb", "Gb", "Tb", "Pb", "Eb", "Zb", "Yb"];

/// Format a byte count with a binary unit suffix
///
/// Picks the largest unit not exceeding the value and prints two decimals;
/// plain bytes are printed as an integer. Values below one byte print as
/// `"0 b"`.
pub fn humanize_bytes(value: f32) -> String<RATE_TEXT_LEN> {
    let mut out = String::new();

    if value.is_nan() || value <= 0.0 {
        out.push_str("0 b").ok();
        return out;
    }

    let mut scaled = value;
    let mut unit = 0;
    while scaled >= 1024.0 && unit < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        // Round to two decimals first so 1023.999 shows as 1024
        let whole = (scaled * 100.0 + 0.5) as u64 / 100;
        write!(out, "{} b", whole).ok();
    } else {
        write!(out, "{:.2} {}", scaled, UNITS[unit]).ok();
    }
    out
}
