// Tue Jan 13 2026 - Alex

pub mod logging;

pub use logging::LoggingUtils;

/// Parses an address written in hex (`0x` prefix optional) or, with a
/// leading `#`, in decimal.
pub fn parse_address(s: &str) -> Option<u64> {
    let s = s.trim().replace('_', "");
    if let Some(decimal) = s.strip_prefix('#') {
        return decimal.parse().ok();
    }
    let hex = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(&s);
    if hex.is_empty() {
        return None;
    }
    u64::from_str_radix(hex, 16).ok()
}

pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
