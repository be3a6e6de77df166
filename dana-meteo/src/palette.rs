//! Stable per-station colors for the multi-station chart.

/// Palette the station hash indexes into.
pub const STATION_PALETTE: [&str; 15] = [
    "#60a5fa", "#f87171", "#fbbf24", "#34d399", "#a78bfa", "#f472b6", "#2dd4bf", "#fb923c",
    "#818cf8", "#f59e0b", "#10b981", "#8b5cf6", "#ef4444", "#3b82f6", "#ec4899",
];

/// JavaScript `ToInt32`: wrap a (whole) double modulo 2^32 into i32.
fn to_int32(value: f64) -> i32 {
    (value as i64) as i32
}

/// The classic `hash = c + ((hash << 5) - hash)` string hash, evaluated with
/// JavaScript number semantics over UTF-16 code units, so keys hash exactly
/// as they did in the published page.
pub fn station_hash(key: &str) -> f64 {
    let mut hash = 0.0_f64;
    for unit in key.encode_utf16() {
        let shifted = to_int32(hash).wrapping_shl(5) as f64;
        hash = unit as f64 + (shifted - hash);
    }
    hash
}

/// Color for a station key. Same key, same color, on every call and reload.
pub fn station_color(key: &str) -> &'static str {
    let index = (station_hash(key).abs() % STATION_PALETTE.len() as f64) as usize;
    STATION_PALETTE[index]
}

/// Append a two-digit hex alpha to a `#rrggbb` color (Chart.js fill tint).
pub fn with_alpha_suffix(color: &str, alpha_hex: &str) -> String {
    format!("{}{}", color, alpha_hex)
}
