//! Price display. Rounding happens only here; the estimator keeps full
//! precision.

/// Format a RON amount with two decimals and a comma separator, e.g. `46,50 RON`.
///
/// Amounts that round to zero print as `0,00 RON`, never `-0,00 RON`.
pub fn format_price(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = match text.strip_prefix('-') {
        Some(magnitude) if magnitude.bytes().all(|b| b == b'0' || b == b'.') => magnitude,
        _ => text.as_str(),
    };
    format!("{} RON", text.replacen('.', ",", 1))
}
