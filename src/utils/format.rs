//! Number formatting helpers for report lines

/// Formats `value` with `decimals` fractional digits and `,` as the
/// thousands separator, e.g. `1234567.891` with 2 decimals becomes
/// `1,234,567.89`.
///
/// Non-finite values are rendered the way `f64`'s `Display` renders them.
pub fn with_thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return format!("{}", value);
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Formats a ratio with a precision that depends on its magnitude
///
/// | range        | decimals |
/// |--------------|----------|
/// | `< 0.01`     | 4        |
/// | `< 1`        | 3        |
/// | `< 100`      | 2        |
/// | `>= 100`     | 1        |
pub fn banded(value: f64) -> String {
    if value < 0.01 {
        format!("{:.4}", value)
    } else if value < 1.0 {
        format!("{:.3}", value)
    } else if value < 100.0 {
        format!("{:.2}", value)
    } else {
        format!("{:.1}", value)
    }
}
