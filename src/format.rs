//! Number-to-text conversions used in generated messages and KPI values.
//!
//! Messages embed numbers in three styles:
//!
//! | Function | Style | Example |
//! |----------|-------|---------|
//! | [`plain_number`] | shortest round-trip | `1234.5` |
//! | [`to_fixed`] | fixed decimals, no grouping | `1234.50` |
//! | [`grouped`] | en-US grouping, trailing zeros trimmed | `1,234.5` |
//!
//! [`to_fixed`] rounds the exact binary value, so `10.065` (stored as
//! `10.06499…`) becomes `10.06`. [`grouped`] rounds the shortest decimal
//! form instead, so the same value becomes `10.07` at two digits. Both
//! round a true half upward. Non-finite values never panic: they render
//! as `NaN`, `Infinity` or `∞`.

/// Magnitudes at or above this print in exponent form.
const EXPONENT_ABOVE: f64 = 1e21;
/// Magnitudes below this print in exponent form.
const EXPONENT_BELOW: f64 = 1e-6;

/// Enough fractional digits to spell out any `f64` exactly.
const EXACT_FRACTION_DIGITS: usize = 1100;

/// Formats a number with the shortest representation that round-trips.
///
/// ```
/// use tabular_insight::format::plain_number;
///
/// assert_eq!(plain_number(100.0), "100");
/// assert_eq!(plain_number(0.1 + 0.2), "0.30000000000000004");
/// assert_eq!(plain_number(f64::NAN), "NaN");
/// assert_eq!(plain_number(1e21), "1e+21");
/// assert_eq!(plain_number(0.0000001), "1e-7");
/// ```
pub fn plain_number(value: f64) -> String {
    if let Some(s) = non_finite(value) {
        return s.to_string();
    }
    if value == 0.0 {
        // -0 prints as 0
        return "0".to_string();
    }
    let abs = value.abs();
    if abs >= EXPONENT_ABOVE || abs < EXPONENT_BELOW {
        let s = format!("{value:e}");
        return match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => s,
        };
    }
    format!("{value}")
}

/// Formats a number with exactly `digits` fractional digits.
///
/// ```
/// use tabular_insight::format::to_fixed;
///
/// assert_eq!(to_fixed(1.23456, 2), "1.23");
/// assert_eq!(to_fixed(2.5, 0), "3");
/// assert_eq!(to_fixed(-12.25, 1), "-12.3");
/// assert_eq!(to_fixed(f64::INFINITY, 1), "Infinity");
/// assert_eq!(to_fixed(10.065, 2), "10.06");
/// ```
pub fn to_fixed(value: f64, digits: usize) -> String {
    if let Some(s) = non_finite(value) {
        return s.to_string();
    }
    if value.abs() >= EXPONENT_ABOVE {
        return plain_number(value);
    }
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let body = round_half_up(&exact, digits);
    if value < 0.0 {
        format!("-{body}")
    } else {
        body
    }
}

/// Formats a number with en-US thousands separators and at most
/// `max_fraction_digits` fractional digits (trailing zeros trimmed).
///
/// ```
/// use tabular_insight::format::grouped;
///
/// assert_eq!(grouped(1234567.891, 0), "1,234,568");
/// assert_eq!(grouped(1234.5, 3), "1,234.5");
/// assert_eq!(grouped(-950.0, 0), "-950");
/// assert_eq!(grouped(f64::INFINITY, 0), "∞");
/// ```
pub fn grouped(value: f64, max_fraction_digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let fixed = round_half_up(&format!("{}", value.abs()), max_fraction_digits);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value < 0.0 {
        out.push('-');
    }
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Truncates a label to at most `max_chars` characters.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    label.chars().take(max_chars).collect()
}

fn non_finite(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("NaN")
    } else if value == f64::INFINITY {
        Some("Infinity")
    } else if value == f64::NEG_INFINITY {
        Some("-Infinity")
    } else {
        None
    }
}

/// Rounds a plain non-negative decimal string to `digits` fractional
/// digits, rounding up when the first dropped digit is 5 or more.
fn round_half_up(decimal: &str, digits: usize) -> String {
    let (int_part, frac) = decimal.split_once('.').unwrap_or((decimal, ""));
    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac.bytes().chain(std::iter::repeat(b'0')).take(digits))
        .collect();

    if frac.as_bytes().get(digits).is_some_and(|&d| d >= b'5') {
        let mut carry = true;
        for d in kept.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, b'1');
        }
    }

    let split = kept.len() - digits;
    let mut out: String = kept[..split].iter().map(|&b| char::from(b)).collect();
    if digits > 0 {
        out.push('.');
        out.extend(kept[split..].iter().map(|&b| char::from(b)));
    }
    out
}
