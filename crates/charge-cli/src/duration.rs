//! Parsing of Go-style duration strings such as `240h`, `30m` or `1h30m`.
//!
//! A duration is an optional sign followed by one or more decimal numbers,
//! each with a unit suffix: `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`.
//! Fractions are allowed (`1.5h`). A bare `0` needs no unit.

use chrono::Duration;

const NANOS_PER_UNIT: [(&str, i128); 8] = [
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000),
    ("μs", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60 * 1_000_000_000),
    ("h", 3600 * 1_000_000_000),
];

/// Parse a duration string; the error is a message suitable for clap.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let invalid = || format!("invalid duration '{input}'");

    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };
    if rest == "0" {
        return Ok(Duration::zero());
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: i128 = 0;
    while !rest.is_empty() {
        let digits_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| format!("missing unit in duration '{input}'"))?;
        let (number, tail) = rest.split_at(digits_end);

        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);

        let scale = NANOS_PER_UNIT
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, scale)| *scale)
            .ok_or_else(|| format!("unknown unit '{unit}' in duration '{input}'"))?;

        total = total
            .checked_add(scaled(number, scale).ok_or_else(invalid)?)
            .ok_or_else(invalid)?;
        rest = tail;
    }

    let nanos = i64::try_from(if negative { -total } else { total })
        .map_err(|_| format!("duration '{input}' out of range"))?;
    Ok(Duration::nanoseconds(nanos))
}

/// `number * scale` for a decimal like `1.5`; fractional nanoseconds are truncated.
fn scaled(number: &str, scale: i128) -> Option<i128> {
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }

    let whole: i128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut value = whole.checked_mul(scale)?;

    let mut place = scale;
    for digit in fraction.chars() {
        let d = i128::from(digit.to_digit(10)?);
        place /= 10;
        if place == 0 {
            break;
        }
        value = value.checked_add(d * place)?;
    }
    Some(value)
}
