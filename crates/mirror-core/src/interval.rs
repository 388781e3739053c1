//! Check interval parsing
//!
//! Accepts duration strings made of one or more `<number><unit>` groups,
//! such as `10ms`, `90s`, `1h30m` or `1.5h`. Units are `ns`, `us` (or `µs`),
//! `ms`, `s`, `m` and `h`. A bare `0` is the only unitless value accepted.

use std::time::Duration;

use crate::{Error, Result};

const UNITS: &[(&str, u128)] = &[
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000),
    ("μs", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60_000_000_000),
    ("h", 3_600_000_000_000),
];

// Fraction digits beyond this cannot change a nanosecond count.
const MAX_FRACTION_DIGITS: usize = 18;

/// Parse a duration string. Negative durations are rejected; zero is allowed.
pub fn parse_interval(value: &str) -> Result<Duration> {
    parse_nanos(value)
        .map(Duration::from_nanos)
        .map_err(|reason| Error::InvalidInterval {
            value: value.to_string(),
            reason,
        })
}

fn parse_nanos(value: &str) -> std::result::Result<u64, String> {
    let (negative, mut rest) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    if rest == "0" {
        return Ok(0);
    }
    if rest.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_part, after) = rest.split_at(int_len);
        let (frac_part, after) = match after.strip_prefix('.') {
            Some(tail) => tail.split_at(tail.bytes().take_while(u8::is_ascii_digit).count()),
            None => ("", after),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(format!("expected a number at {rest:?}"));
        }

        let unit_len = after
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after.len());
        let (unit, tail) = after.split_at(unit_len);
        if unit.is_empty() {
            return Err("missing unit".to_string());
        }
        let scale = UNITS
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, scale)| *scale)
            .ok_or_else(|| format!("unknown unit {unit:?}"))?;

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| "value out of range".to_string())?
        };
        let mut nanos = whole
            .checked_mul(scale)
            .ok_or_else(|| "value out of range".to_string())?;

        if !frac_part.is_empty() {
            let digits = &frac_part[..frac_part.len().min(MAX_FRACTION_DIGITS)];
            let fraction: u128 = digits
                .parse()
                .map_err(|_| "value out of range".to_string())?;
            nanos += fraction * scale / 10u128.pow(digits.len() as u32);
        }

        total = total
            .checked_add(nanos)
            .ok_or_else(|| "value out of range".to_string())?;
        rest = tail;
    }

    let total = u64::try_from(total).map_err(|_| "value out of range".to_string())?;
    if negative && total > 0 {
        return Err("interval must not be negative".to_string());
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("10ms", Duration::from_millis(10))]
    #[case("90s", Duration::from_secs(90))]
    #[case("1h30m", Duration::from_secs(5400))]
    #[case("1.5s", Duration::from_millis(1500))]
    #[case(".5m", Duration::from_secs(30))]
    #[case("2h45m30.5s", Duration::from_millis(9_930_500))]
    #[case("250us", Duration::from_micros(250))]
    #[case("250µs", Duration::from_micros(250))]
    #[case("7ns", Duration::from_nanos(7))]
    #[case("+1m", Duration::from_secs(60))]
    #[case("0", Duration::ZERO)]
    #[case("0s", Duration::ZERO)]
    #[case("-0", Duration::ZERO)]
    fn parses_valid_intervals(#[case] input: &str, #[case] expected: Duration) {
        assert_eq!(parse_interval(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("10")]
    #[case("5x")]
    #[case("-1s")]
    #[case("1h-")]
    #[case(".s")]
    #[case("99999999999999999999h")]
    fn rejects_invalid_intervals(#[case] input: &str) {
        let err = parse_interval(input).unwrap_err();
        assert!(
            matches!(err, Error::InvalidInterval { ref value, .. } if value == input),
            "unexpected error: {err}"
        );
    }

    proptest! {
        #[test]
        fn whole_seconds_round_trip(secs in 0u64..1_000_000) {
            let parsed = parse_interval(&format!("{secs}s")).unwrap();
            prop_assert_eq!(parsed, Duration::from_secs(secs));
        }

        #[test]
        fn hours_and_minutes_compose(h in 0u64..1000, m in 0u64..60) {
            let parsed = parse_interval(&format!("{h}h{m}m")).unwrap();
            prop_assert_eq!(parsed, Duration::from_secs(h * 3600 + m * 60));
        }
    }
}
