use chrono::NaiveDate;

/// Parse a money amount into integer cents.
///
/// Accepts `1234.56`, `1.234,56`, `1,234.56`, `1234,5` and an optional `R$`
/// prefix. The right-most separator is the decimal one when both appear; a
/// lone `.` or `,` is decimal. Negative amounts and more than two decimal
/// digits are rejected.
pub fn parse_amount_cents(raw: &str) -> Option<i64> {
    let value = raw.trim();
    let value = value.strip_prefix("R$").unwrap_or(value);
    let compact: String = value.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    let decimal_idx = match (compact.rfind(','), compact.rfind('.')) {
        (Some(comma), Some(dot)) => Some(comma.max(dot)),
        (Some(comma), None) if compact.matches(',').count() == 1 => Some(comma),
        (None, Some(dot)) if compact.matches('.').count() == 1 => Some(dot),
        _ => None,
    };

    let (int_part, frac_part) = match decimal_idx {
        Some(idx) => (&compact[..idx], &compact[idx + 1..]),
        None => (compact.as_str(), ""),
    };

    if frac_part.len() > 2 || !frac_part.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }

    let int_digits: String = int_part
        .chars()
        .filter(|ch| *ch != '.' && *ch != ',')
        .collect();
    if int_digits.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }

    let reais = if int_digits.is_empty() {
        0
    } else {
        int_digits.parse::<i64>().ok()?
    };
    let cents = match frac_part.len() {
        0 => 0,
        1 => frac_part.parse::<i64>().ok()? * 10,
        _ => frac_part.parse::<i64>().ok()?,
    };

    reais.checked_mul(100)?.checked_add(cents)
}

/// Parse `YYYY-MM-DD` or `DD/MM/YYYY`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d/%m/%Y"))
        .ok()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{parse_amount_cents, parse_date};

    #[test]
    fn parses_common_amount_formats() {
        assert_eq!(parse_amount_cents("1234.56"), Some(123_456));
        assert_eq!(parse_amount_cents("1.234,56"), Some(123_456));
        assert_eq!(parse_amount_cents("1,234.56"), Some(123_456));
        assert_eq!(parse_amount_cents("1234,5"), Some(123_450));
        assert_eq!(parse_amount_cents("R$ 10"), Some(1_000));
        assert_eq!(parse_amount_cents("1.234.567"), Some(123_456_700));
        assert_eq!(parse_amount_cents(",50"), Some(50));
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert_eq!(parse_amount_cents(""), None);
        assert_eq!(parse_amount_cents("R$"), None);
        assert_eq!(parse_amount_cents("-5"), None);
        assert_eq!(parse_amount_cents("12.345"), None);
        assert_eq!(parse_amount_cents("abc"), None);
        assert_eq!(parse_amount_cents("99999999999999999999"), None);
    }

    #[test]
    fn parses_dates() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 15).expect("valid date");
        assert_eq!(parse_date("2026-03-15"), Some(expected));
        assert_eq!(parse_date(" 15/03/2026 "), Some(expected));
        assert_eq!(parse_date("2026-02-30"), None);
        assert_eq!(parse_date("tomorrow"), None);
    }
}
