use chrono::{DateTime, Datelike, Local, NaiveDate};

/// Calendar date (UTC) of a unix timestamp, `YYYY-MM-DD`.
pub fn format_unix_date(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map_or_else(|| "-".to_owned(), |dt| dt.format("%Y-%m-%d").to_string())
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// First and last day of the month containing `date`.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date.with_day0(0).unwrap_or(date);
    let end = start
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date);
    (start, end)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{format_unix_date, month_bounds};

    #[test]
    fn formats_unix_dates() {
        assert_eq!(format_unix_date(0), "1970-01-01");
        assert_eq!(format_unix_date(1_767_225_600), "2026-01-01");
    }

    #[test]
    fn month_bounds_cover_the_whole_month() {
        let date = NaiveDate::from_ymd_opt(2028, 2, 17).expect("valid date");
        let (start, end) = month_bounds(date);
        assert_eq!(start, NaiveDate::from_ymd_opt(2028, 2, 1).expect("valid date"));
        assert_eq!(end, NaiveDate::from_ymd_opt(2028, 2, 29).expect("valid date"));
    }
}
