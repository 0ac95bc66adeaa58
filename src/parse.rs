use chrono::NaiveDate;

/// Strip comma thousands separators and attempt an integer parse.
/// `None` means the field carried no usable number.
pub fn clean_number(raw: &str) -> Option<i64> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<i64>().ok()
}

/// Sum semantics: a malformed field contributes zero, never an error.
pub fn number_or_zero(raw: &str) -> i64 {
    clean_number(raw).unwrap_or(0)
}

/// Take the date token of a field like "07/01/20 1:00:00 AM" and expand a
/// two-digit year to four digits ("07/01/2020").
pub fn normalize_date(raw: &str) -> String {
    let token = raw.trim().split_whitespace().next().unwrap_or("");
    match token.rsplit_once('/') {
        Some((month_day, year)) if year.len() == 2 => format!("{month_day}/20{year}"),
        _ => token.to_string(),
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&normalize_date(raw), "%m/%d/%Y").ok()
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}
