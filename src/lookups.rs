use chrono::{Datelike, NaiveDate};

/// EIA balancing authorities the dashboard charts. Rows from any other
/// authority are dropped before aggregation.
pub const BALANCING_AUTHORITIES: &[&str] = &[
    "AECI", "AZPS", "BPAT", "CISO", "DUK", "ERCO", "FPL", "ISNE", "MISO",
    "NYIS", "PACE", "PJM", "SOCO", "SWPP", "TVA",
];

pub fn is_allowed_authority(code: &str) -> bool {
    BALANCING_AUTHORITIES.contains(&code.trim())
}

/// First Monday of each charted year. Multi-year series are aligned by
/// dropping every date before this, so all years start on the same weekday.
pub fn reference_start(year: i32) -> Option<NaiveDate> {
    let day = match year {
        2018 => 1,
        2019 => 7,
        2020 => 6,
        2021 => 4,
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, 1, day)
}

/// Leading calendar dates excluded when aligning multi-year series.
pub fn is_excluded(date: NaiveDate) -> bool {
    match reference_start(date.year()) {
        Some(start) => date < start,
        None => false,
    }
}
