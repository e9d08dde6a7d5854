use chrono::{Datelike, NaiveDate};

use crate::types::Year;

const FULL_DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%Y %b %d",
    "%Y %B %d",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Parse a publish date as found in metadata dumps.
///
/// Accepts full dates (`2020-03-14`, `03/14/2020`, `2020 Mar 14`, `Mar 14, 2020`),
/// timestamps whose date part is ISO (`2020-03-14T08:00:00`), year-month
/// (`2020-03`) and bare years (`2020`). Partial dates anchor to day/month 1.
/// Surrounding whitespace is ignored. Returns `None` when nothing matches.
pub fn parse_publish_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let date_part = trimmed
        .split_once('T')
        .map(|(date, _)| date)
        .unwrap_or(trimmed);
    for format in FULL_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, format) {
            return Some(date);
        }
    }
    if let Some(date) = date_part
        .split_once(' ')
        .and_then(|(head, _)| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
    {
        return Some(date);
    }
    if let Some((year, month)) = parse_year_month(date_part) {
        return NaiveDate::from_ymd_opt(year, month, 1);
    }
    parse_bare_year(date_part).and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
}

/// Calendar year of a publish date string, used as the stratum key.
pub fn publish_year(value: &str) -> Option<Year> {
    parse_publish_date(value).map(|date| date.year())
}

fn parse_year_month(value: &str) -> Option<(Year, u32)> {
    let (year, month) = value.split_once('-')?;
    let year = parse_bare_year(year)?;
    if month.len() != 2 {
        return None;
    }
    let month = month.parse::<u32>().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

fn parse_bare_year(value: &str) -> Option<Year> {
    if value.len() == 4 && value.chars().all(|ch| ch.is_ascii_digit()) {
        value.parse::<Year>().ok()
    } else {
        None
    }
}
