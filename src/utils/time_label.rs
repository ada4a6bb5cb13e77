//! Chart time labels such as `04 Dec '24 14:30` recovered by OCR.

use chrono::{Duration, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

use crate::error::{HarvestError, HarvestResult};

pub const VALID_LABEL_LENGTHS: [usize; 3] = [7, 11, 13];

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

static LABEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{2})([a-z]{3})([0-9]{2})(?:([0-9]{2})([0-9]{2})([0-9]{2})?)?$")
        .expect("label pattern compiles")
});

/// Which side of a window a label fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

/// Drops separators the chart renders between fields and lower-cases the rest.
pub fn clean_label(raw: &str) -> String {
    raw.replace(['\'', ' ', ':'], "").trim().to_lowercase()
}

pub fn has_valid_length(label: &str) -> bool {
    VALID_LABEL_LENGTHS.contains(&label.chars().count())
}

pub fn month_index(abbrev: &str) -> HarvestResult<u32> {
    let lowered = abbrev.to_ascii_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == lowered)
        .map(|i| i as u32)
        .ok_or(HarvestError::InvalidMonth(abbrev.to_string()))
}

pub fn month_abbrev(index: u32) -> Option<&'static str> {
    MONTHS.get(index as usize).copied()
}

/// Converts a label into unix seconds, reading the fields as the chart's
/// wall clock which runs `tz_offset_hours` ahead of UTC.
pub fn normalize(raw: &str, tz_offset_hours: i64) -> HarvestResult<i64> {
    let label = clean_label(raw);
    if !has_valid_length(&label) {
        return Err(HarvestError::InvalidLabel(label));
    }

    let caps = LABEL_PATTERN
        .captures(&label)
        .ok_or_else(|| HarvestError::InvalidLabel(label.clone()))?;

    // absent time fields read as zero; present ones must parse
    let field = |i: usize| -> HarvestResult<u32> {
        match caps.get(i) {
            Some(m) => m
                .as_str()
                .parse::<u32>()
                .map_err(|_| HarvestError::InvalidLabel(label.clone())),
            None => Ok(0),
        }
    };

    let month = month_index(&caps[2])?;
    let (day, year) = (field(1)?, 2000 + field(3)? as i32);
    let (hour, minute, second) = (field(4)?, field(5)?, field(6)?);

    let wall_clock = NaiveDate::from_ymd_opt(year, month + 1, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .ok_or_else(|| HarvestError::InvalidLabel(label.clone()))?;

    let shifted = wall_clock.and_utc() - Duration::hours(tz_offset_hours);
    Ok(shifted.timestamp())
}

/// Extends a date-only or minute-precision label to full seconds precision,
/// covering the whole day or minute on the requested side.
pub fn pad_label(label: &str, bound: Bound) -> String {
    let suffix = match (label.chars().count(), bound) {
        (7, Bound::Start) => "000000",
        (7, Bound::End) => "235959",
        (11, Bound::Start) => "00",
        (11, Bound::End) => "59",
        _ => "",
    };
    format!("{}{}", label, suffix)
}
