//! The `cDate` attribute format, e.g. `02/21/2019 14:03:11 UTC Thu`.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::error::{LexiconError, Result};

pub const CDATE_FORMAT: &str = "%m/%d/%Y %H:%M:%S UTC %a";
const CDATE_NUMERIC_FORMAT: &str = "%m/%d/%Y %H:%M:%S";
/// Length of the ` UTC Xxx` suffix.
const CDATE_SUFFIX_LEN: usize = 8;

pub fn format_cdate(timestamp: DateTime<Utc>) -> String {
    timestamp.format(CDATE_FORMAT).to_string()
}

/// Parses a `cDate` value back by stripping its ` UTC Xxx` suffix.
pub fn parse_cdate(value: &str) -> Result<DateTime<Utc>> {
    let invalid = || LexiconError::InvalidArgument(format!("not a cDate value: {:?}", value));

    let cut = value
        .len()
        .checked_sub(CDATE_SUFFIX_LEN)
        .filter(|cut| value.is_char_boundary(*cut))
        .ok_or_else(invalid)?;
    let naive = NaiveDateTime::parse_from_str(&value[..cut], CDATE_NUMERIC_FORMAT)
        .map_err(|_| invalid())?;
    Ok(Utc.from_utc_datetime(&naive))
}

/// Midnight UTC of a `[year, month, day]` triple.
pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .ok_or_else(|| {
            LexiconError::InvalidArgument(format!("invalid date {}-{}-{}", year, month, day))
        })
}
