use anyhow::anyhow;
use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::ExpeditionError;

/// Days ahead of "today" the dashboard asks for when the operator picks no
/// window. Caller policy only: the query service never fills in dates.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive calendar-date window `[start, end]` with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ExpeditionError> {
        if start > end {
            return Err(ExpeditionError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse both bounds from ISO 8601 calendar dates (`YYYY-MM-DD`).
    ///
    /// A missing bound is reported as `InvalidDate` with an empty value;
    /// date errors take precedence over the range check.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, ExpeditionError> {
        let start = parse_date("start", start)?;
        let end = parse_date("end", end)?;
        Self::new(start, end)
    }

    /// `[today, today + days]`, saturating at the last representable date.
    pub fn starting_at(today: NaiveDate, days: u32) -> Self {
        let end = today
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        Self { start: today, end }
    }

    /// Operator-side defaulting: a missing `start` is `today`, a missing `end`
    /// is `start + days`. Given values are parsed and checked like [`parse`].
    ///
    /// [`parse`]: DateWindow::parse
    pub fn with_defaults(
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
        days: u32,
    ) -> Result<Self, ExpeditionError> {
        let start = match start {
            Some(raw) => parse_date("start", Some(raw))?,
            None => today,
        };
        let end = match end {
            Some(raw) => parse_date("end", Some(raw))?,
            None => Self::starting_at(start, days).end,
        };
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn parse_date(field: &'static str, raw: Option<&str>) -> Result<NaiveDate, ExpeditionError> {
    let raw = raw.unwrap_or_default();
    let invalid = || ExpeditionError::InvalidDate {
        field,
        value: raw.to_string(),
    };

    // chrono alone accepts "2024-1-5", "+2024-01-05" and inner spaces.
    let trimmed = raw.trim();
    if !is_iso_calendar_date(trimmed) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| invalid())
}

/// Exactly `DDDD-DD-DD` with ASCII digits.
fn is_iso_calendar_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b.iter().enumerate().all(|(i, c)| match i {
            4 | 7 => *c == b'-',
            _ => c.is_ascii_digit(),
        })
}

/// Calendar date of `now` as seen in the IANA zone `tz_name`.
pub fn today_in(tz_name: &str, now: DateTime<Utc>) -> anyhow::Result<NaiveDate> {
    let tz: Tz = tz_name
        .trim()
        .parse()
        .map_err(|e| anyhow!("unknown time zone '{}': {}", tz_name, e))?;
    Ok(now.with_timezone(&tz).date_naive())
}
