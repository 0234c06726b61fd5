//! Date ranges for calendar views.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_AGENDA_DAYS;
use crate::error::{CoreError, CoreResult};

/// First column of a week row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    Sunday,
    #[default]
    Monday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }

    /// Days from the week's first day to `day`'s weekday (0..=6).
    fn offset(self, day: NaiveDate) -> u64 {
        let weekday = day.weekday();
        let offset = match self {
            WeekStart::Sunday => weekday.num_days_from_sunday(),
            WeekStart::Monday => weekday.num_days_from_monday(),
        };
        u64::from(offset)
    }
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> CoreResult<Self> {
        if from > to {
            return Err(CoreError::InvalidRange {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(DateRange { from, to })
    }

    /// Whole weeks covering a month, padded with days from the neighbouring months.
    pub fn month_grid(year: i32, month: u32, week_start: WeekStart) -> CoreResult<Self> {
        let invalid = || CoreError::InvalidMonth(format!("{:04}-{:02}", year, month));

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next_first = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(invalid)?;
        let last = next_first.pred_opt().ok_or_else(invalid)?;

        let from = first.checked_sub_days(Days::new(week_start.offset(first)));
        let to = last.checked_add_days(Days::new(6 - week_start.offset(last)));
        padded(first, last, from, to)
    }

    /// The seven days of the week containing `day`. Fails only for weeks that
    /// run past the calendar's representable dates.
    pub fn week_of(day: NaiveDate, week_start: WeekStart) -> CoreResult<Self> {
        let from = day.checked_sub_days(Days::new(week_start.offset(day)));
        let to = from.and_then(|from| from.checked_add_days(Days::new(6)));
        padded(day, day, from, to)
    }

    /// Build a range from CLI arguments (YYYY-MM-DD).
    /// - `from` defaults to `today`
    /// - `to` defaults to a week after `from`
    pub fn from_args(from: Option<&str>, to: Option<&str>, today: NaiveDate) -> CoreResult<Self> {
        let from = match from {
            Some(s) => parse_date(s)?,
            None => today,
        };
        let to = match to {
            Some(s) => parse_date(s)?,
            None => from
                .checked_add_days(Days::new(DEFAULT_AGENDA_DAYS))
                .ok_or_else(|| CoreError::InvalidRange {
                    from: from.to_string(),
                    to: format!("{} + {} days", from, DEFAULT_AGENDA_DAYS),
                })?,
        };
        DateRange::new(from, to)
    }

    /// Days in chronological order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let to = self.to;
        self.from.iter_days().take_while(move |d| *d <= to)
    }

    pub fn len(&self) -> usize {
        ((self.to - self.from).num_days() + 1) as usize
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from <= day && day <= self.to
    }
}

/// A padded range, or `InvalidRange` naming the unpadded span when padding
/// overflows.
fn padded(
    first: NaiveDate,
    last: NaiveDate,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> CoreResult<DateRange> {
    match (from, to) {
        (Some(from), Some(to)) => Ok(DateRange { from, to }),
        _ => Err(CoreError::InvalidRange {
            from: first.to_string(),
            to: last.to_string(),
        }),
    }
}

/// Parse YYYY-MM-DD.
pub fn parse_date(s: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| CoreError::InvalidDate(s.to_string()))
}

/// Parse YYYY-MM into (year, month).
pub fn parse_month(s: &str) -> CoreResult<(i32, u32)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| CoreError::InvalidMonth(s.to_string()))?;
    Ok((first.year(), first.month()))
}
