use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::{Date, Month};

const MONTHS_IN_YEAR: i64 = 12;

/// A month of a particular year, as displayed by the calendar.
///
/// Only months whose first day is representable as a [`Date`] can be
/// constructed, so every operation on a `CalendarMonth` is infallible apart
/// from moving past the ends of time.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct CalendarMonth(Date);

impl CalendarMonth {
    /// Constructs the month `month_index` months (zero-based) after January of
    /// `year`.  Indices outside `0..12` roll over into neighboring years.
    pub(crate) fn new(year: i32, month_index: i64) -> Result<CalendarMonth, OutOfTimeError> {
        let total = i64::from(year)
            .checked_mul(MONTHS_IN_YEAR)
            .and_then(|t| t.checked_add(month_index))
            .ok_or(OutOfTimeError)?;
        let year = i32::try_from(total.div_euclid(MONTHS_IN_YEAR)).map_err(|_| OutOfTimeError)?;
        let number = u8::try_from(total.rem_euclid(MONTHS_IN_YEAR) + 1).map_err(|_| OutOfTimeError)?;
        let month = Month::try_from(number).map_err(|_| OutOfTimeError)?;
        Date::from_calendar_date(year, month, 1)
            .map(CalendarMonth)
            .map_err(|_| OutOfTimeError)
    }

    pub(crate) fn containing(date: Date) -> CalendarMonth {
        // Day 1 of an existing date's month is always in range
        CalendarMonth(date.replace_day(1).unwrap_or(date))
    }

    pub(crate) fn year(self) -> i32 {
        self.0.year()
    }

    pub(crate) fn month(self) -> Month {
        self.0.month()
    }

    /// Zero-based index of the month within its year
    pub(crate) fn index0(self) -> u8 {
        u8::from(self.0.month()) - 1
    }

    pub(crate) fn first_day(self) -> Date {
        self.0
    }

    pub(crate) fn days(self) -> u8 {
        self.month().length(self.year())
    }

    pub(crate) fn contains(self, date: Date) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Returns the date with the given day of this month, clamping `day` to
    /// the length of the month
    pub(crate) fn day(self, day: u8) -> Date {
        self.0
            .replace_day(day.clamp(1, self.days()))
            .unwrap_or(self.0)
    }

    /// Moves `direction` months forwards (positive) or backwards (negative)
    pub(crate) fn navigate(self, direction: i64) -> Result<CalendarMonth, OutOfTimeError> {
        let index = i64::from(self.index0())
            .checked_add(direction)
            .ok_or(OutOfTimeError)?;
        CalendarMonth::new(self.year(), index)
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month(), self.year())
    }
}

impl FromStr for CalendarMonth {
    type Err = ParseMonthError;

    /// Parses a month written as `YYYY-MM`
    fn from_str(s: &str) -> Result<CalendarMonth, ParseMonthError> {
        let (year, month) = s.rsplit_once('-').ok_or(ParseMonthError)?;
        if month.len() != 2 {
            return Err(ParseMonthError);
        }
        let year = year.parse::<i32>().map_err(|_| ParseMonthError)?;
        let month = month.parse::<u8>().map_err(|_| ParseMonthError)?;
        if !(1..=12).contains(&month) {
            return Err(ParseMonthError);
        }
        CalendarMonth::new(year, i64::from(month) - 1).map_err(|_| ParseMonthError)
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid month; expected YYYY-MM")]
pub(crate) struct ParseMonthError;
