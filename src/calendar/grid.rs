use super::{CalendarMonth, Now};
use crate::booking::Booking;
use std::iter::successors;
use time::{Date, PrimitiveDateTime};

pub(crate) const DAYS_IN_WEEK: usize = 7;

/// Number of week rows in every grid, regardless of how many weeks the month
/// actually touches
pub(crate) const WEEKS_IN_GRID: usize = 6;

pub(crate) const GRID_CELLS: usize = DAYS_IN_WEEK * WEEKS_IN_GRID;

/// How the bookings within a single day are ordered
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum DayOrder {
    /// Keep the order in which the bookings were supplied
    #[default]
    AsGiven,
    /// Sort by start time, keeping the supplied order among equal starts
    ByStart,
}

/// A booking placed on the calendar, along with its parsed local start time
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Scheduled<'a> {
    pub(crate) start: PrimitiveDateTime,
    pub(crate) booking: &'a Booking,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Day<'a> {
    pub(crate) date: Date,
    pub(crate) is_today: bool,
    pub(crate) bookings: Vec<Scheduled<'a>>,
}

impl Day<'_> {
    pub(crate) fn number(&self) -> u8 {
        self.date.day()
    }
}

/// A single position in the month grid
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum DayCell<'a> {
    /// Filler before the first or after the last day of the month
    Empty,
    Day(Day<'a>),
}

impl<'a> DayCell<'a> {
    pub(crate) fn day(&self) -> Option<&Day<'a>> {
        match self {
            DayCell::Empty => None,
            DayCell::Day(day) => Some(day),
        }
    }
}

/// The 6×7 grid of a calendar month, Sunday-first, with every booking that
/// starts on a given day (in local time) attached to that day's cell
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthGrid<'a> {
    month: CalendarMonth,
    start_offset: usize,
    cells: [DayCell<'a>; GRID_CELLS],
}

impl<'a> MonthGrid<'a> {
    /// Lays out `month` and buckets `bookings` by the local date of their
    /// start.  Bookings whose start cannot be parsed are left out.
    pub(crate) fn build(
        month: CalendarMonth,
        bookings: &'a [Booking],
        now: Now,
        order: DayOrder,
    ) -> MonthGrid<'a> {
        let first = month.first_day();
        let start_offset = usize::from(first.weekday().number_days_from_sunday());
        let days = usize::from(month.days());
        let mut buckets = vec![Vec::new(); days];
        for booking in bookings {
            match booking.local_start(now.zone()) {
                Ok(start) if month.contains(start.date()) => {
                    if let Some(bucket) = buckets.get_mut(usize::from(start.day()) - 1) {
                        bucket.push(Scheduled { start, booking });
                    }
                }
                Ok(_) => (),
                Err(e) => log::debug!("leaving booking {} off the calendar: {e}", booking.id),
            }
        }
        if order == DayOrder::ByStart {
            for bucket in &mut buckets {
                bucket.sort_by_key(|s: &Scheduled<'_>| s.start);
            }
        }
        let mut dates = successors(Some(first), |d| d.next_day())
            .take(days)
            .zip(buckets);
        let cells = std::array::from_fn(|i| {
            if i < start_offset {
                return DayCell::Empty;
            }
            match dates.next() {
                Some((date, bookings)) => DayCell::Day(Day {
                    date,
                    is_today: date == now.today(),
                    bookings,
                }),
                None => DayCell::Empty,
            }
        });
        MonthGrid {
            month,
            start_offset,
            cells,
        }
    }

    pub(crate) fn month(&self) -> CalendarMonth {
        self.month
    }

    pub(crate) fn weeks(&self) -> impl Iterator<Item = &[DayCell<'a>]> + '_ {
        self.cells.chunks_exact(DAYS_IN_WEEK)
    }

    pub(crate) fn days(&self) -> impl Iterator<Item = &Day<'a>> + '_ {
        self.cells.iter().filter_map(DayCell::day)
    }

    pub(crate) fn day(&self, date: Date) -> Option<&Day<'a>> {
        if !self.month.contains(date) {
            return None;
        }
        self.cells
            .get(self.start_offset + usize::from(date.day()) - 1)
            .and_then(DayCell::day)
    }
}

#[cfg(test)]
impl<'a> MonthGrid<'a> {
    /// Index of the cell holding the first day of the month, which is also
    /// that day's weekday counted from Sunday
    pub(crate) fn start_offset(&self) -> usize {
        self.start_offset
    }

    pub(crate) fn cells(&self) -> &[DayCell<'a>; GRID_CELLS] {
        &self.cells
    }
}

#[cfg(test)]
impl DayCell<'_> {
    pub(crate) fn day_number(&self) -> Option<u8> {
        self.day().map(Day::number)
    }

    pub(crate) fn is_current_month(&self) -> bool {
        matches!(self, DayCell::Day(_))
    }
}
