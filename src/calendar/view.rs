use super::{CalendarMonth, DayOrder, MonthGrid, MonthSummary, Now, OutOfTimeError, Scheduled};
use crate::booking::Booking;
use crate::source::{BookingSource, DateRange, SourceError};
use time::{Date, Duration};

/// Everything the calendar screen needs to know between redraws: which month
/// is shown, which day is selected, and the most recently fetched bookings
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthView<S> {
    now: Now,
    month: CalendarMonth,
    selected: Date,
    bookings: Vec<Booking>,
    source: S,
    order: DayOrder,
}

impl<S: BookingSource> MonthView<S> {
    pub(crate) fn new(now: Now, source: S, order: DayOrder) -> Self {
        MonthView {
            now,
            month: CalendarMonth::containing(now.today()),
            selected: now.today(),
            bookings: Vec::new(),
            source,
            order,
        }
    }

    pub(crate) fn start_month(mut self, month: CalendarMonth) -> Self {
        self.jump_to_month(month);
        self
    }

    /// Replaces the cached bookings with a fresh copy from the source.  On
    /// failure the previous bookings are kept.
    pub(crate) fn reload(&mut self) -> Result<usize, SourceError> {
        match self.source.fetch_bookings(DateRange::all()) {
            Ok(bookings) => {
                self.bookings = bookings;
                Ok(self.bookings.len())
            }
            Err(e) => {
                log::error!("{e}");
                Err(e)
            }
        }
    }

    pub(crate) fn now(&self) -> Now {
        self.now
    }

    pub(crate) fn month(&self) -> CalendarMonth {
        self.month
    }

    pub(crate) fn selected(&self) -> Date {
        self.selected
    }

    #[cfg(test)]
    pub(crate) fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub(crate) fn grid(&self) -> MonthGrid<'_> {
        MonthGrid::build(self.month, &self.bookings, self.now, self.order)
    }

    pub(crate) fn summary(&self) -> MonthSummary {
        MonthSummary::from_grid(&self.grid(), self.now)
    }

    pub(crate) fn selected_bookings(&self) -> Vec<Scheduled<'_>> {
        self.grid()
            .day(self.selected)
            .map(|day| day.bookings.clone())
            .unwrap_or_default()
    }

    pub(crate) fn previous_month(&mut self) -> Result<(), OutOfTimeError> {
        self.shift_month(-1)
    }

    pub(crate) fn next_month(&mut self) -> Result<(), OutOfTimeError> {
        self.shift_month(1)
    }

    pub(crate) fn jump_to_today(&mut self) {
        self.month = CalendarMonth::containing(self.now.today());
        self.selected = self.now.today();
    }

    /// Shows `month`, selecting today if it falls within it and the first of
    /// the month otherwise
    pub(crate) fn jump_to_month(&mut self, month: CalendarMonth) {
        self.month = month;
        self.selected = if month.contains(self.now.today()) {
            self.now.today()
        } else {
            month.first_day()
        };
    }

    /// Moves the selection by `days`, following it into the neighboring
    /// month when it leaves the one on display
    pub(crate) fn move_selection(&mut self, days: i64) -> Result<(), OutOfTimeError> {
        let selected = self
            .selected
            .checked_add(Duration::days(days))
            .ok_or(OutOfTimeError)?;
        self.selected = selected;
        self.month = CalendarMonth::containing(selected);
        Ok(())
    }

    // The selected day-of-month is carried over, clamped to the length of the
    // new month.
    fn shift_month(&mut self, direction: i64) -> Result<(), OutOfTimeError> {
        let month = self.month.navigate(direction)?;
        self.selected = month.day(self.selected.day());
        self.month = month;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn view() -> MonthView<Vec<Booking>> {
        let bookings = vec![
            Booking::stub(1, "2024-03-05T10:00", "Sunny Vale"),
            Booking::stub(2, "2024-03-05T14:00", "Oak Lodge"),
            Booking::stub(3, "2024-01-31T09:00", "Elm House"),
        ];
        let mut view = MonthView::new(
            Now::at(datetime!(2024 - 03 - 05 8:00 +0)),
            bookings,
            DayOrder::AsGiven,
        );
        view.reload().unwrap();
        view
    }

    #[test]
    fn test_new_shows_today() {
        let view = view();
        assert_eq!(view.month(), CalendarMonth::new(2024, 2).unwrap());
        assert_eq!(view.selected(), date!(2024 - 03 - 05));
        assert_eq!(view.bookings().len(), 3);
        let ids = view
            .selected_bookings()
            .iter()
            .map(|s| s.booking.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, [1, 2]);
        assert_eq!(view.summary().bookings, 2);
    }

    #[test]
    fn test_previous_month_clamps_day() {
        let mut view = view();
        view.move_selection(26).unwrap();
        assert_eq!(view.selected(), date!(2024 - 03 - 31));
        view.previous_month().unwrap();
        assert_eq!(view.month(), CalendarMonth::new(2024, 1).unwrap());
        assert_eq!(view.selected(), date!(2024 - 02 - 29));
        view.previous_month().unwrap();
        assert_eq!(view.selected(), date!(2024 - 01 - 29));
        assert_eq!(view.summary().bookings, 1);
    }

    #[test]
    fn test_next_month_across_year() {
        let mut view = view().start_month(CalendarMonth::new(2024, 11).unwrap());
        assert_eq!(view.selected(), date!(2024 - 12 - 01));
        view.next_month().unwrap();
        assert_eq!(view.month(), CalendarMonth::new(2025, 0).unwrap());
        assert_eq!(view.selected(), date!(2025 - 01 - 01));
        assert!(view.selected_bookings().is_empty());
    }

    #[test]
    fn test_move_selection_changes_month() {
        let mut view = view();
        view.move_selection(-5).unwrap();
        assert_eq!(view.selected(), date!(2024 - 02 - 29));
        assert_eq!(view.month(), CalendarMonth::new(2024, 1).unwrap());
        view.move_selection(7).unwrap();
        assert_eq!(view.selected(), date!(2024 - 03 - 07));
        assert_eq!(view.month(), CalendarMonth::new(2024, 2).unwrap());
    }

    #[test]
    fn test_jump_to_today() {
        let mut view = view();
        view.next_month().unwrap();
        view.next_month().unwrap();
        view.move_selection(3).unwrap();
        view.jump_to_today();
        assert_eq!(view.month(), CalendarMonth::new(2024, 2).unwrap());
        assert_eq!(view.selected(), date!(2024 - 03 - 05));
    }

    #[test]
    fn test_jump_to_month_containing_today() {
        let mut view = view();
        view.move_selection(-40).unwrap();
        view.jump_to_month(CalendarMonth::new(2024, 2).unwrap());
        assert_eq!(view.selected(), date!(2024 - 03 - 05));
    }

    #[test]
    fn test_end_of_time() {
        let mut view = view().start_month(CalendarMonth::new(9999, 11).unwrap());
        assert_eq!(view.next_month(), Err(OutOfTimeError));
        assert_eq!(view.month(), CalendarMonth::new(9999, 11).unwrap());
        view.move_selection(30).unwrap();
        assert_eq!(view.move_selection(1), Err(OutOfTimeError));
        assert_eq!(view.selected(), date!(9999 - 12 - 31));
    }
}
