use super::grid::DAYS_IN_WEEK;
use super::{CalendarMonth, Day, DayCell, MonthSummary, MonthView};
use crate::source::BookingSource;
use crate::theme::{
    fee_style, BASE_STYLE, BOOKED_DAY_STYLE, SELECTED_STYLE, SUMMARY_STYLE, TITLE_STYLE,
    WEEKDAY_STYLE,
};
use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::StatefulWidget};
use std::iter::zip;
use std::marker::PhantomData;

static WEEKDAY_NAMES: [&str; DAYS_IN_WEEK] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// Number of columns per day of week
const DAY_WIDTH: u16 = 11;

/// Width of the calendar in columns
const MAIN_WIDTH: u16 = DAY_WIDTH * 7;

/// Number of week rows drawn, whether or not the month uses them all
const GRID_ROWS: u16 = 6;

/// Number of lines taken up by the month title, weekday header, and its rule
const HEADER_LINES: u16 = 3;

/// Number of lines taken up by the summary below the grid
const FOOTER_LINES: u16 = 1;

/// Each week gets at least a line for the day numbers and a line for
/// bookings, even if that pushes later weeks off the screen
const MIN_WEEK_LINES: u16 = 2;

/// Columns available to a booking line; the remaining columns of the day
/// separate it from the next day over
const BOOKING_WIDTH: u16 = DAY_WIDTH - 2;

const ACS_HLINE: char = '─';

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Calendar<S> {
    _data: PhantomData<S>,
}

impl<S> Calendar<S> {
    pub(crate) fn new() -> Calendar<S> {
        Calendar { _data: PhantomData }
    }

    fn week_lines(lines: u16) -> u16 {
        (lines.saturating_sub(HEADER_LINES + FOOTER_LINES) / GRID_ROWS).max(MIN_WEEK_LINES)
    }
}

impl<S: BookingSource> StatefulWidget for Calendar<S> {
    type State = MonthView<S>;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let left = area.width.saturating_sub(MAIN_WIDTH) / 2;
        let area = Rect {
            x: area.x + left,
            width: MAIN_WIDTH.min(area.width),
            ..area
        };
        let grid = state.grid();
        let summary = MonthSummary::from_grid(&grid, state.now());
        let week_lines = Self::week_lines(area.height);
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.draw_title(grid.month());
        canvas.draw_header();
        for (i, week) in zip(0u16.., grid.weeks()) {
            for (wd, cell) in zip(0u16.., week) {
                if let DayCell::Day(day) = cell {
                    let selected = day.date == state.selected();
                    canvas.draw_day(i * week_lines, wd, day, selected, week_lines);
                }
            }
        }
        canvas.draw_summary(&summary, week_lines);
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_title(&mut self, month: CalendarMonth) {
        let title = month.to_string();
        let width = u16::try_from(title.chars().count()).unwrap_or(u16::MAX);
        self.mvprint(
            0,
            MAIN_WIDTH.saturating_sub(width) / 2,
            title,
            MAIN_WIDTH,
            TITLE_STYLE,
        );
    }

    fn draw_header(&mut self) {
        for (i, name) in zip(0u16.., WEEKDAY_NAMES) {
            self.mvprint(1, DAY_WIDTH * i + 1, name, DAY_WIDTH, WEEKDAY_STYLE);
        }
        self.hline(2, 0, ACS_HLINE, MAIN_WIDTH);
    }

    // `top` is the first line of the week relative to the end of the header
    fn draw_day(&mut self, top: u16, wd: u16, day: &Day<'_>, selected: bool, week_lines: u16) {
        let y = HEADER_LINES + top;
        let x = DAY_WIDTH * wd;
        let label = if day.is_today {
            format!("[{:2}]", day.number())
        } else {
            format!(" {:2} ", day.number())
        };
        let style = if selected {
            SELECTED_STYLE
        } else if day.bookings.is_empty() {
            BASE_STYLE
        } else {
            BOOKED_DAY_STYLE
        };
        self.mvprint(y, x, label, DAY_WIDTH, style);
        let slots = usize::from(week_lines.saturating_sub(1));
        let shown = if day.bookings.len() > slots {
            // Reserve the last line for the overflow count
            slots.saturating_sub(1)
        } else {
            day.bookings.len()
        };
        let mut line = y + 1;
        for scheduled in day.bookings.iter().take(shown) {
            let entry = format!(
                "{:02}:{:02} {}",
                scheduled.start.hour(),
                scheduled.start.minute(),
                scheduled.booking.venue_name()
            );
            self.mvprint(
                line,
                x + 1,
                entry,
                BOOKING_WIDTH,
                fee_style(scheduled.booking.fee_status),
            );
            line += 1;
        }
        let hidden = day.bookings.len() - shown;
        if hidden > 0 {
            self.mvprint(
                line,
                x + 1,
                format!("+{hidden} more"),
                BOOKING_WIDTH,
                BASE_STYLE,
            );
        }
    }

    // Left out when the weeks already fill the screen
    fn draw_summary(&mut self, summary: &MonthSummary, week_lines: u16) {
        let grid_end = HEADER_LINES.saturating_add(GRID_ROWS.saturating_mul(week_lines));
        let line = self.area.height.checked_sub(FOOTER_LINES);
        if let Some(y) = line.filter(|&y| y >= grid_end) {
            self.mvprint(y, 0, summary.to_string(), MAIN_WIDTH, SUMMARY_STYLE);
        }
    }

    fn mvprint<T: AsRef<str>>(&mut self, y: u16, x: u16, s: T, max_width: u16, style: Style) {
        if y < self.area.height && x < self.area.width {
            let width = max_width.min(self.area.width - x);
            let _ = self.buf.set_stringn(
                x + self.area.x,
                y + self.area.y,
                s,
                usize::from(width),
                style,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), length, BASE_STYLE);
    }
}
