use crate::calendar::CalendarMonth;
use crate::popup::render_popup;
use crate::theme::{
    prompt::{PLACEHOLDER_STYLE, SUBMIT_READY_STYLE},
    BASE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span, Text},
    widgets::Widget,
};

/// What the entry shows before any digits are typed; the separator is drawn
/// after the year
const PLACEHOLDER: &str = "YYYYMM";

const YEAR_LEN: usize = 4;

const ENTRY_LEN: usize = PLACEHOLDER.len();

/// Digits typed so far into the "go to month" popup
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct MonthEntry {
    digits: [u8; ENTRY_LEN],
    len: usize,
}

impl MonthEntry {
    pub(crate) fn new() -> MonthEntry {
        MonthEntry::default()
    }

    pub(crate) fn press(&mut self, key: EntryKey) -> EntryOutcome {
        match key {
            EntryKey::Digit(d) if d < 10 => match self.digits.get_mut(self.len) {
                Some(slot) => {
                    *slot = d;
                    self.len += 1;
                    EntryOutcome::Accepted
                }
                None => EntryOutcome::Rejected,
            },
            EntryKey::Erase if self.len > 0 => {
                self.len -= 1;
                EntryOutcome::Accepted
            }
            EntryKey::Submit => self
                .month()
                .map_or(EntryOutcome::Rejected, EntryOutcome::Chosen),
            _ => EntryOutcome::Rejected,
        }
    }

    fn entered(&self) -> &[u8] {
        self.digits.get(..self.len).unwrap_or_default()
    }

    fn is_complete(&self) -> bool {
        self.len == ENTRY_LEN
    }

    // `None` until all six digits are in and they name a real month
    fn month(&self) -> Option<CalendarMonth> {
        if !self.is_complete() {
            return None;
        }
        let number = |ds: &[u8]| ds.iter().fold(0, |acc, &d| acc * 10 + u32::from(d));
        let (year, month) = self.entered().split_at_checked(YEAR_LEN)?;
        let month = number(month);
        if !(1..=12).contains(&month) {
            return None;
        }
        let year = i32::try_from(number(year)).ok()?;
        CalendarMonth::new(year, i64::from(month) - 1).ok()
    }

    fn entry_line(&self) -> Line<'static> {
        let mut spans = Vec::with_capacity(ENTRY_LEN + 1);
        for (i, placeholder) in PLACEHOLDER.chars().enumerate() {
            if i == YEAR_LEN {
                spans.push(Span::styled("-", BASE_STYLE));
            }
            spans.push(match self.entered().get(i) {
                Some(d) => Span::styled(d.to_string(), BASE_STYLE),
                None => Span::styled(placeholder.to_string(), PLACEHOLDER_STYLE),
            });
        }
        Line::from(spans).centered()
    }
}

impl Widget for &MonthEntry {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let submit_style = if self.is_complete() {
            SUBMIT_READY_STYLE
        } else {
            BASE_STYLE
        };
        let text = Text::from(vec![
            Line::default(),
            self.entry_line(),
            Line::default(),
            Line::from(Span::styled("[ENTER]", submit_style)).centered(),
        ]);
        render_popup(area, buf, String::from(" Go to month "), text, BASE_STYLE);
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum EntryKey {
    Digit(u8),
    Erase,
    Submit,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum EntryOutcome {
    Accepted,
    Rejected,
    Chosen(CalendarMonth),
}
