use crate::calendar::{Calendar, MonthView};
use crate::details::Details;
use crate::help::Help;
use crate::prompt::{EntryKey, EntryOutcome, MonthEntry};
use crate::source::BookingSource;
use crate::theme::BASE_STYLE;
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::Rect,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App<S> {
    view: MonthView<S>,
    state: AppState,
}

impl<S: BookingSource> App<S> {
    pub(crate) fn new(view: MonthView<S>) -> App<S> {
        App {
            view,
            state: AppState::Calendar,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            terminal.draw(|frame| frame.render_widget(&mut self, frame.area()))?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.view.move_selection(-1).is_ok(),
                KeyCode::Char('l') | KeyCode::Right => self.view.move_selection(1).is_ok(),
                KeyCode::Char('k') | KeyCode::Up => self.view.move_selection(-7).is_ok(),
                KeyCode::Char('j') | KeyCode::Down => self.view.move_selection(7).is_ok(),
                KeyCode::Char('p') | KeyCode::PageUp => self.view.previous_month().is_ok(),
                KeyCode::Char('n') | KeyCode::PageDown => self.view.next_month().is_ok(),
                KeyCode::Char('0') | KeyCode::Home => {
                    self.view.jump_to_today();
                    true
                }
                KeyCode::Char('g') => {
                    self.state = AppState::Jumping(MonthEntry::new());
                    true
                }
                KeyCode::Enter => {
                    self.state = AppState::Details;
                    true
                }
                // Failures are logged by the view, which keeps the bookings
                // it already had
                KeyCode::Char('r') => self.view.reload().is_ok(),
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping | AppState::Details => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Jumping(entry) => {
                let entry_key = match key {
                    KeyCode::Char('q' | 'g') | KeyCode::Esc => {
                        self.state = AppState::Calendar;
                        return true;
                    }
                    KeyCode::Char(c) => match c.to_digit(10).and_then(|d| u8::try_from(d).ok()) {
                        Some(d) => EntryKey::Digit(d),
                        None => return false,
                    },
                    KeyCode::Backspace | KeyCode::Delete => EntryKey::Erase,
                    KeyCode::Enter => EntryKey::Submit,
                    _ => return false,
                };
                match entry.press(entry_key) {
                    EntryOutcome::Accepted => true,
                    EntryOutcome::Rejected => false,
                    EntryOutcome::Chosen(month) => {
                        self.state = AppState::Calendar;
                        self.view.jump_to_month(month);
                        true
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }
}

fn beep() -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout.write_all(b"\x07")?;
    stdout.flush()
}

impl<S: BookingSource> Widget for &mut App<S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        Calendar::<S>::new().render(area, buf, &mut self.view);
        match self.state {
            AppState::Helping => Help(BASE_STYLE).render(area, buf),
            AppState::Jumping(ref entry) => entry.render(area, buf),
            AppState::Details => {
                let bookings = self.view.selected_bookings();
                Details::new(self.view.selected(), &bookings, self.view.now().zone())
                    .render(area, buf);
            }
            AppState::Calendar | AppState::Quitting => (),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Jumping(MonthEntry),
    Details,
    Quitting,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::Booking;
    use crate::calendar::{CalendarMonth, DayOrder, Now};
    use time::macros::{date, datetime};

    fn app() -> App<Vec<Booking>> {
        let bookings = vec![
            Booking::stub(1, "2024-03-05T10:00", "Sunny Vale"),
            Booking::stub(2, "2024-04-02T14:00", "Oak Lodge"),
        ];
        let mut view = MonthView::new(
            Now::at(datetime!(2024 - 03 - 05 8:00 +0)),
            bookings,
            DayOrder::AsGiven,
        );
        view.reload().unwrap();
        App::new(view)
    }

    fn rows(app: &mut App<Vec<Booking>>) -> Vec<String> {
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        (0..24)
            .map(|y| (0..80).map(|x| buf[(x, y)].symbol()).collect())
            .collect()
    }

    #[test]
    fn test_movement_keys() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('l')));
        assert_eq!(app.view.selected(), date!(2024 - 03 - 06));
        assert!(app.handle_key(KeyCode::Up));
        assert_eq!(app.view.selected(), date!(2024 - 02 - 28));
        assert!(app.handle_key(KeyCode::PageDown));
        assert_eq!(app.view.month(), CalendarMonth::new(2024, 2).unwrap());
        assert_eq!(app.view.selected(), date!(2024 - 03 - 28));
        assert!(app.handle_key(KeyCode::Char('n')));
        assert_eq!(app.view.month(), CalendarMonth::new(2024, 3).unwrap());
        assert!(app.handle_key(KeyCode::Home));
        assert_eq!(app.view.selected(), date!(2024 - 03 - 05));
    }

    #[test]
    fn test_invalid_key() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Char('x')));
        assert_eq!(app.state, AppState::Calendar);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.quitting());
    }

    #[test]
    fn test_jump_to_month() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('g')));
        for c in "20240".chars() {
            assert!(app.handle_key(KeyCode::Char(c)));
        }
        assert!(!app.handle_key(KeyCode::Enter));
        assert!(!app.handle_key(KeyCode::Char('x')));
        assert!(app.handle_key(KeyCode::Char('4')));
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Calendar);
        assert_eq!(app.view.month(), CalendarMonth::new(2024, 3).unwrap());
        assert_eq!(app.view.selected(), date!(2024 - 04 - 01));
    }

    #[test]
    fn test_cancel_jump() {
        let mut app = app();
        app.handle_key(KeyCode::Char('g'));
        assert!(app.handle_key(KeyCode::Esc));
        assert_eq!(app.state, AppState::Calendar);
        assert_eq!(app.view.month(), CalendarMonth::new(2024, 2).unwrap());
    }

    #[test]
    fn test_help() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('?')));
        let rows = rows(&mut app);
        assert!(rows.iter().any(|r| r.contains("│r               Reload bookings")));
        assert!(app.handle_key(KeyCode::Char('z')));
        assert_eq!(app.state, AppState::Calendar);
    }

    #[test]
    fn test_details() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Enter));
        let rows = rows(&mut app);
        assert!(rows.iter().any(|r| r.contains("Tuesday 5 March 2024")));
        assert!(rows.iter().any(|r| r.contains("10:00-?  Sunny Vale")));
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Calendar);
    }

    #[test]
    fn test_reload() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('r')));
        assert_eq!(app.view.bookings().len(), 2);
    }
}
