use crate::popup::render_popup;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Text},
    widgets::Widget,
};

static COMMANDS: &[(&str, &str)] = &[
    ("h, LEFT", "Previous day"),
    ("l, RIGHT", "Next day"),
    ("k, UP", "Same day last week"),
    ("j, DOWN", "Same day next week"),
    ("p, PAGE UP", "Previous month"),
    ("n, PAGE DOWN", "Next month"),
    ("0, HOME", "Jump to today"),
    ("g", "Input month to jump to"),
    ("ENTER", "Show the day's bookings"),
    ("r", "Reload bookings"),
    ("?", "Show this help"),
    ("q, ESC", "Quit"),
];

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines = COMMANDS
            .iter()
            .map(|(keys, action)| Line::raw(format!("{keys:16}{action}")))
            .collect::<Vec<_>>();
        lines.push(Line::raw(""));
        lines.push(Line::raw("Press the Any Key to dismiss."));
        render_popup(
            area,
            buf,
            String::from(" Commands "),
            Text::from(lines),
            self.0,
        );
    }
}
