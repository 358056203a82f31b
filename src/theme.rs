use crate::booking::FeeStatus;
use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const BOOKED_DAY_STYLE: Style = Style::new()
    .fg(Color::LightYellow)
    .bg(Color::Black)
    .add_modifier(Modifier::BOLD);

pub(crate) const SELECTED_STYLE: Style = BASE_STYLE.add_modifier(Modifier::REVERSED);

pub(crate) const SUMMARY_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub(crate) const fn fee_style(status: FeeStatus) -> Style {
    match status {
        FeeStatus::Unpaid => BASE_STYLE.fg(Color::LightRed),
        FeeStatus::Invoiced => BASE_STYLE.fg(Color::LightBlue),
        FeeStatus::Paid => BASE_STYLE.fg(Color::LightGreen),
    }
}

pub(crate) mod prompt {
    use super::{Color, Modifier, Style, BASE_STYLE};

    pub(crate) const PLACEHOLDER_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const SUBMIT_READY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);
}
