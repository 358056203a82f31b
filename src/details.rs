use crate::calendar::{Scheduled, Zone};
use crate::popup::render_popup;
use crate::theme::{fee_style, BASE_STYLE};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Text},
    widgets::Widget,
};
use time::{Date, PrimitiveDateTime};

/// Popup listing every booking on one day
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Details<'a> {
    date: Date,
    bookings: &'a [Scheduled<'a>],
    zone: Zone,
}

impl<'a> Details<'a> {
    pub(crate) fn new(date: Date, bookings: &'a [Scheduled<'a>], zone: Zone) -> Self {
        Details {
            date,
            bookings,
            zone,
        }
    }

    fn title(&self) -> String {
        format!(
            " {} {} {} {} ",
            self.date.weekday(),
            self.date.day(),
            self.date.month(),
            self.date.year()
        )
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        if self.bookings.is_empty() {
            lines.push(Line::raw("No bookings."));
        }
        for (i, scheduled) in self.bookings.iter().enumerate() {
            if i > 0 {
                lines.push(Line::raw(""));
            }
            let booking = scheduled.booking;
            let end = match booking.local_end(self.zone) {
                Ok(end) if end.date() == scheduled.start.date() => hm(end),
                Ok(end) => format!("{} {}", end.date(), hm(end)),
                Err(_) => String::from("?"),
            };
            lines.push(Line::styled(
                format!("{}-{}  {}", hm(scheduled.start), end, booking.venue_name()),
                fee_style(booking.fee_status),
            ));
            lines.push(Line::raw(format!(
                "    Type: {}",
                booking.booking_type.as_deref().unwrap_or("Not specified")
            )));
            lines.push(Line::raw(format!(
                "    Fee:  {} ({})",
                booking.fee(),
                booking.fee_status
            )));
            if let Some(tel) = booking.telephone() {
                lines.push(Line::raw(format!("    Tel:  {tel}")));
            }
            if let Some(info) = booking.more_info.as_deref().filter(|s| !s.is_empty()) {
                lines.push(Line::raw(format!("    {info}")));
            }
        }
        lines.push(Line::raw(""));
        lines.push(Line::raw("Press the Any Key to dismiss."));
        lines
    }
}

impl Widget for Details<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        render_popup(
            area,
            buf,
            self.title(),
            Text::from(self.lines()),
            BASE_STYLE,
        );
    }
}

fn hm(dt: PrimitiveDateTime) -> String {
    format!("{:02}:{:02}", dt.hour(), dt.minute())
}
