use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Rect},
    style::Style,
    text::Text,
    widgets::{Block, Clear, Paragraph, Widget},
};

/// Draws `text` in a bordered box centered within `area`, padded by a blank
/// column on either side so it stands apart from the calendar beneath it
pub(crate) fn render_popup(
    area: Rect,
    buf: &mut Buffer,
    title: String,
    text: Text<'_>,
    style: Style,
) {
    let title_width = title.chars().count();
    let height = u16::try_from(text.height())
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .min(area.height);
    let width = u16::try_from(text.width().max(title_width))
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .min(area.width);
    let para = Paragraph::new(text)
        .block(
            Block::bordered()
                .title(title)
                .title_alignment(Alignment::Center),
        )
        .style(style);
    let [popup_area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
    let [popup_area] = Layout::vertical([height])
        .flex(Flex::Center)
        .areas(popup_area);
    let outer_area = Rect {
        x: popup_area.x.saturating_sub(1),
        width: popup_area.width.saturating_add(2).min(area.width),
        ..popup_area
    };
    Clear.render(outer_area, buf);
    Block::new().style(style).render(outer_area, buf);
    para.render(popup_area, buf);
}
