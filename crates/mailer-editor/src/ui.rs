use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::surface::View;

pub fn draw(f: &mut Frame, view: &View, status: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Editor and output
            Constraint::Length(1), // Status bar
        ])
        .split(f.size());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    draw_editable(f, view, panes[0]);
    draw_output(f, view, panes[1]);
    draw_status_bar(f, status, chunks[1]);
}

fn draw_editable(f: &mut Frame, view: &View, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title("Template");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let region = &view.editable;
    let scroll = scroll_to(region.cursor.line, inner.height);
    let hscroll = scroll_to(region.cursor.column, inner.width);

    let paragraph = Paragraph::new(region.lines.clone()).scroll((scroll, hscroll));
    f.render_widget(paragraph, inner);

    if inner.width > 0 && inner.height > 0 {
        let x = inner.x + (region.cursor.column - hscroll as usize) as u16;
        let y = inner.y + (region.cursor.line - scroll as usize) as u16;
        f.set_cursor(x, y);
    }
}

/// Smallest offset that keeps `position` inside a viewport of `size` cells.
fn scroll_to(position: usize, size: u16) -> u16 {
    match size {
        0 => 0,
        size => position.saturating_sub(size as usize - 1).min(u16::MAX as usize) as u16,
    }
}

fn draw_output(f: &mut Frame, view: &View, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title("Output");
    let paragraph = Paragraph::new(view.output.label)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_status_bar(f: &mut Frame, status: &str, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            " MJML ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::raw(status.to_string()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
