//! Status bar component.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::tui::app::{App, ConnectionStatus};

/// Renders the status bar.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let status_color = match app.connection_status {
        ConnectionStatus::Subscribed => Color::Green,
        ConnectionStatus::Connected => Color::Cyan,
        ConnectionStatus::Connecting | ConnectionStatus::Reconnecting => Color::Yellow,
    };

    let live_span = match app.live_price() {
        Some(price) => Span::styled(
            format!(" {} {:.2} ", app.symbol, price),
            Style::default().fg(Color::White),
        ),
        None => Span::styled(
            format!(" {} -- ", app.symbol),
            Style::default().fg(Color::DarkGray),
        ),
    };

    let cursor_span = match app.crosshair_price() {
        Some(price) => Span::styled(
            format!(" ◀ {:.2} ", price),
            Style::default().fg(Color::Cyan),
        ),
        None => Span::raw(""),
    };

    let error_span = if let Some(ref error) = app.error_message {
        Span::styled(
            format!(" {} ", error.message),
            Style::default().fg(Color::Red),
        )
    } else {
        Span::raw("")
    };

    let candle_info = format!(
        " {} candles · {} ticks ",
        app.projector.state().candles.len(),
        app.ticks_received
    );

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", app.connection_status.label()),
            Style::default().fg(status_color),
        ),
        Span::raw("│"),
        live_span,
        Span::raw("│"),
        cursor_span,
        Span::raw("│"),
        error_span,
        Span::raw(format!(
            "{:>width$}",
            candle_info,
            width = area.width.saturating_sub(60) as usize
        )),
    ]);

    let para = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(para, area);
}
