//! Main UI rendering coordinator.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders},
};

use crate::aggregator::WINDOW_DURATION;

use super::app::App;
use super::components::chart::CandleChart;
use super::components::status_bar;

/// Splits the screen into the chart panel and the status bar.
fn split(area: Rect) -> [Rect; 2] {
    Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area)
}

fn chart_block(title: String) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

/// Drawable chart cells inside the chart panel for a screen of `area`.
#[must_use]
pub fn chart_area(area: Rect) -> Rect {
    let [chart, _] = split(area);
    chart_block(String::new()).inner(chart)
}

/// Renders the entire application UI.
pub fn render(frame: &mut Frame, app: &App) {
    let [chart, status] = split(frame.area());

    let title = format!(" {} · {}s ", app.symbol, WINDOW_DURATION.as_secs());
    let widget = CandleChart::new(app.projection.as_ref())
        .block(chart_block(title))
        .crosshair(app.crosshair_row);
    frame.render_widget(widget, chart);

    status_bar::render(frame, status, app);
}
