//! Render methods for each wizard step

mod add_ons;
mod dimensions;
mod enclosure;
mod interior;
mod summary;

use ratatui::{
    style::{Color, Style},
    widgets::{Block, Borders},
};

/// Bordered step frame with the shared title style
pub(crate) fn step_block(title: &str) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}
