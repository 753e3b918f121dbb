//! Step 5: quote summary and the contact form

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::step_block;
use crate::quote::SummaryFields;
use crate::ui::wizard::WizardScreen;

impl WizardScreen {
    pub(crate) fn render_summary_step(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        fields: &SummaryFields,
        currency: &str,
        submit_enabled: bool,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let rows = fields.rows(currency);
        let last = rows.len().saturating_sub(1);
        let lines: Vec<Line> = rows
            .into_iter()
            .enumerate()
            .map(|(i, (label, value))| {
                let value_style = if i == last {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::styled(format!("{label:<10}"), Style::default().fg(Color::Gray)),
                    Span::styled(value, value_style),
                ])
            })
            .collect();
        frame.render_widget(
            Paragraph::new(lines).block(step_block("Your quote")),
            chunks[0],
        );

        let block = step_block("Request a call back");
        let inner = block.inner(chunks[1]);
        frame.render_widget(block, chunks[1]);
        // Quick form owns the fields while it is open
        let enabled = submit_enabled && !self.is_quick_form_open();
        self.capture.render(frame, inner, enabled);
    }
}
