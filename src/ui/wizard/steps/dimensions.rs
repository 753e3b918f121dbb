//! Step 2: length, width and height inputs

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::step_block;
use crate::quote::surface_area;
use crate::ui::form_field::FormField;
use crate::ui::wizard::WizardScreen;
use crate::wizard::{Axis, Wizard};

impl WizardScreen {
    pub(crate) fn render_dimensions_step(&mut self, frame: &mut Frame, area: Rect, wizard: &Wizard) {
        let block = step_block("Dimensions");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut constraints = Vec::new();
        for _ in Axis::all() {
            constraints.push(Constraint::Length(1)); // Label
            constraints.push(Constraint::Length(1)); // Input
            constraints.push(Constraint::Length(1)); // Spacer
        }
        constraints.push(Constraint::Length(1)); // Area
        constraints.push(Constraint::Min(0));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints(constraints)
            .split(inner);

        for (i, axis) in Axis::all().iter().enumerate() {
            let focused = i == self.dimension_axis;
            let label_style = if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Gray)
            };
            frame.render_widget(
                Paragraph::new(Span::styled(axis.label(), label_style)),
                chunks[i * 3],
            );
            let mut field = FormField::decimal_input("0");
            field.set_value(wizard.drafts().get(*axis));
            field.render(frame, chunks[i * 3 + 1], focused);
        }

        let area_line = match wizard.drafts().parse() {
            Some((l, w, h)) => Line::from(vec![
                Span::raw("Surface area: "),
                Span::styled(
                    format!("{:.2} m²", surface_area(l, w, h)),
                    Style::default().fg(Color::Green),
                ),
            ]),
            None => Line::from(Span::styled(
                "Enter all three sizes to continue",
                Style::default().fg(Color::DarkGray),
            )),
        };
        frame.render_widget(Paragraph::new(area_line), chunks[Axis::all().len() * 3]);
    }
}
