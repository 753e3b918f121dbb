//! Step 1: enclosure type list

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::step_block;
use crate::quote::{format_money, EnclosureOption};
use crate::ui::wizard::WizardScreen;
use crate::wizard::Wizard;

impl WizardScreen {
    pub(crate) fn render_enclosure_step(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        wizard: &Wizard,
        options: &[EnclosureOption],
    ) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        let chosen = wizard.state().enclosure_type().name.as_deref();
        let items: Vec<ListItem> = options
            .iter()
            .map(|option| {
                let selected = Some(option.name.as_str()) == chosen;
                let marker = if selected { "(*) " } else { "( ) " };
                let mut spans = vec![
                    Span::styled(
                        marker,
                        Style::default().fg(if selected { Color::Green } else { Color::DarkGray }),
                    ),
                    Span::raw(option.name.clone()),
                    Span::styled(
                        format!("  from {}", format_money(option.base_price.round() as i64, self.currency())),
                        Style::default().fg(Color::DarkGray),
                    ),
                ];
                if option.french {
                    spans.push(Span::styled("  no walls", Style::default().fg(Color::Magenta)));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .block(step_block("Enclosure type"))
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, chunks[0], &mut self.enclosure_state);

        let description = self
            .enclosure_state
            .selected()
            .and_then(|i| options.get(i))
            .map(|o| o.description.clone())
            .unwrap_or_default();
        let details = Paragraph::new(vec![
            Line::from(description),
            Line::from(""),
            Line::from(Span::styled(
                "Enter/Space to choose",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(step_block("Details"))
        .wrap(Wrap { trim: true });
        frame.render_widget(details, chunks[1]);
    }
}
