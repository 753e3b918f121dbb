//! Step 3: one column per surface

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::ui::wizard::WizardScreen;
use crate::wizard::validator::{filled_surfaces, required_surfaces};
use crate::wizard::{FinishGroup, Wizard};

impl WizardScreen {
    pub(crate) fn render_interior_step(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        wizard: &Wizard,
        groups: &[FinishGroup],
    ) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(1)])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![
                Constraint::Ratio(1, groups.len().max(1) as u32);
                groups.len()
            ])
            .split(rows[0]);

        let finish = wizard.state().interior_finish();
        for (i, group) in groups.iter().enumerate() {
            let focused = i == self.finish_group;
            let border = if group.hidden {
                Color::DarkGray
            } else if focused {
                Color::Cyan
            } else {
                Color::Gray
            };
            let block = Block::default()
                .title(format!(" {} ", group.surface.label()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border));

            if group.hidden {
                let note = Paragraph::new(Span::styled(
                    "Not available for this enclosure",
                    Style::default().fg(Color::DarkGray),
                ))
                .block(block);
                frame.render_widget(note, columns[i]);
                continue;
            }

            let chosen = finish.slot(group.surface).material_name.as_deref();
            let items: Vec<ListItem> = group
                .options
                .iter()
                .map(|option| {
                    let selected = Some(option.name.as_str()) == chosen;
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            if selected { "(*) " } else { "( ) " },
                            Style::default().fg(if selected { Color::Green } else { Color::DarkGray }),
                        ),
                        Span::raw(option.name.clone()),
                    ]))
                })
                .collect();

            let mut list = List::new(items).block(block);
            if focused {
                list = list
                    .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                    .highlight_symbol("> ");
            }
            frame.render_stateful_widget(list, columns[i], &mut self.finish_states[i]);
        }

        let state = wizard.state();
        let required = required_surfaces(state).len();
        let filled = filled_surfaces(state);
        let color = if filled >= required { Color::Green } else { Color::Yellow };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!("{filled}/{required}"), Style::default().fg(color)),
                Span::raw(" surfaces chosen  "),
                Span::styled("Tab", Style::default().fg(Color::Yellow)),
                Span::raw(" next surface"),
            ])),
            rows[1],
        );
    }
}
