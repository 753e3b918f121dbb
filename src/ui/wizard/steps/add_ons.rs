//! Step 4: optional extras

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

use super::step_block;
use crate::quote::{format_money, AddOnOption};
use crate::ui::wizard::WizardScreen;
use crate::wizard::Wizard;

impl WizardScreen {
    pub(crate) fn render_add_ons_step(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        wizard: &Wizard,
        options: &[AddOnOption],
    ) {
        let state = wizard.state();
        let items: Vec<ListItem> = options
            .iter()
            .map(|option| {
                let checked = state.has_add_on(&option.to_add_on());
                ListItem::new(Line::from(vec![
                    Span::styled(
                        if checked { "[x] " } else { "[ ] " },
                        Style::default().fg(if checked { Color::Green } else { Color::DarkGray }),
                    ),
                    Span::raw(option.name.clone()),
                    Span::styled(
                        format!("  +{}", format_money(option.price.round() as i64, self.currency())),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();

        let title = format!("Extras ({} chosen, optional)", state.add_ons().len());
        let list = List::new(items)
            .block(step_block(&title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, area, &mut self.add_on_state);
    }
}
