//! Terminal front end of the quote wizard
//!
//! [`WizardScreen`] holds presentation state only (list cursors, focused
//! group, the capture form). Every selection goes to the [`Wizard`] as a
//! [`StepAction`]; the screen never edits the selection state itself.

use std::time::Instant;

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, ListState, Paragraph},
    Frame,
};

mod capture;
pub mod steps;


pub use capture::{CaptureFocus, CaptureForm, CaptureInput};

use crate::quote::Surface;
use crate::submission::ContactForm;
use crate::ui::dialogs::centered_rect;
use crate::ui::form_field::FormField;
use crate::wizard::{Axis, Gate, Step, StepAction, StepView, Wizard};

/// What the app should do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenCommand {
    None,
    Quit,
    ToggleHelp,
    Submit(ContactForm),
}

pub struct WizardScreen {
    currency: String,
    /// Step the cursors were last aligned with
    synced_step: Option<Step>,
    pub(crate) enclosure_state: ListState,
    /// Index into `Surface::all()` of the focused interior group
    pub(crate) finish_group: usize,
    pub(crate) finish_states: [ListState; 3],
    pub(crate) add_on_state: ListState,
    pub(crate) dimension_axis: usize,
    pub capture: CaptureForm,
    quick_form_open: bool,
}

impl WizardScreen {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            synced_step: None,
            enclosure_state: ListState::default(),
            finish_group: 0,
            finish_states: Default::default(),
            add_on_state: ListState::default(),
            dimension_axis: 0,
            capture: CaptureForm::new(),
            quick_form_open: false,
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn is_quick_form_open(&self) -> bool {
        self.quick_form_open
    }

    /// Open the header-style quick form; navigation becomes synchronous
    pub fn open_quick_form(&mut self, wizard: &mut Wizard) {
        self.quick_form_open = true;
        self.capture.focus = CaptureFocus::Name;
        wizard.set_quick_mode(true);
    }

    pub fn close_quick_form(&mut self, wizard: &mut Wizard) {
        self.quick_form_open = false;
        wizard.set_quick_mode(false);
    }

    // ─── Cursor sync ────────────────────────────────────────────────────────

    /// Align list cursors with the committed step's current choice after a
    /// step switch
    pub fn sync(&mut self, wizard: &Wizard) {
        let step = wizard.step();
        if self.synced_step == Some(step) {
            return;
        }
        self.synced_step = Some(step);
        let state = wizard.state();

        match wizard.view() {
            Some(StepView::EnclosureTypes(options)) => {
                let chosen = state.enclosure_type().name.as_deref();
                let i = options
                    .iter()
                    .position(|o| Some(o.name.as_str()) == chosen)
                    .unwrap_or(0);
                self.enclosure_state.select(Some(i));
            }
            Some(StepView::Dimensions) => {
                self.dimension_axis = 0;
            }
            Some(StepView::InteriorFinish(groups)) => {
                for (group, list_state) in groups.iter().zip(self.finish_states.iter_mut()) {
                    let chosen = state.interior_finish().slot(group.surface).material_name.as_deref();
                    let i = group
                        .options
                        .iter()
                        .position(|o| Some(o.name.as_str()) == chosen)
                        .unwrap_or(0);
                    list_state.select(Some(i));
                }
                self.finish_group = groups.iter().position(|g| !g.hidden).unwrap_or(0);
            }
            Some(StepView::AddOns(_)) => self.add_on_state.select(Some(0)),
            Some(StepView::Summary { .. }) => self.capture.focus = CaptureFocus::Name,
            None => {}
        }
    }

    // ─── Input ──────────────────────────────────────────────────────────────

    /// Route a key to the focused surface; cursors are aligned with the
    /// committed step both before and after the key lands
    pub fn handle_key(&mut self, code: KeyCode, wizard: &mut Wizard, now: Instant) -> ScreenCommand {
        self.sync(wizard);
        let command = self.dispatch_key(code, wizard, now);
        self.sync(wizard);
        command
    }

    fn dispatch_key(&mut self, code: KeyCode, wizard: &mut Wizard, now: Instant) -> ScreenCommand {
        if self.quick_form_open {
            return self.handle_quick_form_key(code, wizard);
        }
        if wizard.step() == Step::Summary {
            return self.handle_summary_key(code, wizard, now);
        }

        match code {
            KeyCode::Char('q') => return ScreenCommand::Quit,
            KeyCode::Char('?') => return ScreenCommand::ToggleHelp,
            KeyCode::Char('h') => {
                self.open_quick_form(wizard);
                return ScreenCommand::None;
            }
            KeyCode::Right | KeyCode::Char('n') => {
                wizard.forward_at(now);
                return ScreenCommand::None;
            }
            KeyCode::Left | KeyCode::Char('b') => {
                wizard.back_at(now);
                return ScreenCommand::None;
            }
            _ => {}
        }

        // Step content is inert until the transition lands
        if wizard.is_transitioning() {
            return ScreenCommand::None;
        }

        match wizard.step() {
            Step::EnclosureType => self.handle_enclosure_key(code, wizard),
            Step::Dimensions => self.handle_dimensions_key(code, wizard),
            Step::InteriorFinish => self.handle_interior_key(code, wizard),
            Step::AddOns => self.handle_add_ons_key(code, wizard),
            Step::Summary => {}
        }
        ScreenCommand::None
    }

    fn handle_quick_form_key(&mut self, code: KeyCode, wizard: &mut Wizard) -> ScreenCommand {
        if code == KeyCode::Esc {
            self.close_quick_form(wizard);
            return ScreenCommand::None;
        }
        match self.capture.handle_key(code) {
            CaptureInput::Submit(form) => ScreenCommand::Submit(form),
            CaptureInput::Consumed | CaptureInput::Unhandled => ScreenCommand::None,
        }
    }

    fn handle_summary_key(
        &mut self,
        code: KeyCode,
        wizard: &mut Wizard,
        now: Instant,
    ) -> ScreenCommand {
        if code == KeyCode::Esc {
            self.capture.focus = CaptureFocus::Submit;
            return ScreenCommand::None;
        }
        if wizard.is_transitioning() {
            // Back is still honored so a mistaken step can be left
            if matches!(code, KeyCode::Left | KeyCode::Char('b'))
                && self.capture.focus == CaptureFocus::Submit
            {
                wizard.back_at(now);
            }
            return ScreenCommand::None;
        }
        match self.capture.handle_key(code) {
            CaptureInput::Submit(form) => ScreenCommand::Submit(form),
            CaptureInput::Consumed => ScreenCommand::None,
            CaptureInput::Unhandled => match code {
                KeyCode::Left | KeyCode::Char('b') => {
                    wizard.back_at(now);
                    ScreenCommand::None
                }
                KeyCode::Char('q') => ScreenCommand::Quit,
                KeyCode::Char('?') => ScreenCommand::ToggleHelp,
                _ => ScreenCommand::None,
            },
        }
    }

    fn handle_enclosure_key(&mut self, code: KeyCode, wizard: &mut Wizard) {
        let Some(StepView::EnclosureTypes(options)) = wizard.view() else {
            return;
        };
        match code {
            KeyCode::Up | KeyCode::Down => move_cursor(&mut self.enclosure_state, options.len(), code),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let Some(option) = self.enclosure_state.selected().and_then(|i| options.get(i))
                else {
                    return;
                };
                let action = StepAction::SelectEnclosure {
                    name: option.name.clone(),
                    base_price: option.base_price,
                    french: option.french,
                };
                wizard.apply(action);
            }
            _ => {}
        }
    }

    fn handle_dimensions_key(&mut self, code: KeyCode, wizard: &mut Wizard) {
        let axes = Axis::all();
        match code {
            KeyCode::Down | KeyCode::Tab | KeyCode::Enter => {
                self.dimension_axis = (self.dimension_axis + 1) % axes.len();
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.dimension_axis = (self.dimension_axis + axes.len() - 1) % axes.len();
            }
            _ => {
                let axis = axes[self.dimension_axis % axes.len()];
                let mut field = FormField::decimal_input("");
                field.set_value(wizard.drafts().get(axis));
                if field.handle_key(code) {
                    wizard.apply(StepAction::EditDimension {
                        axis,
                        input: field.value(),
                    });
                }
            }
        }
    }

    fn handle_interior_key(&mut self, code: KeyCode, wizard: &mut Wizard) {
        let Some(StepView::InteriorFinish(groups)) = wizard.view() else {
            return;
        };
        let visible: Vec<usize> = (0..groups.len()).filter(|i| !groups[*i].hidden).collect();
        if visible.is_empty() {
            return;
        }
        let pos = visible
            .iter()
            .position(|i| *i == self.finish_group)
            .unwrap_or(0);

        match code {
            KeyCode::Tab => self.finish_group = visible[(pos + 1) % visible.len()],
            KeyCode::BackTab => {
                self.finish_group = visible[(pos + visible.len() - 1) % visible.len()];
            }
            KeyCode::Up | KeyCode::Down => {
                let group = &groups[visible[pos]];
                move_cursor(&mut self.finish_states[visible[pos]], group.options.len(), code);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let index = visible[pos];
                let group = &groups[index];
                let Some(option) = self.finish_states[index]
                    .selected()
                    .and_then(|i| group.options.get(i))
                else {
                    return;
                };
                let action = StepAction::SelectFinish {
                    surface: group.surface,
                    material: option.name.clone(),
                    coefficient: option.coefficient,
                };
                wizard.apply(action);
            }
            _ => {}
        }
    }

    fn handle_add_ons_key(&mut self, code: KeyCode, wizard: &mut Wizard) {
        let Some(StepView::AddOns(options)) = wizard.view() else {
            return;
        };
        match code {
            KeyCode::Up | KeyCode::Down => move_cursor(&mut self.add_on_state, options.len(), code),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let Some(option) = self.add_on_state.selected().and_then(|i| options.get(i)) else {
                    return;
                };
                let add_on = option.to_add_on();
                wizard.apply(StepAction::ToggleAddOn(add_on));
            }
            _ => {}
        }
    }

    /// Surface currently focused on step 3
    pub fn focused_surface(&self) -> Surface {
        Surface::all()[self.finish_group % Surface::all().len()]
    }

    // ─── Rendering ──────────────────────────────────────────────────────────

    pub fn render(&mut self, frame: &mut Frame, wizard: &Wizard, submit_enabled: bool, now: Instant) {
        self.sync(wizard);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Step tabs
                Constraint::Min(8),    // Step body
                Constraint::Length(1), // Transition
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        frame.render_widget(step_tabs(wizard), chunks[0]);

        let body = chunks[1];
        match wizard.view() {
            Some(StepView::EnclosureTypes(options)) => {
                self.render_enclosure_step(frame, body, wizard, options);
            }
            Some(StepView::Dimensions) => self.render_dimensions_step(frame, body, wizard),
            Some(StepView::InteriorFinish(groups)) => {
                self.render_interior_step(frame, body, wizard, groups);
            }
            Some(StepView::AddOns(options)) => self.render_add_ons_step(frame, body, wizard, options),
            Some(StepView::Summary { fields, currency }) => {
                self.render_summary_step(frame, body, fields, currency, submit_enabled);
            }
            None => {
                let message = Paragraph::new(vec![
                    Line::from(Span::styled(
                        "This step is unavailable",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                    Line::from("Check the [catalog] section of the configuration."),
                ])
                .block(Block::default().borders(Borders::ALL));
                frame.render_widget(message, body);
            }
        }

        if let Some(progress) = wizard.transition_progress(now) {
            let label = wizard
                .pending_target()
                .map(|s| format!("Opening {}", s.title()))
                .unwrap_or_default();
            let gauge = Gauge::default()
                .gauge_style(Style::default().fg(Color::Cyan))
                .ratio(progress)
                .label(label);
            frame.render_widget(gauge, chunks[2]);
        }

        frame.render_widget(footer(wizard), chunks[3]);

        if self.quick_form_open {
            self.render_quick_form(frame, submit_enabled);
        }
    }

    fn render_quick_form(&mut self, frame: &mut Frame, submit_enabled: bool) {
        let area = centered_rect(60, 60, frame.area());
        frame.render_widget(Clear, area);
        let block = Block::default()
            .title(" Request a call back ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Min(10), Constraint::Length(1)])
            .split(inner);
        self.capture.render(frame, chunks[0], submit_enabled);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Esc", Style::default().fg(Color::Yellow)),
                Span::raw(" close"),
            ])),
            chunks[1],
        );
    }
}

/// Wrap-around cursor movement for Up/Down
fn move_cursor(state: &mut ListState, len: usize, code: KeyCode) {
    if len == 0 {
        return;
    }
    let i = match (state.selected(), code) {
        (Some(i), KeyCode::Down) => (i + 1) % len,
        (Some(i), KeyCode::Up) => (i + len - 1) % len,
        _ => 0,
    };
    state.select(Some(i));
}

/// Step tabs: only the committed step is marked active
fn step_tabs(wizard: &Wizard) -> Paragraph<'static> {
    let committed = wizard.step();
    let pending = wizard.pending_target();
    let mut spans = Vec::new();
    for step in Step::all() {
        let style = if *step == committed {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else if Some(*step) == pending {
            Style::default().fg(Color::Yellow)
        } else if *step < committed {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(
            format!(" {} {} ", step.number(), step.title()),
            style,
        ));
        spans.push(Span::raw(" "));
    }
    Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" Enclosure quote ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    )
}

fn footer(wizard: &Wizard) -> Paragraph<'static> {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));
    let mut spans = vec![key("←/b"), Span::raw(" back  ")];
    match wizard.gate() {
        Gate::Open => {
            spans.push(key("→/n"));
            spans.push(Span::raw(" next  "));
        }
        Gate::Closed => spans.push(Span::styled(
            "→ complete this step to continue  ",
            Style::default().fg(Color::DarkGray),
        )),
        Gate::Terminal => {}
    }
    spans.extend([
        key("h"),
        Span::raw(" quick form  "),
        key("?"),
        Span::raw(" help  "),
        key("q"),
        Span::raw(" quit"),
    ]);
    Paragraph::new(Line::from(spans))
}
