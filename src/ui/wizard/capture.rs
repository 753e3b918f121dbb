//! Contact capture form shared by step 5 and the quick form

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::submission::ContactForm;
use crate::ui::form_field::FormField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFocus {
    Name,
    Contact,
    Note,
    Submit,
}

impl CaptureFocus {
    const ORDER: [CaptureFocus; 4] = [
        CaptureFocus::Name,
        CaptureFocus::Contact,
        CaptureFocus::Note,
        CaptureFocus::Submit,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// What a key did to the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureInput {
    Consumed,
    /// Enter on the send control with a valid form
    Submit(ContactForm),
    /// Not handled here; the caller may interpret it
    Unhandled,
}

pub struct CaptureForm {
    name: FormField,
    contact: FormField,
    note: FormField,
    pub focus: CaptureFocus,
}

impl Default for CaptureForm {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureForm {
    pub fn new() -> Self {
        Self {
            name: FormField::text_input("Your name", Some(80)),
            contact: FormField::text_input("Phone or e-mail", Some(80)),
            note: FormField::text_area("Anything we should know (optional)"),
            focus: CaptureFocus::Name,
        }
    }

    pub fn contact_form(&self) -> ContactForm {
        ContactForm {
            name: self.name.value(),
            contact: self.contact.value(),
            note: self.note.value(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.contact_form().is_valid()
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.contact.clear();
        self.note.clear();
        self.focus = CaptureFocus::Name;
    }

    fn focused_field(&mut self) -> Option<&mut FormField> {
        match self.focus {
            CaptureFocus::Name => Some(&mut self.name),
            CaptureFocus::Contact => Some(&mut self.contact),
            CaptureFocus::Note => Some(&mut self.note),
            CaptureFocus::Submit => None,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> CaptureInput {
        match code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return CaptureInput::Consumed;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return CaptureInput::Consumed;
            }
            KeyCode::Down if self.focus != CaptureFocus::Note => {
                self.focus = self.focus.next();
                return CaptureInput::Consumed;
            }
            KeyCode::Up if self.focus != CaptureFocus::Note => {
                self.focus = self.focus.prev();
                return CaptureInput::Consumed;
            }
            _ => {}
        }

        match self.focus {
            CaptureFocus::Submit => match code {
                KeyCode::Enter if self.is_valid() => CaptureInput::Submit(self.contact_form()),
                // Disabled control swallows Enter
                KeyCode::Enter => CaptureInput::Consumed,
                _ => CaptureInput::Unhandled,
            },
            CaptureFocus::Name | CaptureFocus::Contact if code == KeyCode::Enter => {
                self.focus = self.focus.next();
                CaptureInput::Consumed
            }
            _ => match self.focused_field() {
                Some(field) => {
                    if field.handle_key(code) {
                        CaptureInput::Consumed
                    } else {
                        CaptureInput::Unhandled
                    }
                }
                None => CaptureInput::Unhandled,
            },
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, enabled: bool) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Name label
                Constraint::Length(self.name.render_height()),
                Constraint::Length(1), // Contact label
                Constraint::Length(self.contact.render_height()),
                Constraint::Length(1), // Note label
                Constraint::Length(self.note.render_height()),
                Constraint::Length(1), // Spacer
                Constraint::Length(1), // Send
                Constraint::Min(0),
            ])
            .split(area);

        let label = |text: &'static str, required: bool| {
            let mut spans = vec![Span::styled(text, Style::default().fg(Color::Yellow))];
            if required {
                spans.push(Span::styled(" *", Style::default().fg(Color::Red)));
            }
            Paragraph::new(Line::from(spans))
        };

        let focus = self.focus;
        frame.render_widget(label("Name", true), chunks[0]);
        self.name
            .render(frame, chunks[1], focus == CaptureFocus::Name);
        frame.render_widget(label("Contact", true), chunks[2]);
        self.contact
            .render(frame, chunks[3], focus == CaptureFocus::Contact);
        frame.render_widget(label("Note", false), chunks[4]);
        self.note
            .render(frame, chunks[5], focus == CaptureFocus::Note);

        let live = enabled && self.is_valid();
        let mut style = if live {
            Style::default().fg(Color::Black).bg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        if focus == CaptureFocus::Submit {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        let marker = if focus == CaptureFocus::Submit { "> " } else { "  " };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw(marker),
                Span::styled(" Send request ", style),
            ])),
            chunks[7],
        );
    }
}
