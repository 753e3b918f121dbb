//! Text inputs for the dimension and capture forms

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

/// Which characters a single-line input accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFilter {
    Any,
    /// Digits plus one decimal separator (`.` or `,`)
    Decimal,
}

impl InputFilter {
    fn accepts(self, current: &str, c: char) -> bool {
        match self {
            InputFilter::Any => !c.is_control(),
            InputFilter::Decimal => {
                let is_separator = |ch: char| ch == '.' || ch == ',';
                c.is_ascii_digit() || (is_separator(c) && !current.contains(is_separator))
            }
        }
    }
}

pub enum FormField {
    /// Single-line text input; `cursor_pos` counts characters, not bytes
    TextInput {
        value: String,
        cursor_pos: usize,
        placeholder: String,
        max_length: Option<usize>,
        filter: InputFilter,
    },
    /// Multi-line text input using tui-textarea
    TextArea {
        textarea: Box<TextArea<'static>>,
        placeholder: String,
    },
}

impl FormField {
    pub fn text_input(placeholder: &str, max_length: Option<usize>) -> Self {
        FormField::TextInput {
            value: String::new(),
            cursor_pos: 0,
            placeholder: placeholder.to_string(),
            max_length,
            filter: InputFilter::Any,
        }
    }

    pub fn decimal_input(placeholder: &str) -> Self {
        FormField::TextInput {
            value: String::new(),
            cursor_pos: 0,
            placeholder: placeholder.to_string(),
            max_length: Some(8),
            filter: InputFilter::Decimal,
        }
    }

    pub fn text_area(placeholder: &str) -> Self {
        FormField::TextArea {
            textarea: Box::default(),
            placeholder: placeholder.to_string(),
        }
    }

    pub fn value(&self) -> String {
        match self {
            FormField::TextInput { value, .. } => value.clone(),
            FormField::TextArea { textarea, .. } => textarea.lines().join("\n"),
        }
    }

    pub fn set_value(&mut self, new_value: &str) {
        match self {
            FormField::TextInput {
                value, cursor_pos, ..
            } => {
                *value = new_value.to_string();
                *cursor_pos = value.chars().count();
            }
            FormField::TextArea { textarea, .. } => {
                textarea.select_all();
                textarea.cut();
                textarea.insert_str(new_value);
            }
        }
    }

    pub fn clear(&mut self) {
        self.set_value("");
    }

    /// Handle a key event, returns true if the key was consumed
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match self {
            FormField::TextInput {
                value,
                cursor_pos,
                max_length,
                filter,
                ..
            } => match key {
                KeyCode::Char(c) => {
                    let len = value.chars().count();
                    if filter.accepts(value, c) && max_length.map_or(true, |m| len < m) {
                        let at = byte_index(value, *cursor_pos);
                        value.insert(at, c);
                        *cursor_pos += 1;
                        true
                    } else {
                        false
                    }
                }
                KeyCode::Backspace => {
                    if *cursor_pos > 0 {
                        *cursor_pos -= 1;
                        let at = byte_index(value, *cursor_pos);
                        value.remove(at);
                    }
                    true
                }
                KeyCode::Delete => {
                    if *cursor_pos < value.chars().count() {
                        let at = byte_index(value, *cursor_pos);
                        value.remove(at);
                    }
                    true
                }
                KeyCode::Left if *filter == InputFilter::Any => {
                    *cursor_pos = cursor_pos.saturating_sub(1);
                    true
                }
                KeyCode::Right if *filter == InputFilter::Any => {
                    if *cursor_pos < value.chars().count() {
                        *cursor_pos += 1;
                    }
                    true
                }
                KeyCode::Home => {
                    *cursor_pos = 0;
                    true
                }
                KeyCode::End => {
                    *cursor_pos = value.chars().count();
                    true
                }
                _ => false,
            },
            FormField::TextArea { textarea, .. } => {
                // TextArea handles its own key events
                textarea.input(KeyEvent::new(key, KeyModifiers::NONE));
                true
            }
        }
    }

    pub fn render_height(&self) -> u16 {
        match self {
            FormField::TextInput { .. } => 1,
            FormField::TextArea { .. } => 4,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let border_color = if focused { Color::Cyan } else { Color::Gray };

        match self {
            FormField::TextInput {
                value,
                cursor_pos,
                placeholder,
                ..
            } => {
                let content = if value.is_empty() && !focused {
                    Line::from(Span::styled(
                        placeholder.as_str(),
                        Style::default().fg(Color::DarkGray),
                    ))
                } else {
                    let mut text = value.clone();
                    if focused {
                        text.insert(byte_index(value, *cursor_pos), '|');
                    }
                    Line::from(Span::raw(text))
                };

                let para = Paragraph::new(content).style(Style::default().fg(if focused {
                    Color::White
                } else {
                    Color::Gray
                }));
                frame.render_widget(para, area);
            }
            FormField::TextArea {
                textarea,
                placeholder,
            } => {
                textarea.set_cursor_line_style(Style::default());
                textarea.set_cursor_style(if focused {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                });
                textarea.set_block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border_color)),
                );

                if textarea.lines().iter().all(|l| l.is_empty()) && !focused {
                    textarea.set_placeholder_text(placeholder.clone());
                    textarea.set_placeholder_style(Style::default().fg(Color::DarkGray));
                }

                frame.render_widget(&**textarea, area);
            }
        }
    }
}

/// Byte offset of the `char_pos`-th character
fn byte_index(value: &str, char_pos: usize) -> usize {
    value
        .char_indices()
        .nth(char_pos)
        .map_or(value.len(), |(i, _)| i)
}
