//! Loader and result overlays for lead submission

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;
use crate::submission::{SubmissionPhase, SubmitError};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Overlay driven by the submission phase. Nothing is drawn while idle.
#[derive(Debug, Default)]
pub struct SubmissionOverlay {
    frame_count: usize,
}

impl SubmissionOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the loader animation
    pub fn tick(&mut self) {
        self.frame_count = self.frame_count.wrapping_add(1);
    }

    fn content(&self, phase: &SubmissionPhase) -> Option<(Color, Vec<Line<'static>>)> {
        let (color, title, subtitle) = match phase {
            SubmissionPhase::Idle => return None,
            SubmissionPhase::Submitting => (
                Color::Yellow,
                format!("{} Sending your request", SPINNER[self.frame_count % SPINNER.len()]),
                "Please wait".to_string(),
            ),
            SubmissionPhase::Success => (
                Color::Green,
                "Request sent!".to_string(),
                "We will call you back shortly".to_string(),
            ),
            SubmissionPhase::Failure(e) => (
                Color::Red,
                SubmitError::TITLE.to_string(),
                e.user_message().to_string(),
            ),
        };

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(subtitle),
        ];
        if !matches!(phase, SubmissionPhase::Submitting) {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("Enter", Style::default().fg(Color::Yellow)),
                Span::raw(" close"),
            ]));
        }
        Some((color, lines))
    }

    pub fn render(&self, frame: &mut Frame, phase: &SubmissionPhase) {
        let Some((color, lines)) = self.content(phase) else {
            return;
        };

        let area = centered_rect(50, 35, frame.area());
        frame.render_widget(Clear, area);

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}
