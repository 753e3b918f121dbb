use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::config::Config;
use crate::submission::{
    ContactForm, Dismissed, LeadPayload, LeadSink, SubmissionFlow, SubmissionPhase, SubmitError,
};
use crate::ui::dialogs::{HelpDialog, SubmissionOverlay};
use crate::ui::terminal_guard::TerminalGuard;
use crate::ui::wizard::{ScreenCommand, WizardScreen};
use crate::wizard::{NavOutcome, Wizard};

type SubmitResult = Result<(), SubmitError>;

pub struct App {
    config: Config,
    wizard: Wizard,
    screen: WizardScreen,
    flow: SubmissionFlow,
    help_dialog: HelpDialog,
    overlay: SubmissionOverlay,
    sink: Arc<dyn LeadSink>,
    /// Results of spawned submissions, drained once per frame
    results_tx: mpsc::UnboundedSender<SubmitResult>,
    results_rx: mpsc::UnboundedReceiver<SubmitResult>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, wizard: Wizard, sink: Arc<dyn LeadSink>) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let screen = WizardScreen::new(config.ui.currency.clone());
        tracing::info!(sink = sink.name(), step = wizard.step().number(), "Wizard ready");
        Self {
            config,
            wizard,
            screen,
            flow: SubmissionFlow::new(),
            help_dialog: HelpDialog::new(),
            overlay: SubmissionOverlay::new(),
            sink,
            results_tx,
            results_rx,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let (guard, mut terminal) = TerminalGuard::enter()?;

        let tick_rate = Duration::from_millis(self.config.ui.refresh_rate_ms);

        while !self.should_quit {
            let now = Instant::now();
            self.tick(now);

            let submit_enabled = self.flow.phase() == &SubmissionPhase::Idle;
            terminal.draw(|f| {
                self.screen.render(f, &self.wizard, submit_enabled, now);
                self.overlay.render(f, self.flow.phase());
                self.help_dialog.render(f);
            })?;

            // Handle events
            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, Instant::now());
                    }
                }
            }
        }

        guard.restore();
        Ok(())
    }

    /// Per-frame housekeeping: due transitions, finished requests, animation
    fn tick(&mut self, now: Instant) {
        if let Some(NavOutcome::TemplateMissing(step)) = self.wizard.tick(now) {
            tracing::warn!(step = step.number(), "Transition dropped");
        }
        while let Ok(result) = self.results_rx.try_recv() {
            self.flow.finish(result);
        }
        self.overlay.tick();
    }

    fn handle_key(&mut self, code: KeyCode, now: Instant) {
        if self.help_dialog.visible {
            self.help_dialog.toggle();
            return;
        }

        match self.flow.phase() {
            SubmissionPhase::Submitting => return,
            SubmissionPhase::Success | SubmissionPhase::Failure(_) => {
                if matches!(code, KeyCode::Enter | KeyCode::Esc) {
                    self.dismiss_overlay(now);
                }
                return;
            }
            SubmissionPhase::Idle => {}
        }

        match self.screen.handle_key(code, &mut self.wizard, now) {
            ScreenCommand::None => {}
            ScreenCommand::Quit => self.should_quit = true,
            ScreenCommand::ToggleHelp => self.help_dialog.toggle(),
            ScreenCommand::Submit(form) => self.start_submission(form),
        }
    }

    /// Build the payload from the live selections and send it off-thread
    fn start_submission(&mut self, form: ContactForm) {
        if !self.flow.begin(&form) {
            return;
        }
        let payload = LeadPayload::build(&self.config.submission.access_key, &form, self.wizard.state());
        tracing::info!(sink = self.sink.name(), total = payload.total, "Submitting lead");

        let sink = Arc::clone(&self.sink);
        let tx = self.results_tx.clone();
        tokio::spawn(async move {
            let result = sink.submit(&payload).await;
            // Receiver only goes away when the app is shutting down
            let _ = tx.send(result);
        });
    }

    fn dismiss_overlay(&mut self, now: Instant) {
        match self.flow.dismiss() {
            Some(Dismissed::Success) => {
                self.wizard.schedule_reset(self.config.dismiss_delay(), now);
                self.screen.capture.clear();
                if self.screen.is_quick_form_open() {
                    self.screen.close_quick_form(&mut self.wizard);
                }
            }
            Some(Dismissed::Failure) | None => {}
        }
    }
}
