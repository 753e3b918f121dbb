//! Lead capture: contact form, submission phases and delivery
//!
//! The flow moves `Idle → Submitting → {Success, Failure} → Idle`. Only an
//! idle flow with a valid form may start a request, so at most one is ever in
//! flight. Terminal phases return to idle only through [`SubmissionFlow::dismiss`].

pub mod client;
pub mod error;
pub mod payload;

pub use client::{interpret_response, LeadSink, WebFormsClient};
pub use error::SubmitError;
pub use payload::LeadPayload;

/// Contact fields of the capture form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub contact: String,
    /// Optional free text
    pub note: String,
}

impl ContactForm {
    pub fn new(name: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact: contact.into(),
            note: String::new(),
        }
    }

    /// Name and contact must both be non-blank
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && !self.contact.trim().is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
    Success,
    Failure(SubmitError),
}

/// Which overlay the user just closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissed {
    /// Caller resets the wizard after the dismiss delay
    Success,
    /// Selections stay for a retry
    Failure,
}

#[derive(Debug, Default)]
pub struct SubmissionFlow {
    phase: SubmissionPhase,
}

impl SubmissionFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &SubmissionPhase {
        &self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmissionPhase::Submitting
    }

    /// Whether the submit control is live for `form`
    pub fn can_submit(&self, form: &ContactForm) -> bool {
        self.phase == SubmissionPhase::Idle && form.is_valid()
    }

    /// Enter `Submitting`. Returns false when the form is invalid or another
    /// phase is active; the caller must not send anything then.
    pub fn begin(&mut self, form: &ContactForm) -> bool {
        if !self.can_submit(form) {
            return false;
        }
        self.phase = SubmissionPhase::Submitting;
        true
    }

    /// Record the outcome of the in-flight request. Ignored unless submitting.
    pub fn finish(&mut self, result: Result<(), SubmitError>) {
        if !self.is_submitting() {
            tracing::debug!("Ignoring submission result outside Submitting");
            return;
        }
        self.phase = match result {
            Ok(()) => {
                tracing::info!("Lead submitted");
                SubmissionPhase::Success
            }
            Err(e) => {
                tracing::warn!(error = %e, "Lead submission failed");
                SubmissionPhase::Failure(e)
            }
        };
    }

    /// Close the result overlay and return to idle
    pub fn dismiss(&mut self) -> Option<Dismissed> {
        let dismissed = match self.phase {
            SubmissionPhase::Success => Dismissed::Success,
            SubmissionPhase::Failure(_) => Dismissed::Failure,
            SubmissionPhase::Idle | SubmissionPhase::Submitting => return None,
        };
        self.phase = SubmissionPhase::Idle;
        Some(dismissed)
    }

    /// Run one submission to completion on the current task
    pub async fn submit(
        &mut self,
        form: &ContactForm,
        payload: &LeadPayload,
        sink: &dyn LeadSink,
    ) -> &SubmissionPhase {
        if self.begin(form) {
            tracing::debug!(sink = sink.name(), "Sending lead");
            let result = sink.submit(payload).await;
            self.finish(result);
        }
        &self.phase
    }
}
