use thiserror::Error;

/// Why a lead did not go through
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The endpoint answered with JSON that does not report success
    #[error("server rejected the lead: {0}")]
    Rejected(String),

    /// The request never produced a readable answer: network failure,
    /// timeout, or a body that is not JSON
    #[error("request failed: {0}")]
    Transport(String),
}

impl SubmitError {
    /// Overlay title shown for every failure
    pub const TITLE: &'static str = "Request not sent!";

    /// Distinct subtitle for each failure class
    pub fn user_message(&self) -> &'static str {
        match self {
            SubmitError::Rejected(_) => "Server error",
            SubmitError::Transport(_) => "Client error",
        }
    }
}
