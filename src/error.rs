//! Error types for the skeylo backend.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Forward error: {0}")]
    Forward(#[from] ForwardError),

    #[error("Slot error: {0}")]
    Slot(#[from] SlotError),

    #[error("Submit error: {0}")]
    Submit(#[from] SubmitError),
}

/// Errors from relaying a payload to a forwarding target.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// The outbound request never produced an HTTP response (DNS failure,
    /// refused connection, timeout, invalid URL).
    #[error("Request to forwarding target failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Errors from resolving a meeting slot.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    #[error("Meetings are only offered Friday through Sunday")]
    DayNotOffered,

    #[error("Requested date is in the past")]
    InPast,

    #[error("Meeting time does not exist on that date in the meeting timezone")]
    UnrepresentableTime,
}

/// Error surfaced to the wizard when a lead submission fails.
#[derive(Debug, thiserror::Error)]
#[error("Lead submission failed: {0}")]
pub struct SubmitError(pub String);

/// Result type alias for the backend.
pub type Result<T> = std::result::Result<T, Error>;
