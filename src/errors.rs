use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("{0} is required")] Missing(&'static str),
    #[error("agent error: {0}")] Agent(String),
    #[error("Failed to parse affirmations from agent response")] UnparseableAffirmations,
    #[error("Failed to parse screen from agent response")] UnparseableScreen,
}

/// Message for the `error` field of a result struct. Anyhow errors always
/// render something, but an all-whitespace message still gets the generic
/// fallback so the UI never shows a blank error.
pub fn message_or_default(err: &anyhow::Error) -> String {
    let msg = err.to_string();
    if msg.trim().is_empty() {
        "Unknown error occurred".to_string()
    } else {
        msg
    }
}
