use thiserror::Error;

/// Errors from the remote acknowledgment service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error("Failed to add todo")]
    Rejected,
}

/// Errors from driving a todo list through its handle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControllerError {
    #[error("Todo list controller is no longer running")]
    Closed,
}
