use thiserror::Error;

/// Errors raised by search states and sampling policies
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid sampling policy: {0}")]
    InvalidPolicy(String),

    #[error("Action {action} is out of range for {num_actions} actions")]
    ActionOutOfRange { action: usize, num_actions: usize },

    #[error("Action {0} has already been taken")]
    ActionAlreadyTaken(usize),
}

/// Convenience Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
