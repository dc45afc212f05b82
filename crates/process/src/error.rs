//! Process errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    /// An input was rejected before the process ran
    #[error("{process}: invalid input `{param}`: {reason}")]
    InvalidInput {
        process: &'static str,
        param: &'static str,
        reason: String,
    },

    /// The engine failed while running the process
    #[error("{process} failed: {source}")]
    Execution {
        process: &'static str,
        #[source]
        source: geoprocs_core::Error,
    },
}

impl ProcessError {
    /// Name of the process that raised the error
    pub fn process(&self) -> &'static str {
        match self {
            ProcessError::InvalidInput { process, .. } | ProcessError::Execution { process, .. } => process,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProcessError>;
