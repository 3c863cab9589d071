//! Error types shared by every stage of a projection run

use thiserror::Error;

/// Broad classification of a [`ProjectionError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller supplied bad input; fix it and resubmit
    InputValidation,
    /// Arithmetic failed mid-run; the run produced nothing
    Computation,
    /// Tables or reference data are missing or unreadable
    Configuration,
}

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("Unknown milestone type: {0}")]
    UnknownMilestoneType(String),

    #[error("Profile not found: no {field} named '{key}' in reference tables")]
    ProfileNotFound { field: &'static str, key: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid parameters for {kind} milestone: {source}")]
    InvalidParams {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Computation failed in year {year}: {detail}")]
    Computation { year: u32, detail: String },

    #[error("Tax tables have no federal brackets for filing status {0}")]
    MissingTaxTable(String),

    #[error("Reference data error: {0}")]
    ReferenceData(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProjectionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProjectionError::UnknownMilestoneType(_)
            | ProjectionError::ProfileNotFound { .. }
            | ProjectionError::InvalidInput(_)
            | ProjectionError::InvalidParams { .. } => ErrorKind::InputValidation,
            ProjectionError::Computation { .. } => ErrorKind::Computation,
            ProjectionError::MissingTaxTable(_)
            | ProjectionError::ReferenceData(_)
            | ProjectionError::Csv(_)
            | ProjectionError::Io(_) => ErrorKind::Configuration,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProjectionError>;
