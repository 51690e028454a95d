use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("cannot load sales data from {origin}: {reason}")]
    DataLoad { origin: String, reason: String },

    #[error("invalid category selected: {0}")]
    InvalidSelector(String),

    #[error("cannot write {}: {reason}", path.display())]
    ExportIo { path: PathBuf, reason: String },

    #[error("value overflow")]
    ValueOverflow,
}

impl DashboardError {
    pub fn data_load(origin: impl Into<String>, reason: impl ToString) -> Self {
        DashboardError::DataLoad {
            origin: origin.into(),
            reason: reason.to_string(),
        }
    }
}
