use thiserror::Error;

/// Main error type for the sheetcast crate.
/// Aggregates errors from the standard library, dependencies, and internal modules.
#[derive(Error, Debug)]
pub enum SheetcastError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    // Third-party library errors
    #[error("{0}")]
    PatternError(#[from] glob::PatternError),

    #[error("{0}")]
    GlobError(#[from] glob::GlobError),

    // Internal module errors
    #[error("{0}")]
    JsonError(#[from] crate::json::parser::JsonError),

    #[error("{0}")]
    ReferenceError(#[from] crate::sheet::reference::ReferenceError),
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, SheetcastError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| SheetcastError::WithContextError(format!("{}: {}", message, e)))
    }
}
