use thiserror::Error;

/// Errors produced by the view layer.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("invalid deep link {link:?}: {reason}")]
    InvalidLink { link: String, reason: String },

    #[error(transparent)]
    Type(#[from] specview_types::TypeError),
}

/// Convenience alias for view results.
pub type Result<T> = std::result::Result<T, ViewError>;
