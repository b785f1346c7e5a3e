/// Convenience result type used across cardnews.
pub type CardResult<T> = Result<T, CardError>;

/// Top-level error taxonomy used by the card pipeline.
///
/// Most conditions in a batch are recoverable and never surface as a `CardError`: missing or
/// corrupt backgrounds degrade to a placeholder and a missing primary font family degrades to
/// the fallback family. What remains here are the conditions a caller has to report.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    /// A card-set document is absent, unreadable or malformed.
    #[error("document error: {0}")]
    Document(String),

    /// No usable typeface could be loaded for a role.
    #[error("font error: {0}")]
    Font(String),

    /// A background asset could not be prepared.
    #[error("asset error: {0}")]
    Asset(String),

    /// Composition of a canvas failed.
    #[error("render error: {0}")]
    Render(String),

    /// Persisting a rendered image failed.
    #[error("output error: {0}")]
    Output(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    /// Build a [`CardError::Document`] value.
    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document(msg.into())
    }

    /// Build a [`CardError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`CardError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`CardError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CardError::Output`] value.
    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
