use thiserror::Error;

/// Raised for structurally invalid notation: FEN board geometry and
/// malformed `Deal` tags (strict parser only). Everything else is tolerated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("invalid {what}: {fragment:?}")]
    InvalidFormat { what: &'static str, fragment: String },
}

impl FormatError {
    pub(crate) fn invalid(what: &'static str, fragment: impl Into<String>) -> Self {
        Self::InvalidFormat { what, fragment: fragment.into() }
    }

    /// The piece of input that failed to parse.
    pub fn fragment(&self) -> &str {
        match self {
            Self::InvalidFormat { fragment, .. } => fragment,
        }
    }
}
