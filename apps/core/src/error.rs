use thiserror::Error;

/// Failures that escape the search pipeline and end up in the internal-error item.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{message}")]
    Internal {
        message: String,
        context: Vec<(String, String)>,
    },
}

impl SearchError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            context: Vec::new(),
        }
    }

    /// Attaches a key/value pair shown in the diagnostic text of the error item.
    pub fn with_context(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            Self::Internal {
                message,
                mut context,
            } => {
                context.push((key.into(), value.into()));
                Self::Internal { message, context }
            }
            other => {
                let message = other.to_string();
                Self::Internal {
                    message,
                    context: vec![(key.into(), value.into())],
                }
            }
        }
    }

    pub fn context(&self) -> &[(String, String)] {
        match self {
            Self::Internal { context, .. } => context,
            _ => &[],
        }
    }
}
