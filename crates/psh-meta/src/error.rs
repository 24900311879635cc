//! Error types for psh-meta

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required identity field is absent, not a string, or empty.
    #[error("Malformed project descriptor: `{field}` {reason}")]
    MalformedDescriptor { field: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub(crate) fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedDescriptor {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
