//! Error types for psh-core

/// Result type for psh-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while synthesizing run configs
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A value handed to the variable encoder has no textual form
    #[error("Encoding failed: {message}")]
    EncodingFailure { message: String },

    /// An encoded payload could not be decoded
    #[error("Decoding failed: {message}")]
    Decode { message: String },

    /// A per-service override redefined a key the emulator keeps fixed
    #[error("Conflicting override for service {service}: `{key}` cannot be redefined")]
    ConflictingOverride { service: String, key: String },

    /// Descriptor error from psh-meta
    #[error(transparent)]
    Meta(#[from] psh_meta::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error reports a malformed project descriptor.
    pub fn is_malformed_descriptor(&self) -> bool {
        matches!(
            self,
            Error::Meta(psh_meta::Error::MalformedDescriptor { .. })
        )
    }
}
